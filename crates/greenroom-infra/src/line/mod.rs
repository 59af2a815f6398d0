//! LINE Messaging API integration: the HTTP client for the send APIs
//! and webhook signature verification.

pub mod client;
pub mod signature;

pub use client::LineClient;
pub use signature::verify_signature;
