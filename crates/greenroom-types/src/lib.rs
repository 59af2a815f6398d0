//! Shared domain types for Greenroom.
//!
//! This crate holds plain data: entity structs, id newtypes, the typed
//! dialogue [`session::Session`], inbound webhook event shapes, outbound
//! message payload shapes, and error enums. No I/O and no business logic
//! live here.

pub mod account;
pub mod error;
pub mod event;
pub mod group;
pub mod message;
pub mod place;
pub mod practice;
pub mod session;
pub mod team;
pub mod user;
