//! Infrastructure implementations for Greenroom.
//!
//! SQLite-backed repositories (implementing the traits from
//! greenroom-core), the LINE messaging client with webhook signature
//! verification, API token helpers, and environment configuration.

pub mod config;
pub mod line;
pub mod sqlite;
pub mod token;
