//! Business logic for Greenroom.
//!
//! Holds the repository trait definitions (ports implemented by
//! greenroom-infra), the messaging client trait, the dialogue engine
//! with its message builders, and the daily practice notifier. This
//! crate never depends on any storage or HTTP technology.

pub mod dialogue;
pub mod messaging;
pub mod notify;
pub mod repository;
