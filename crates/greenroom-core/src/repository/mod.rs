//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure
//! layer (greenroom-infra) implements. The core crate never depends on
//! any specific storage technology. All traits use native async fn in
//! traits via `impl Future` (Rust 2024 edition, no async_trait macro).

pub mod account;
pub mod group;
pub mod membership;
pub mod place;
pub mod practice;
pub mod team;
pub mod user;
