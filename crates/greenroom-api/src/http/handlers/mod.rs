//! Request handlers.

pub mod account;
pub mod auth;
pub mod group;
pub mod place;
pub mod practice;
pub mod scheduled;
pub mod team;
pub mod user;
pub mod webhook;
