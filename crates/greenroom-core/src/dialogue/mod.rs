//! The conversational dialogue layer.
//!
//! [`engine`] interprets one inbound event against the account's
//! stored session and decides the next session plus the reply;
//! [`action`] decodes postback tokens into a closed enum; [`prompts`]
//! builds the outbound message payloads; [`locks`] serializes
//! processing per account.

pub mod action;
pub mod engine;
pub mod locks;
pub mod prompts;

/// An account may belong to at most this many groups.
pub const MAX_JOINABLE_GROUPS: usize = 4;

/// Hard platform cap on carousel columns per message.
pub const CAROUSEL_COLUMN_MAX: usize = 10;
