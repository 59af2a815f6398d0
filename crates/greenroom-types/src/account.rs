use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::session::Session;

/// Opaque id of a chat account, assigned by the messaging platform.
///
/// Unlike the server-generated ids this is never parsed or validated
/// beyond being a non-empty string; we store exactly what the platform
/// sends in `source.userId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A chat account: one platform user who follows the bot.
///
/// Created on first contact, deleted when the user unfollows or blocks.
/// The dialogue session is owned by the account and replaced wholesale
/// on every transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub session: Session,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
