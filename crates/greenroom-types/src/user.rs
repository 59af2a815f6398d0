use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::team::TeamId;

/// Id of an HTTP API operator (troupe staff). Supplied by the caller
/// at registration time, not generated by us.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An operator of the HTTP JSON API, scoped to one team.
///
/// Distinct from chat [`crate::account::Account`]s: users manage
/// groups, places, and practices through `/api/*`; accounts talk to
/// the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub team_id: TeamId,
    pub admin: bool,
    pub enabled: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
