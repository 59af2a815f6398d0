use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::team::TeamId;

/// Internal identifier of a group, wrapping a UUID v7.
///
/// Distinct from the short human-shareable join code: the key is what
/// the database and postback payloads reference, the join code is what
/// members type into the chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey(pub Uuid);

impl GroupKey {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for GroupKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A sub-unit of a troupe that members join and that owns practices.
///
/// Soft-deletable: once referenced by practices a group is only ever
/// flagged deleted, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub key: GroupKey,
    pub join_code: String,
    pub team_id: TeamId,
    pub name: String,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of an account's membership list, denormalized with the
/// group fields the dialogue needs (name for labels, team for venue
/// lookups).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub group_key: GroupKey,
    pub join_code: String,
    pub group_name: String,
    pub team_id: TeamId,
}
