use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::group::GroupKey;
use crate::place::PlaceId;

/// Unique identifier for a practice, wrapping a UUID v7.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PracticeId(pub Uuid);

impl PracticeId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for PracticeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PracticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PracticeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A scheduled rehearsal event.
///
/// Invariant (enforced at write time, not by a storage constraint): no
/// two non-deleted practices share the same (group, place, date, start)
/// tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practice {
    pub id: PracticeId,
    pub group_key: GroupKey,
    pub place_id: PlaceId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: Option<NaiveTime>,
    pub deleted: bool,
    /// Set once the daily notifier has sent this practice.
    pub notified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Denormalized practice row for display: the join of a practice with
/// its group and place names, as the chat list and the notifier render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeView {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: Option<NaiveTime>,
    pub group_name: String,
    pub place_name: String,
}
