//! Typed per-account dialogue state.
//!
//! A session is either idle or mid-flow in exactly one dialogue mode.
//! The type makes invalid mode/phase/draft combinations unrepresentable:
//! each phase variant carries exactly the draft fields collected by the
//! steps already completed, nothing optional, nothing extra.
//!
//! On the wire (the `accounts.session` JSON column) the session keeps
//! the legacy record shape `{"mode": ..., "phase": ..., "data": {...}}`,
//! with idle serialized as `{}`. (De)serialization goes through a raw
//! record struct and rejects inconsistent combinations, so a stored
//! blob either maps onto a valid state or fails loudly at the parse
//! boundary.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::group::GroupKey;
use crate::place::PlaceId;

/// A group reference carried through a dialogue draft: the key for
/// storage writes plus the display name for reply texts, so later
/// phases never need to re-fetch the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub key: GroupKey,
    pub name: String,
}

/// Dialogue state of one account.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    /// No dialogue in progress.
    Idle,
    /// Waiting for the member to type a join code. Single implicit phase.
    JoinGroup,
    /// Mid add-practice flow.
    AddPractice(AddPracticeState),
    /// Mid leave-group flow.
    WithdrawGroup(WithdrawState),
}

/// Phases of the add-practice dialogue, strictly linear. Each variant
/// owns the draft accumulated so far.
#[derive(Debug, Clone, PartialEq)]
pub enum AddPracticeState {
    AskGroup,
    AskPlace {
        group: GroupRef,
    },
    AskDate {
        group: GroupRef,
        place_id: PlaceId,
    },
    AskStart {
        group: GroupRef,
        place_id: PlaceId,
        date: NaiveDate,
    },
    AskEnd {
        group: GroupRef,
        place_id: PlaceId,
        date: NaiveDate,
        start: NaiveTime,
    },
}

/// Phases of the leave-group dialogue.
#[derive(Debug, Clone, PartialEq)]
pub enum WithdrawState {
    AskGroup,
    Confirm { group: GroupRef },
}

impl Session {
    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    /// Short mode label for log lines.
    pub fn mode_label(&self) -> &'static str {
        match self {
            Session::Idle => "idle",
            Session::JoinGroup => "join_group",
            Session::AddPractice(_) => "add_practice",
            Session::WithdrawGroup(_) => "withdraw_group",
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::Idle
    }
}

// ---------------------------------------------------------------------------
// Wire record
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Draft>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Mode {
    JoinGroup,
    AddPractice,
    WithdrawGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Phase {
    AskGroup,
    AskPlace,
    AskDate,
    AskStart,
    AskEnd,
    Confirm,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Draft {
    #[serde(skip_serializing_if = "Option::is_none")]
    group_key: Option<GroupKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    place_id: Option<PlaceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<NaiveTime>,
}

impl Draft {
    fn group(group: &GroupRef) -> Self {
        Draft {
            group_key: Some(group.key.clone()),
            group_name: Some(group.name.clone()),
            ..Draft::default()
        }
    }

    fn take_group(&mut self) -> Result<GroupRef, &'static str> {
        match (self.group_key.take(), self.group_name.take()) {
            (Some(key), Some(name)) => Ok(GroupRef { key, name }),
            _ => Err("draft is missing the group reference"),
        }
    }
}

impl Session {
    fn to_record(&self) -> SessionRecord {
        match self {
            Session::Idle => SessionRecord::default(),
            Session::JoinGroup => SessionRecord {
                mode: Some(Mode::JoinGroup),
                ..SessionRecord::default()
            },
            Session::AddPractice(state) => {
                let (phase, data) = match state {
                    AddPracticeState::AskGroup => (Phase::AskGroup, None),
                    AddPracticeState::AskPlace { group } => {
                        (Phase::AskPlace, Some(Draft::group(group)))
                    }
                    AddPracticeState::AskDate { group, place_id } => (
                        Phase::AskDate,
                        Some(Draft {
                            place_id: Some(place_id.clone()),
                            ..Draft::group(group)
                        }),
                    ),
                    AddPracticeState::AskStart {
                        group,
                        place_id,
                        date,
                    } => (
                        Phase::AskStart,
                        Some(Draft {
                            place_id: Some(place_id.clone()),
                            date: Some(*date),
                            ..Draft::group(group)
                        }),
                    ),
                    AddPracticeState::AskEnd {
                        group,
                        place_id,
                        date,
                        start,
                    } => (
                        Phase::AskEnd,
                        Some(Draft {
                            place_id: Some(place_id.clone()),
                            date: Some(*date),
                            start: Some(*start),
                            ..Draft::group(group)
                        }),
                    ),
                };
                SessionRecord {
                    mode: Some(Mode::AddPractice),
                    phase: Some(phase),
                    data,
                }
            }
            Session::WithdrawGroup(state) => {
                let (phase, data) = match state {
                    WithdrawState::AskGroup => (Phase::AskGroup, None),
                    WithdrawState::Confirm { group } => {
                        (Phase::Confirm, Some(Draft::group(group)))
                    }
                };
                SessionRecord {
                    mode: Some(Mode::WithdrawGroup),
                    phase: Some(phase),
                    data,
                }
            }
        }
    }

    fn try_from_record(record: SessionRecord) -> Result<Self, &'static str> {
        let SessionRecord { mode, phase, data } = record;
        let mut draft = data.unwrap_or_default();

        match (mode, phase) {
            (None, None) => Ok(Session::Idle),
            (None, Some(_)) => Err("phase present without mode"),
            (Some(Mode::JoinGroup), None) => Ok(Session::JoinGroup),
            (Some(Mode::JoinGroup), Some(_)) => Err("join-group session carries a phase"),
            (Some(Mode::AddPractice), Some(phase)) => {
                let state = match phase {
                    Phase::AskGroup => AddPracticeState::AskGroup,
                    Phase::AskPlace => AddPracticeState::AskPlace {
                        group: draft.take_group()?,
                    },
                    Phase::AskDate => AddPracticeState::AskDate {
                        group: draft.take_group()?,
                        place_id: draft.place_id.take().ok_or("draft is missing place_id")?,
                    },
                    Phase::AskStart => AddPracticeState::AskStart {
                        group: draft.take_group()?,
                        place_id: draft.place_id.take().ok_or("draft is missing place_id")?,
                        date: draft.date.take().ok_or("draft is missing date")?,
                    },
                    Phase::AskEnd => AddPracticeState::AskEnd {
                        group: draft.take_group()?,
                        place_id: draft.place_id.take().ok_or("draft is missing place_id")?,
                        date: draft.date.take().ok_or("draft is missing date")?,
                        start: draft.start.take().ok_or("draft is missing start")?,
                    },
                    Phase::Confirm => return Err("invalid phase for add-practice"),
                };
                Ok(Session::AddPractice(state))
            }
            (Some(Mode::WithdrawGroup), Some(phase)) => {
                let state = match phase {
                    Phase::AskGroup => WithdrawState::AskGroup,
                    Phase::Confirm => WithdrawState::Confirm {
                        group: draft.take_group()?,
                    },
                    _ => return Err("invalid phase for withdraw-group"),
                };
                Ok(Session::WithdrawGroup(state))
            }
            (Some(_), None) => Err("mode present without phase"),
        }
    }
}

impl Serialize for Session {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Session {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = SessionRecord::deserialize(deserializer)?;
        Session::try_from_record(record).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> GroupRef {
        GroupRef {
            key: GroupKey::new(),
            name: "Night Crew".to_string(),
        }
    }

    #[test]
    fn idle_serializes_as_empty_object() {
        let json = serde_json::to_string(&Session::Idle).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn empty_object_deserializes_as_idle() {
        let session: Session = serde_json::from_str("{}").unwrap();
        assert!(session.is_idle());
    }

    #[test]
    fn join_group_round_trips_without_phase_or_data() {
        let json = serde_json::to_value(&Session::JoinGroup).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "JoinGroup"}));

        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, Session::JoinGroup);
    }

    #[test]
    fn ask_end_round_trips_with_full_draft() {
        let session = Session::AddPractice(AddPracticeState::AskEnd {
            group: group(),
            place_id: PlaceId::new(),
            date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
            start: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        });

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn withdraw_confirm_round_trips() {
        let session = Session::WithdrawGroup(WithdrawState::Confirm { group: group() });
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn phase_without_mode_is_rejected() {
        let err = serde_json::from_str::<Session>(r#"{"phase": "AskPlace"}"#).unwrap_err();
        assert!(err.to_string().contains("phase present without mode"));
    }

    #[test]
    fn missing_draft_field_is_rejected() {
        // AskDate requires a place_id in the draft.
        let raw = serde_json::json!({
            "mode": "AddPractice",
            "phase": "AskDate",
            "data": {"group_key": GroupKey::new(), "group_name": "x"}
        });
        assert!(serde_json::from_value::<Session>(raw).is_err());
    }

    #[test]
    fn mode_without_phase_is_rejected_for_flows() {
        let err = serde_json::from_str::<Session>(r#"{"mode": "AddPractice"}"#).unwrap_err();
        assert!(err.to_string().contains("mode present without phase"));
    }
}
