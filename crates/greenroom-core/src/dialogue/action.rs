//! Typed decoding of postback tokens.
//!
//! The wire format is kept for compatibility with the deployed rich
//! menu: `method=<menu item>` for menu buttons, `group_id=<key>` /
//! `place=<id>` / `action=<approve|cancel>` for in-flow buttons, and
//! picker results delivered out-of-band in `postback.params`. All
//! parsing lives in this one function; everything downstream matches
//! on the closed [`PostbackAction`] enum.

use chrono::{NaiveDate, NaiveTime};
use greenroom_types::event::PostbackParams;
use greenroom_types::group::GroupKey;
use greenroom_types::place::PlaceId;

/// Rich-menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    JoinGroup,
    ListPractices,
    AddPractice,
    WithdrawGroup,
}

/// Confirm-template buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Approve,
    Cancel,
}

/// Every postback the bot understands.
#[derive(Debug, Clone, PartialEq)]
pub enum PostbackAction {
    Menu(MenuAction),
    GroupSelected(GroupKey),
    PlaceSelected(PlaceId),
    DatePicked(NaiveDate),
    TimePicked(NaiveTime),
    Confirm(ConfirmAction),
}

/// Stored date format in picker params and the database.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Stored time format in picker params and the database.
pub const TIME_FORMAT: &str = "%H:%M";

/// Decode a postback `data` string plus optional picker params.
///
/// Returns `None` for tokens the bot does not understand (stale
/// buttons, malformed ids); the caller treats that as a no-op.
pub fn parse_postback(data: &str, params: Option<&PostbackParams>) -> Option<PostbackAction> {
    if let Some(method) = data.strip_prefix("method=") {
        let menu = match method {
            "JoinGroup" => MenuAction::JoinGroup,
            "ListPractices" => MenuAction::ListPractices,
            "AddPractice" => MenuAction::AddPractice,
            "WithdrawGroup" => MenuAction::WithdrawGroup,
            _ => return None,
        };
        return Some(PostbackAction::Menu(menu));
    }

    if let Some(raw) = data.strip_prefix("group_id=") {
        return raw.parse::<GroupKey>().ok().map(PostbackAction::GroupSelected);
    }

    if let Some(raw) = data.strip_prefix("place=") {
        return raw.parse::<PlaceId>().ok().map(PostbackAction::PlaceSelected);
    }

    if let Some(raw) = data.strip_prefix("action=") {
        let confirm = match raw {
            "approve" => ConfirmAction::Approve,
            "cancel" => ConfirmAction::Cancel,
            _ => return None,
        };
        return Some(PostbackAction::Confirm(confirm));
    }

    // Picker actions carry a label in `data`; the value is in params.
    let params = params?;
    if let Some(date) = params.date.as_deref() {
        return NaiveDate::parse_from_str(date, DATE_FORMAT)
            .ok()
            .map(PostbackAction::DatePicked);
    }
    if let Some(time) = params.time.as_deref() {
        return NaiveTime::parse_from_str(time, TIME_FORMAT)
            .ok()
            .map(PostbackAction::TimePicked);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_tokens() {
        assert_eq!(
            parse_postback("method=JoinGroup", None),
            Some(PostbackAction::Menu(MenuAction::JoinGroup))
        );
        assert_eq!(
            parse_postback("method=ListPractices", None),
            Some(PostbackAction::Menu(MenuAction::ListPractices))
        );
        assert_eq!(
            parse_postback("method=AddPractice", None),
            Some(PostbackAction::Menu(MenuAction::AddPractice))
        );
        assert_eq!(
            parse_postback("method=WithdrawGroup", None),
            Some(PostbackAction::Menu(MenuAction::WithdrawGroup))
        );
    }

    #[test]
    fn unknown_menu_token_is_none() {
        assert_eq!(parse_postback("method=DeletePractice", None), None);
    }

    #[test]
    fn parses_group_and_place_selection() {
        let key = GroupKey::new();
        let parsed = parse_postback(&format!("group_id={key}"), None);
        assert_eq!(parsed, Some(PostbackAction::GroupSelected(key)));

        let place = PlaceId::new();
        let parsed = parse_postback(&format!("place={place}"), None);
        assert_eq!(parsed, Some(PostbackAction::PlaceSelected(place)));
    }

    #[test]
    fn malformed_id_is_none() {
        assert_eq!(parse_postback("group_id=not-a-uuid", None), None);
    }

    #[test]
    fn parses_confirm_tokens() {
        assert_eq!(
            parse_postback("action=approve", None),
            Some(PostbackAction::Confirm(ConfirmAction::Approve))
        );
        assert_eq!(
            parse_postback("action=cancel", None),
            Some(PostbackAction::Confirm(ConfirmAction::Cancel))
        );
        assert_eq!(parse_postback("action=maybe", None), None);
    }

    #[test]
    fn picker_params_win_over_label_data() {
        let params = PostbackParams {
            date: Some("2026-09-12".to_string()),
            ..PostbackParams::default()
        };
        let parsed = parse_postback("Pick a date", Some(&params));
        assert_eq!(
            parsed,
            Some(PostbackAction::DatePicked(
                NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()
            ))
        );

        let params = PostbackParams {
            time: Some("13:30".to_string()),
            ..PostbackParams::default()
        };
        let parsed = parse_postback("Pick a time", Some(&params));
        assert_eq!(
            parsed,
            Some(PostbackAction::TimePicked(
                NaiveTime::from_hms_opt(13, 30, 0).unwrap()
            ))
        );
    }

    #[test]
    fn garbage_without_params_is_none() {
        assert_eq!(parse_postback("definitely not a token", None), None);
        let empty = PostbackParams::default();
        assert_eq!(parse_postback("still nothing", Some(&empty)), None);
    }
}
