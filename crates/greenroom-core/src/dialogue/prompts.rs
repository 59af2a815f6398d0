//! Outbound message construction.
//!
//! Pure functions from (dialogue phase, domain snapshot) to the
//! structured payloads in `greenroom_types::message`. Nothing in here
//! touches storage or the network, which keeps every prompt testable
//! as plain data.

use chrono::{Datelike, NaiveDate};
use greenroom_types::group::Membership;
use greenroom_types::message::{Action, CarouselColumn, Message, PickerMode, Template};
use greenroom_types::place::Place;
use greenroom_types::practice::PracticeView;

use super::{CAROUSEL_COLUMN_MAX, MAX_JOINABLE_GROUPS};
use super::action::{DATE_FORMAT, TIME_FORMAT};

// ---------------------------------------------------------------------------
// Fixed texts
// ---------------------------------------------------------------------------

pub const GENERIC_ERROR: &str = "Something went wrong. Please talk to me again";
pub const JOIN_PROMPT: &str = "Joining a group? Please type its join code";
pub const JOIN_CODE_NOT_FOUND: &str = "No group with that join code exists";
pub const ALREADY_MEMBER: &str = "You are already a member of that group";
pub const NO_GROUPS: &str = "You are not a member of any group";
pub const NO_PRACTICES: &str = "No practices are scheduled";
pub const NO_PLACES: &str =
    "Your troupe has no rehearsal venues registered yet.\nAsk a troupe admin to add one first";
pub const NOT_A_MEMBER_HINT: &str =
    "You haven't joined a group yet.\nTap \"Join a group\" in the menu to get started";
pub const CANNOT_ANSWER: &str = "Sorry!\nThis account cannot answer messages >_<";
pub const DATE_IN_PAST: &str = "[Error]\nPlease pick today or a future date";
pub const DUPLICATE_PRACTICE: &str = "A group cannot have two practices at the same venue \
     on the same date with the same start time.\nPlease start over from the menu";
pub const END_NOT_AFTER_START: &str =
    "[Error]\nThe end time must be after the start time";
pub const STAYING: &str = "Glad you're staying.\nNothing has changed";

const ASK_PLACE_TEXT: &str = "Add a practice (1/4)\nChoose a rehearsal venue";
const DEFAULT_PICKER_TIME: &str = "13:00";
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Columns per carousel page. One below the platform cap: the original
/// deployment reserved the last slot, and the page size is pinned by
/// test either way.
pub const CAROUSEL_PAGE_SIZE: usize = CAROUSEL_COLUMN_MAX - 1;

pub fn welcome(display_name: &str) -> String {
    format!("Hello! I'm the rehearsal manager bot.\n{display_name}, great to have you on board")
}

pub fn too_many_groups() -> String {
    format!(
        "You can belong to at most {MAX_JOINABLE_GROUPS} groups.\nLeave one with \
         \"Leave a group\" in the menu and try again"
    )
}

pub fn joined(group_name: &str) -> String {
    format!("You have joined \"{group_name}\"")
}

pub fn left(group_name: &str) -> String {
    format!("You have left \"{group_name}\". Thanks for your time together")
}

// ---------------------------------------------------------------------------
// Date/time formatting
// ---------------------------------------------------------------------------

/// Chat display format for a date: `09/12 (Sat)`.
pub fn format_date(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    format!("{} ({})", date.format("%m/%d"), weekday)
}

fn format_view_line(view: &PracticeView) -> String {
    let end = view
        .end
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default();
    format!(
        "{} {}~{} @ {}",
        format_date(view.date),
        view.start.format(TIME_FORMAT),
        end,
        view.place_name
    )
}

/// The "my practices" listing: one block per group, blank line between
/// groups.
pub fn schedule_text(groups: &[(String, Vec<PracticeView>)]) -> String {
    let mut body = String::new();
    for (i, (group_name, views)) in groups.iter().enumerate() {
        body.push_str(&format!("[{group_name}]\n"));
        for view in views {
            body.push_str(&format_view_line(view));
            body.push('\n');
        }
        if i + 1 < groups.len() {
            body.push('\n');
        }
    }
    format!("Upcoming practices:\n\n{body}")
}

/// Confirmation text after a practice is created.
pub fn practice_summary(
    group_name: &str,
    place_name: &str,
    date: NaiveDate,
    start: chrono::NaiveTime,
    end: chrono::NaiveTime,
) -> String {
    format!(
        "Registered the following practice.\n[Group]\n{group_name}\n[Venue]\n{place_name}\n\
         [Date]\n{}\n[Time]\n{}~{}",
        date.format(DATE_FORMAT),
        start.format(TIME_FORMAT),
        end.format(TIME_FORMAT)
    )
}

/// The daily notifier's push body for one group.
pub fn notification_text(views: &[PracticeView]) -> String {
    let mut text = String::from("You have practice tomorrow.\nLet's make it count!\n");
    for view in views {
        text.push_str(&format!("{}\n{}\n", view.group_name, format_view_line(view)));
    }
    text
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

fn group_buttons(memberships: &[Membership]) -> Vec<Action> {
    memberships
        .iter()
        .map(|m| Action::Postback {
            label: m.group_name.clone(),
            data: format!("group_id={}", m.group_key),
            display_text: Some(m.group_name.clone()),
        })
        .collect()
}

/// "Which group's practice do you want to add?" button list.
pub fn ask_group_message(memberships: &[Membership]) -> Message {
    Message::Template {
        alt_text: "Add a practice".to_string(),
        template: Template::Buttons {
            title: Some("Choose a group".to_string()),
            text: "Which group's practice do you want to add?".to_string(),
            actions: group_buttons(memberships),
        },
    }
}

/// "Which group do you want to leave?" button list.
pub fn withdraw_group_message(memberships: &[Membership]) -> Message {
    Message::Template {
        alt_text: "Leave a group".to_string(),
        template: Template::Buttons {
            title: Some("Leave a group".to_string()),
            text: "Which group do you want to leave?".to_string(),
            actions: group_buttons(memberships),
        },
    }
}

/// Yes/no confirm before a withdrawal goes through.
pub fn withdraw_confirm_message(group_name: &str) -> Message {
    Message::Template {
        alt_text: "Confirm leaving".to_string(),
        template: Template::Confirm {
            text: format!("Really leave \"{group_name}\"?"),
            actions: vec![
                Action::Postback {
                    label: "Leave".to_string(),
                    data: "action=approve".to_string(),
                    display_text: Some("Leave".to_string()),
                },
                Action::Postback {
                    label: "Stay".to_string(),
                    data: "action=cancel".to_string(),
                    display_text: Some("Stay".to_string()),
                },
            ],
        },
    }
}

/// Number of carousel pages needed for `total` venues.
pub fn carousel_page_count(total: usize) -> usize {
    total.div_ceil(CAROUSEL_PAGE_SIZE)
}

fn place_column(place: &Place) -> CarouselColumn {
    CarouselColumn {
        thumbnail_image_url: place.image_url.clone(),
        text: place.name.clone(),
        actions: vec![Action::Postback {
            label: "Choose".to_string(),
            data: format!("place={}", place.id),
            display_text: Some(place.name.clone()),
        }],
    }
}

/// The venue carousel, split into pages of [`CAROUSEL_PAGE_SIZE`].
pub fn place_carousel_messages(places: &[Place]) -> Vec<Message> {
    places
        .chunks(CAROUSEL_PAGE_SIZE)
        .map(|page| Message::Template {
            alt_text: "Choose a rehearsal venue".to_string(),
            template: Template::Carousel {
                columns: page.iter().map(place_column).collect(),
            },
        })
        .collect()
}

/// Step 1/4 reply: intro text followed by the venue carousel pages.
pub fn ask_place_messages(places: &[Place]) -> Vec<Message> {
    let mut messages = vec![Message::text(ASK_PLACE_TEXT)];
    messages.extend(place_carousel_messages(places));
    messages
}

/// Step 2/4 reply: the date picker.
pub fn ask_date_message() -> Message {
    Message::Template {
        alt_text: "Add a practice".to_string(),
        template: Template::Buttons {
            title: Some("Add a practice (2/4)".to_string()),
            text: "Pick the practice date".to_string(),
            actions: vec![Action::DatetimePicker {
                label: "Pick a date".to_string(),
                data: "pick_date".to_string(),
                mode: PickerMode::Date,
                initial: None,
            }],
        },
    }
}

/// Which time the picker is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAsk {
    Start,
    End,
}

/// Steps 3/4 and 4/4: the time picker, differing only in title/body.
pub fn ask_time_message(ask: TimeAsk) -> Message {
    let (title, text) = match ask {
        TimeAsk::Start => ("Add a practice (3/4)", "Pick the start time"),
        TimeAsk::End => ("Add a practice (4/4)", "Pick the end time"),
    };
    Message::Template {
        alt_text: "Add a practice".to_string(),
        template: Template::Buttons {
            title: Some(title.to_string()),
            text: text.to_string(),
            actions: vec![Action::DatetimePicker {
                label: "Pick a time".to_string(),
                data: "pick_time".to_string(),
                mode: PickerMode::Time,
                initial: Some(DEFAULT_PICKER_TIME.to_string()),
            }],
        },
    }
}
