//! Outbound message payload shapes.
//!
//! These serialize to the messaging platform's wire format (camelCase,
//! `type`-tagged objects): plain text, buttons/confirm/carousel
//! templates, and postback / datetime-picker actions.

use serde::{Deserialize, Serialize};

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text {
        text: String,
    },
    Template {
        #[serde(rename = "altText")]
        alt_text: String,
        template: Template,
    },
}

impl Message {
    /// Plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Message::Text { text: text.into() }
    }
}

/// Template payloads: a titled button list, a yes/no confirm, or a
/// paged carousel of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Template {
    Buttons {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: String,
        actions: Vec<Action>,
    },
    Confirm {
        text: String,
        actions: Vec<Action>,
    },
    Carousel {
        columns: Vec<CarouselColumn>,
    },
}

/// One card of a carousel template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselColumn {
    #[serde(
        rename = "thumbnailImageUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_image_url: Option<String>,
    pub text: String,
    pub actions: Vec<Action>,
}

/// Button actions. `data` is the opaque postback token echoed back to
/// the webhook when the button is pressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Postback {
        label: String,
        data: String,
        #[serde(rename = "displayText", skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
    },
    #[serde(rename = "datetimepicker")]
    DatetimePicker {
        label: String,
        data: String,
        mode: PickerMode,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerMode {
    Date,
    Time,
    Datetime,
}

/// The slice of a member profile we use: the display name shown in the
/// welcome message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_wire_shape() {
        let json = serde_json::to_value(Message::text("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "text": "hello"}));
    }

    #[test]
    fn confirm_template_wire_shape() {
        let msg = Message::Template {
            alt_text: "confirm".to_string(),
            template: Template::Confirm {
                text: "Really leave?".to_string(),
                actions: vec![Action::Postback {
                    label: "Leave".to_string(),
                    data: "action=approve".to_string(),
                    display_text: Some("Leave".to_string()),
                }],
            },
        };

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "template");
        assert_eq!(json["altText"], "confirm");
        assert_eq!(json["template"]["type"], "confirm");
        assert_eq!(json["template"]["actions"][0]["type"], "postback");
        assert_eq!(json["template"]["actions"][0]["displayText"], "Leave");
    }

    #[test]
    fn datetime_picker_wire_shape() {
        let action = Action::DatetimePicker {
            label: "Pick a time".to_string(),
            data: "pick_time".to_string(),
            mode: PickerMode::Time,
            initial: Some("13:00".to_string()),
        };

        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "datetimepicker");
        assert_eq!(json["mode"], "time");
        assert_eq!(json["initial"], "13:00");
    }

    #[test]
    fn buttons_template_omits_missing_title() {
        let msg = Message::Template {
            alt_text: "buttons".to_string(),
            template: Template::Buttons {
                title: None,
                text: "Choose".to_string(),
                actions: vec![],
            },
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["template"].get("title").is_none());
    }
}
