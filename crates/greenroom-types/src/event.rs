//! Inbound webhook payload shapes.
//!
//! Mirrors the messaging platform's webhook JSON: camelCase field
//! names, one `events` array per delivery, and per-event `message` /
//! `postback` objects whose presence depends on the event type.

use serde::{Deserialize, Serialize};

/// Top-level webhook body: `{"destination": "...", "events": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One delivered event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub message: Option<InboundMessage>,
    #[serde(default)]
    pub postback: Option<PostbackEvent>,
}

/// Event types the bot reacts to. Anything else folds into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Follow,
    Unfollow,
    Message,
    Postback,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Inbound message content. Only `text` messages drive the dialogue.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// A button press: the registered `data` string plus, for picker
/// actions, the value the member picked.
#[derive(Debug, Clone, Deserialize)]
pub struct PostbackEvent {
    pub data: String,
    #[serde(default)]
    pub params: Option<PostbackParams>,
}

/// Picker results attached to a postback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostbackParams {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_message_event() {
        let raw = r#"{
            "destination": "U000",
            "events": [{
                "type": "message",
                "source": {"userId": "U123", "type": "user"},
                "replyToken": "rt-1",
                "message": {"id": "m1", "type": "text", "text": "abc12345"}
            }]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.events.len(), 1);
        let event = &payload.events[0];
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(event.source.as_ref().unwrap().user_id.as_deref(), Some("U123"));
        assert_eq!(event.message.as_ref().unwrap().text.as_deref(), Some("abc12345"));
    }

    #[test]
    fn parses_postback_with_picker_params() {
        let raw = r#"{
            "events": [{
                "type": "postback",
                "source": {"userId": "U123"},
                "replyToken": "rt-2",
                "postback": {"data": "Pick a date", "params": {"date": "2026-09-12"}}
            }]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(raw).unwrap();
        let postback = payload.events[0].postback.as_ref().unwrap();
        assert_eq!(
            postback.params.as_ref().unwrap().date.as_deref(),
            Some("2026-09-12")
        );
    }

    #[test]
    fn unknown_event_type_folds_into_other() {
        let raw = r#"{"events": [{"type": "memberJoined", "source": {"userId": "U1"}}]}"#;
        let payload: WebhookPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.events[0].kind, EventKind::Other);
    }

    #[test]
    fn empty_events_array_parses() {
        let payload: WebhookPayload = serde_json::from_str(r#"{"events": []}"#).unwrap();
        assert!(payload.events.is_empty());
    }
}
