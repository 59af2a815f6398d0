//! Messaging platform webhook entry point.
//!
//! Every inbound chat event lands here. The handler verifies the
//! request signature against the raw body, answers the platform's
//! verification ping, then processes each event under the per-account
//! lock. Event processing failures are logged but never surface as a
//! non-2xx status: the platform would retry the whole delivery and we
//! would handle duplicate events instead.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use greenroom_core::dialogue::action::parse_postback;
use greenroom_core::dialogue::engine::Inbound;
use greenroom_core::dialogue::prompts;
use greenroom_core::messaging::MessagingClient;
use greenroom_core::repository::account::AccountRepository;
use greenroom_infra::line::verify_signature;
use greenroom_types::account::AccountId;
use greenroom_types::error::RepositoryError;
use greenroom_types::event::{EventKind, WebhookEvent, WebhookPayload};
use greenroom_types::message::Message;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// User agent the platform sends on webhook URL verification.
const VERIFICATION_UA: &str = "LineBotWebhook/2.0";

/// POST /webhook/line
pub async fn line_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !verify_signature(&state.config.line.channel_secret, &body, signature) {
        warn!("webhook signature verification failed");
        return StatusCode::FORBIDDEN.into_response();
    }

    if body.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "unparseable webhook body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    // URL verification: the platform probes with an empty events array.
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if payload.events.is_empty() && user_agent == VERIFICATION_UA {
        info!("webhook verification ping");
        return Json(json!({"success": true, "data": "ok"})).into_response();
    }

    for event in &payload.events {
        if let Err(err) = process_event(&state, event).await {
            error!(error = %err, kind = ?event.kind, "webhook event processing failed");
        }
    }

    Json(json!({"success": true, "data": "ok"})).into_response()
}

/// What to do with an event, given whether the account already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactGate {
    /// Follow from a known account (re-follow after an unfollow we
    /// never saw, or a duplicate delivery). Nothing to do.
    DuplicateFollow,
    /// First follow: register the account and greet.
    Welcome,
    /// Message or postback from an account we have no row for. The
    /// account was lost (or the follow event never arrived); recreate
    /// it and apologize out-of-band.
    RecoverMissing,
    /// Unfollow or block: drop the account.
    Farewell,
    /// Normal dialogue traffic.
    Dialogue,
}

fn classify_contact(account_exists: bool, kind: EventKind) -> ContactGate {
    match (kind, account_exists) {
        (EventKind::Follow, true) => ContactGate::DuplicateFollow,
        (EventKind::Follow, false) => ContactGate::Welcome,
        (EventKind::Unfollow, _) => ContactGate::Farewell,
        (_, false) => ContactGate::RecoverMissing,
        (_, true) => ContactGate::Dialogue,
    }
}

async fn process_event(state: &AppState, event: &WebhookEvent) -> anyhow::Result<()> {
    let Some(user_id) = event.source.as_ref().and_then(|s| s.user_id.as_deref()) else {
        debug!(kind = ?event.kind, "event without a user source, skipping");
        return Ok(());
    };
    let account_id = AccountId::from(user_id);

    // Serialize the whole read-session/compute/write-session sequence
    // per account.
    let _guard = state.locks.acquire(&account_id).await;

    let account = state.accounts.get(&account_id).await?;

    match classify_contact(account.is_some(), event.kind) {
        ContactGate::DuplicateFollow => {
            info!(account = %account_id, "follow from an already registered account");
        }
        ContactGate::Welcome => {
            state.accounts.create(&account_id).await?;
            let display_name = match state.line.get_profile(&account_id).await {
                Ok(profile) => profile.display_name,
                Err(err) => {
                    warn!(account = %account_id, error = %err, "profile fetch failed");
                    "there".to_string()
                }
            };
            info!(account = %account_id, "registered new account");
            if let Some(token) = &event.reply_token {
                state
                    .line
                    .reply(token, &[Message::text(prompts::welcome(&display_name))])
                    .await?;
            }
        }
        ContactGate::RecoverMissing => {
            warn!(account = %account_id, "event from an unregistered account, recreating");
            state.accounts.create(&account_id).await?;
            state
                .line
                .push(&account_id, &[Message::text(prompts::GENERIC_ERROR)])
                .await?;
        }
        ContactGate::Farewell => {
            match state.accounts.delete(&account_id).await {
                Ok(()) => info!(account = %account_id, "account removed on unfollow"),
                Err(RepositoryError::NotFound) => {
                    debug!(account = %account_id, "unfollow for an unknown account");
                }
                Err(err) => return Err(err.into()),
            }
        }
        ContactGate::Dialogue => {
            let Some(account) = account else {
                return Ok(());
            };
            let Some(input) = decode_inbound(event) else {
                debug!(account = %account_id, "event carries no actionable input");
                return Ok(());
            };
            let today = Utc::now().date_naive();
            let messages = state
                .engine
                .handle(&account_id, account.session, input, today)
                .await?;
            if messages.is_empty() {
                return Ok(());
            }
            if let Some(token) = &event.reply_token {
                state.line.reply(token, &messages).await?;
            }
        }
    }

    Ok(())
}

/// Lower a raw webhook event to dialogue input. `None` for anything the
/// engine has no business seeing (stickers, images, stale or malformed
/// postbacks).
fn decode_inbound(event: &WebhookEvent) -> Option<Inbound> {
    match event.kind {
        EventKind::Message => {
            let message = event.message.as_ref()?;
            if message.kind != "text" {
                return None;
            }
            message.text.clone().map(Inbound::Text)
        }
        EventKind::Postback => {
            let postback = event.postback.as_ref()?;
            parse_postback(&postback.data, postback.params.as_ref()).map(Inbound::Postback)
        }
        _ => None,
    }
}
