//! LINE Messaging API client.
//!
//! Implements [`MessagingClient`] over the REST endpoints: `reply`
//! consumes the per-event reply token, `push` addresses an account
//! directly, `get_profile` fetches the member's display name.

use greenroom_core::messaging::MessagingClient;
use greenroom_types::account::AccountId;
use greenroom_types::error::MessagingError;
use greenroom_types::message::{Message, Profile};
use serde::Serialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.line.me";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [Message],
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: &'a [Message],
}

pub struct LineClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl LineClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(), MessagingError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| MessagingError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(MessagingError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl MessagingClient for LineClient {
    async fn reply(&self, reply_token: &str, messages: &[Message]) -> Result<(), MessagingError> {
        debug!(count = messages.len(), "sending reply");
        self.post_json(
            "/v2/bot/message/reply",
            &ReplyRequest {
                reply_token,
                messages,
            },
        )
        .await
    }

    async fn push(&self, to: &AccountId, messages: &[Message]) -> Result<(), MessagingError> {
        debug!(to = %to, count = messages.len(), "sending push");
        self.post_json(
            "/v2/bot/message/push",
            &PushRequest {
                to: to.as_str(),
                messages,
            },
        )
        .await
    }

    async fn get_profile(&self, account_id: &AccountId) -> Result<Profile, MessagingError> {
        let response = self
            .http
            .get(format!("{}/v2/bot/profile/{}", self.base_url, account_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| MessagingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MessagingError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<Profile>()
            .await
            .map_err(|e| MessagingError::InvalidResponse(e.to_string()))
    }
}
