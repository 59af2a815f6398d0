//! Outbound messaging client trait definition.
//!
//! The platform client in greenroom-infra implements this; the
//! dialogue layer and the notifier only ever see the trait.

use greenroom_types::account::AccountId;
use greenroom_types::error::MessagingError;
use greenroom_types::message::{Message, Profile};

/// A capability to send structured messages to chat accounts.
///
/// `reply` consumes the per-event reply token and must be used within
/// the webhook request lifecycle; `push` is the out-of-band channel the
/// daily notifier uses.
pub trait MessagingClient: Send + Sync {
    fn reply(
        &self,
        reply_token: &str,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<(), MessagingError>> + Send;

    fn push(
        &self,
        to: &AccountId,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<(), MessagingError>> + Send;

    /// Fetch the member profile (display name) for the welcome message.
    fn get_profile(
        &self,
        account_id: &AccountId,
    ) -> impl std::future::Future<Output = Result<Profile, MessagingError>> + Send;
}
