//! Chat account repository trait definition.

use greenroom_types::account::{Account, AccountId};
use greenroom_types::error::RepositoryError;
use greenroom_types::session::Session;

/// Persistence for chat accounts and their inline dialogue session.
pub trait AccountRepository: Send + Sync {
    /// Fetch an account by platform id.
    fn get(
        &self,
        id: &AccountId,
    ) -> impl std::future::Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Create a fresh account with an idle session.
    fn create(
        &self,
        id: &AccountId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Replace the stored session wholesale.
    fn update_session(
        &self,
        id: &AccountId,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete the account entirely (unfollow/block). Memberships go
    /// with it via cascade.
    fn delete(
        &self,
        id: &AccountId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
