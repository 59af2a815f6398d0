//! Membership repository trait definition.

use greenroom_types::account::AccountId;
use greenroom_types::error::RepositoryError;
use greenroom_types::group::{GroupKey, Membership};

/// Persistence for the account/group many-to-many relation.
pub trait MembershipRepository: Send + Sync {
    /// Groups the account currently belongs to, denormalized for the
    /// dialogue (name, join code, owning team).
    fn list_groups(
        &self,
        account_id: &AccountId,
    ) -> impl std::future::Future<Output = Result<Vec<Membership>, RepositoryError>> + Send;

    /// Join a group. Duplicate joins surface as `Conflict`.
    fn create(
        &self,
        group_key: &GroupKey,
        account_id: &AccountId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Leave a group.
    fn delete(
        &self,
        group_key: &GroupKey,
        account_id: &AccountId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Accounts belonging to a group (the notifier's fan-out list).
    fn list_accounts(
        &self,
        group_key: &GroupKey,
    ) -> impl std::future::Future<Output = Result<Vec<AccountId>, RepositoryError>> + Send;
}
