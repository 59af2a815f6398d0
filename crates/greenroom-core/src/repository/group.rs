//! Group repository trait definition.

use greenroom_types::error::RepositoryError;
use greenroom_types::group::{Group, GroupKey};
use greenroom_types::team::TeamId;

/// Persistence for troupe groups.
pub trait GroupRepository: Send + Sync {
    /// Resolve a human-shareable join code to a live (non-deleted)
    /// group.
    fn get_by_join_code(
        &self,
        join_code: &str,
    ) -> impl std::future::Future<Output = Result<Option<Group>, RepositoryError>> + Send;

    /// Fetch a group by its internal key, deleted or not.
    fn get_by_key(
        &self,
        key: &GroupKey,
    ) -> impl std::future::Future<Output = Result<Option<Group>, RepositoryError>> + Send;

    /// Live groups of a team, capped at the API list limit.
    fn list(
        &self,
        team_id: &TeamId,
    ) -> impl std::future::Future<Output = Result<Vec<Group>, RepositoryError>> + Send;

    fn create(
        &self,
        group: &Group,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn rename(
        &self,
        key: &GroupKey,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Logical delete: flips the flag, never removes the row.
    fn soft_delete(
        &self,
        key: &GroupKey,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
