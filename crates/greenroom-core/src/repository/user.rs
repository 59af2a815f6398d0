//! API user repository trait definition.

use greenroom_types::error::RepositoryError;
use greenroom_types::user::{User, UserId};

/// Persistence for HTTP API operators and their bearer-token hashes.
pub trait UserRepository: Send + Sync {
    fn get(
        &self,
        id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn create(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Store the SHA-256 hash of a freshly issued bearer token.
    fn set_token_hash(
        &self,
        id: &UserId,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Resolve a token hash to its enabled, non-deleted user.
    fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
