//! Team repository trait definition.

use greenroom_types::error::RepositoryError;
use greenroom_types::team::{Team, TeamId};

pub trait TeamRepository: Send + Sync {
    fn get(
        &self,
        id: &TeamId,
    ) -> impl std::future::Future<Output = Result<Option<Team>, RepositoryError>> + Send;

    fn create(
        &self,
        team: &Team,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
