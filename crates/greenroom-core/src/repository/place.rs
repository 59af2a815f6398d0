//! Place repository trait definition.

use greenroom_types::error::RepositoryError;
use greenroom_types::place::{Place, PlaceId};
use greenroom_types::team::TeamId;

/// Persistence for rehearsal venues.
pub trait PlaceRepository: Send + Sync {
    fn list(
        &self,
        team_id: &TeamId,
    ) -> impl std::future::Future<Output = Result<Vec<Place>, RepositoryError>> + Send;

    fn get(
        &self,
        id: &PlaceId,
    ) -> impl std::future::Future<Output = Result<Option<Place>, RepositoryError>> + Send;

    fn create(
        &self,
        place: &Place,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
