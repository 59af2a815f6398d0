//! SQLite place (rehearsal venue) repository implementation.

use greenroom_core::repository::place::PlaceRepository;
use greenroom_types::error::RepositoryError;
use greenroom_types::place::{Place, PlaceId};
use greenroom_types::team::TeamId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{LIST_LIMIT, format_datetime, parse_datetime, query_error};

pub struct SqlitePlaceRepository {
    pool: DatabasePool,
}

impl SqlitePlaceRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct PlaceRow {
    place_id: String,
    team_id: String,
    name: String,
    address: String,
    image_url: Option<String>,
    created_at: String,
    updated_at: String,
}

impl PlaceRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            place_id: row.try_get("place_id")?,
            team_id: row.try_get("team_id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_place(self) -> Result<Place, RepositoryError> {
        Ok(Place {
            id: self
                .place_id
                .parse::<PlaceId>()
                .map_err(|e| RepositoryError::Query(format!("invalid place id: {e}")))?,
            team_id: self
                .team_id
                .parse::<TeamId>()
                .map_err(|e| RepositoryError::Query(format!("invalid team id: {e}")))?,
            name: self.name,
            address: self.address,
            image_url: self.image_url,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl PlaceRepository for SqlitePlaceRepository {
    async fn list(&self, team_id: &TeamId) -> Result<Vec<Place>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM places WHERE team_id = ? ORDER BY created_at LIMIT ?",
        )
        .bind(team_id.to_string())
        .bind(LIST_LIMIT)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut places = Vec::with_capacity(rows.len());
        for row in &rows {
            places.push(PlaceRow::from_row(row).map_err(query_error)?.into_place()?);
        }
        Ok(places)
    }

    async fn get(&self, id: &PlaceId) -> Result<Option<Place>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM places WHERE place_id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(PlaceRow::from_row(&row).map_err(query_error)?.into_place()?)),
            None => Ok(None),
        }
    }

    async fn create(&self, place: &Place) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO places (place_id, team_id, name, address, image_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(place.id.to_string())
        .bind(place.team_id.to_string())
        .bind(&place.name)
        .bind(&place.address)
        .bind(&place.image_url)
        .bind(format_datetime(&place.created_at))
        .bind(format_datetime(&place.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testutil::{seed_place, seed_team, test_pool};
    use chrono::Utc;

    #[tokio::test]
    async fn create_and_get() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let repo = SqlitePlaceRepository::new(pool);

        let now = Utc::now();
        let place = Place {
            id: PlaceId::new(),
            team_id: team.id.clone(),
            name: "Studio A".to_string(),
            address: "2 Stage Rd".to_string(),
            image_url: Some("https://example.com/a.jpg".to_string()),
            created_at: now,
            updated_at: now,
        };
        repo.create(&place).await.unwrap();

        let found = repo.get(&place.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Studio A");
        assert_eq!(found.image_url.as_deref(), Some("https://example.com/a.jpg"));
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_team() {
        let pool = test_pool().await;
        let team_a = seed_team(&pool).await;
        let team_b = seed_team(&pool).await;
        seed_place(&pool, &team_a.id, "Studio A").await;
        seed_place(&pool, &team_a.id, "Studio B").await;
        seed_place(&pool, &team_b.id, "Elsewhere").await;
        let repo = SqlitePlaceRepository::new(pool);

        let places = repo.list(&team_a.id).await.unwrap();
        assert_eq!(places.len(), 2);
        assert!(places.iter().all(|p| p.team_id == team_a.id));
    }

    #[tokio::test]
    async fn missing_place_is_none() {
        let pool = test_pool().await;
        let repo = SqlitePlaceRepository::new(pool);
        assert!(repo.get(&PlaceId::new()).await.unwrap().is_none());
    }
}
