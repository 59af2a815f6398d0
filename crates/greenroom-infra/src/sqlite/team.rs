//! SQLite team repository implementation.

use greenroom_core::repository::team::TeamRepository;
use greenroom_types::error::RepositoryError;
use greenroom_types::team::{Team, TeamId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteTeamRepository {
    pool: DatabasePool,
}

impl SqliteTeamRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl TeamRepository for SqliteTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM teams WHERE team_id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let team_id: String = row.try_get("team_id").map_err(query_error)?;
        let created_at: String = row.try_get("created_at").map_err(query_error)?;
        let updated_at: String = row.try_get("updated_at").map_err(query_error)?;
        Ok(Some(Team {
            id: team_id
                .parse::<TeamId>()
                .map_err(|e| RepositoryError::Query(format!("invalid team id: {e}")))?,
            name: row.try_get("name").map_err(query_error)?,
            address: row.try_get("address").map_err(query_error)?,
            image_url: row.try_get("image_url").map_err(query_error)?,
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&updated_at)?,
        }))
    }

    async fn create(&self, team: &Team) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO teams (team_id, name, address, image_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(team.id.to_string())
        .bind(&team.name)
        .bind(&team.address)
        .bind(&team.image_url)
        .bind(format_datetime(&team.created_at))
        .bind(format_datetime(&team.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testutil::test_pool;
    use chrono::Utc;

    #[tokio::test]
    async fn create_and_get() {
        let pool = test_pool().await;
        let repo = SqliteTeamRepository::new(pool);

        let now = Utc::now();
        let team = Team {
            id: TeamId::new(),
            name: "Moonlight Players".to_string(),
            address: "1 Stage Rd".to_string(),
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        repo.create(&team).await.unwrap();

        let found = repo.get(&team.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Moonlight Players");
        assert!(repo.get(&TeamId::new()).await.unwrap().is_none());
    }
}
