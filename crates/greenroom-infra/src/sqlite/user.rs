//! SQLite API user repository implementation.

use chrono::Utc;
use greenroom_core::repository::user::UserRepository;
use greenroom_types::error::RepositoryError;
use greenroom_types::team::TeamId;
use greenroom_types::user::{User, UserId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    let user_id: String = row.try_get("user_id").map_err(query_error)?;
    let team_id: String = row.try_get("team_id").map_err(query_error)?;
    let is_admin: i64 = row.try_get("is_admin").map_err(query_error)?;
    let is_enabled: i64 = row.try_get("is_enabled").map_err(query_error)?;
    let is_deleted: i64 = row.try_get("is_deleted").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    let updated_at: String = row.try_get("updated_at").map_err(query_error)?;

    Ok(User {
        id: UserId::from(user_id),
        display_name: row.try_get("display_name").map_err(query_error)?,
        team_id: team_id
            .parse::<TeamId>()
            .map_err(|e| RepositoryError::Query(format!("invalid team id: {e}")))?,
        admin: is_admin != 0,
        enabled: is_enabled != 0,
        deleted: is_deleted != 0,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl UserRepository for SqliteUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE user_id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (user_id, display_name, team_id, is_admin, is_enabled, is_deleted,
                                token_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, NULL, ?, ?)",
        )
        .bind(user.id.as_str())
        .bind(&user.display_name)
        .bind(user.team_id.to_string())
        .bind(user.admin as i64)
        .bind(user.enabled as i64)
        .bind(user.deleted as i64)
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("user '{}' already exists", user.id)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn set_token_hash(&self, id: &UserId, token_hash: &str) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET token_hash = ?, updated_at = ? WHERE user_id = ?")
                .bind(token_hash)
                .bind(format_datetime(&Utc::now()))
                .bind(id.as_str())
                .execute(&self.pool.writer)
                .await
                .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM users
             WHERE token_hash = ? AND is_enabled = 1 AND is_deleted = 0",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        row.as_ref().map(user_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testutil::{seed_team, test_pool};
    use crate::token::token_hash;

    fn make_user(team_id: &TeamId, id: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::from(id),
            display_name: "Stage Manager".to_string(),
            team_id: team_id.clone(),
            admin: false,
            enabled: true,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_get_and_token_lookup() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let repo = SqliteUserRepository::new(pool);
        let user = make_user(&team.id, "ops-1");

        repo.create(&user).await.unwrap();
        let found = repo.get(&user.id).await.unwrap().unwrap();
        assert_eq!(found.display_name, "Stage Manager");

        let hash = token_hash("issued-token");
        repo.set_token_hash(&user.id, &hash).await.unwrap();

        let by_token = repo.find_by_token_hash(&hash).await.unwrap().unwrap();
        assert_eq!(by_token.id, user.id);
        assert!(repo.find_by_token_hash("wrong").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn disabled_users_cannot_authenticate() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let repo = SqliteUserRepository::new(pool.clone());
        let user = make_user(&team.id, "ops-1");
        repo.create(&user).await.unwrap();

        let hash = token_hash("issued-token");
        repo.set_token_hash(&user.id, &hash).await.unwrap();

        sqlx::query("UPDATE users SET is_enabled = 0 WHERE user_id = ?")
            .bind(user.id.as_str())
            .execute(&pool.writer)
            .await
            .unwrap();

        assert!(repo.find_by_token_hash(&hash).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_user_id_is_a_conflict() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let repo = SqliteUserRepository::new(pool);
        let user = make_user(&team.id, "ops-1");

        repo.create(&user).await.unwrap();
        let err = repo.create(&user).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
