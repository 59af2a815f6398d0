//! SQLite group repository implementation.

use chrono::Utc;
use greenroom_core::repository::group::GroupRepository;
use greenroom_types::error::RepositoryError;
use greenroom_types::group::{Group, GroupKey};
use greenroom_types::team::TeamId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{LIST_LIMIT, format_datetime, parse_datetime, query_error};

pub struct SqliteGroupRepository {
    pool: DatabasePool,
}

impl SqliteGroupRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct GroupRow {
    group_key: String,
    join_code: String,
    team_id: String,
    name: String,
    is_deleted: i64,
    created_at: String,
    updated_at: String,
}

impl GroupRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            group_key: row.try_get("group_key")?,
            join_code: row.try_get("join_code")?,
            team_id: row.try_get("team_id")?,
            name: row.try_get("name")?,
            is_deleted: row.try_get("is_deleted")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_group(self) -> Result<Group, RepositoryError> {
        let key = self
            .group_key
            .parse::<GroupKey>()
            .map_err(|e| RepositoryError::Query(format!("invalid group key: {e}")))?;
        let team_id = self
            .team_id
            .parse::<TeamId>()
            .map_err(|e| RepositoryError::Query(format!("invalid team id: {e}")))?;
        Ok(Group {
            key,
            join_code: self.join_code,
            team_id,
            name: self.name,
            deleted: self.is_deleted != 0,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl GroupRepository for SqliteGroupRepository {
    async fn get_by_join_code(&self, join_code: &str) -> Result<Option<Group>, RepositoryError> {
        let row =
            sqlx::query("SELECT * FROM groups WHERE join_code = ? AND is_deleted = 0 LIMIT 1")
                .bind(join_code)
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(GroupRow::from_row(&row).map_err(query_error)?.into_group()?)),
            None => Ok(None),
        }
    }

    async fn get_by_key(&self, key: &GroupKey) -> Result<Option<Group>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM groups WHERE group_key = ?")
            .bind(key.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(GroupRow::from_row(&row).map_err(query_error)?.into_group()?)),
            None => Ok(None),
        }
    }

    async fn list(&self, team_id: &TeamId) -> Result<Vec<Group>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM groups WHERE team_id = ? AND is_deleted = 0
             ORDER BY created_at LIMIT ?",
        )
        .bind(team_id.to_string())
        .bind(LIST_LIMIT)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in &rows {
            groups.push(GroupRow::from_row(row).map_err(query_error)?.into_group()?);
        }
        Ok(groups)
    }

    async fn create(&self, group: &Group) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO groups (group_key, join_code, team_id, name, is_deleted, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(group.key.to_string())
        .bind(&group.join_code)
        .bind(group.team_id.to_string())
        .bind(&group.name)
        .bind(group.deleted as i64)
        .bind(format_datetime(&group.created_at))
        .bind(format_datetime(&group.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn rename(&self, key: &GroupKey, name: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE groups SET name = ?, updated_at = ? WHERE group_key = ?")
            .bind(name)
            .bind(format_datetime(&Utc::now()))
            .bind(key.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete(&self, key: &GroupKey) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE groups SET is_deleted = 1, updated_at = ? WHERE group_key = ?")
                .bind(format_datetime(&Utc::now()))
                .bind(key.to_string())
                .execute(&self.pool.writer)
                .await
                .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testutil::{seed_group, seed_team, test_pool};

    #[tokio::test]
    async fn join_code_lookup_finds_live_groups_only() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let group = seed_group(&pool, &team.id, "Night Crew", "nc2026").await;
        let repo = SqliteGroupRepository::new(pool);

        let found = repo.get_by_join_code("nc2026").await.unwrap().unwrap();
        assert_eq!(found.key, group.key);
        assert_eq!(found.name, "Night Crew");

        repo.soft_delete(&group.key).await.unwrap();
        assert!(repo.get_by_join_code("nc2026").await.unwrap().is_none());
        // The key still resolves; soft delete keeps the row.
        let gone = repo.get_by_key(&group.key).await.unwrap().unwrap();
        assert!(gone.deleted);
    }

    #[tokio::test]
    async fn list_excludes_deleted_and_other_teams() {
        let pool = test_pool().await;
        let team_a = seed_team(&pool).await;
        let team_b = seed_team(&pool).await;
        let kept = seed_group(&pool, &team_a.id, "Kept", "code-a").await;
        let dropped = seed_group(&pool, &team_a.id, "Dropped", "code-b").await;
        seed_group(&pool, &team_b.id, "Elsewhere", "code-c").await;
        let repo = SqliteGroupRepository::new(pool);

        repo.soft_delete(&dropped.key).await.unwrap();

        let groups = repo.list(&team_a.id).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, kept.key);
    }

    #[tokio::test]
    async fn create_and_rename() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let repo = SqliteGroupRepository::new(pool);

        let now = Utc::now();
        let group = Group {
            key: GroupKey::new(),
            join_code: "fresh".to_string(),
            team_id: team.id.clone(),
            name: "Fresh".to_string(),
            deleted: false,
            created_at: now,
            updated_at: now,
        };
        repo.create(&group).await.unwrap();

        repo.rename(&group.key, "Renamed").await.unwrap();
        let found = repo.get_by_key(&group.key).await.unwrap().unwrap();
        assert_eq!(found.name, "Renamed");
    }

    #[tokio::test]
    async fn rename_missing_group_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteGroupRepository::new(pool);
        let err = repo.rename(&GroupKey::new(), "x").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
