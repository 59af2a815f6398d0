//! SQLite membership repository implementation.

use chrono::Utc;
use greenroom_core::repository::membership::MembershipRepository;
use greenroom_types::account::AccountId;
use greenroom_types::error::RepositoryError;
use greenroom_types::group::{GroupKey, Membership};
use greenroom_types::team::TeamId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, query_error};

pub struct SqliteMembershipRepository {
    pool: DatabasePool,
}

impl SqliteMembershipRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl MembershipRepository for SqliteMembershipRepository {
    async fn list_groups(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Membership>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT g.group_key, g.join_code, g.name, g.team_id
             FROM account_groups ag
             JOIN groups g ON g.group_key = ag.group_key
             WHERE ag.account_id = ? AND g.is_deleted = 0
             ORDER BY ag.created_at",
        )
        .bind(account_id.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut memberships = Vec::with_capacity(rows.len());
        for row in &rows {
            let key: String = row.try_get("group_key").map_err(query_error)?;
            let team_id: String = row.try_get("team_id").map_err(query_error)?;
            memberships.push(Membership {
                group_key: key
                    .parse::<GroupKey>()
                    .map_err(|e| RepositoryError::Query(format!("invalid group key: {e}")))?,
                join_code: row.try_get("join_code").map_err(query_error)?,
                group_name: row.try_get("name").map_err(query_error)?,
                team_id: team_id
                    .parse::<TeamId>()
                    .map_err(|e| RepositoryError::Query(format!("invalid team id: {e}")))?,
            });
        }
        Ok(memberships)
    }

    async fn create(
        &self,
        group_key: &GroupKey,
        account_id: &AccountId,
    ) -> Result<(), RepositoryError> {
        let now = format_datetime(&Utc::now());
        let result = sqlx::query(
            "INSERT INTO account_groups (account_id, group_key, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(account_id.as_str())
        .bind(group_key.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "account '{account_id}' already in group '{group_key}'"
                )))
            }
            Err(e) => Err(query_error(e)),
        }
    }

    async fn delete(
        &self,
        group_key: &GroupKey,
        account_id: &AccountId,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM account_groups WHERE account_id = ? AND group_key = ?")
                .bind(account_id.as_str())
                .bind(group_key.to_string())
                .execute(&self.pool.writer)
                .await
                .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_accounts(
        &self,
        group_key: &GroupKey,
    ) -> Result<Vec<AccountId>, RepositoryError> {
        let rows = sqlx::query("SELECT account_id FROM account_groups WHERE group_key = ?")
            .bind(group_key.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("account_id")
                    .map(AccountId::from)
                    .map_err(query_error)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::group::SqliteGroupRepository;
    use crate::sqlite::testutil::{seed_account, seed_group, seed_team, test_pool};
    use greenroom_core::repository::group::GroupRepository;

    #[tokio::test]
    async fn join_list_and_leave() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let group = seed_group(&pool, &team.id, "Night Crew", "nc").await;
        seed_account(&pool, "U1").await;
        let repo = SqliteMembershipRepository::new(pool);
        let id = AccountId::from("U1");

        repo.create(&group.key, &id).await.unwrap();

        let memberships = repo.list_groups(&id).await.unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].group_key, group.key);
        assert_eq!(memberships[0].group_name, "Night Crew");
        assert_eq!(memberships[0].team_id, team.id);

        assert_eq!(repo.list_accounts(&group.key).await.unwrap(), vec![id.clone()]);

        repo.delete(&group.key, &id).await.unwrap();
        assert!(repo.list_groups(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_join_is_a_conflict() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let group = seed_group(&pool, &team.id, "Night Crew", "nc").await;
        seed_account(&pool, "U1").await;
        let repo = SqliteMembershipRepository::new(pool);
        let id = AccountId::from("U1");

        repo.create(&group.key, &id).await.unwrap();
        let err = repo.create(&group.key, &id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleted_groups_drop_out_of_the_membership_list() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let group = seed_group(&pool, &team.id, "Night Crew", "nc").await;
        seed_account(&pool, "U1").await;
        let memberships = SqliteMembershipRepository::new(pool.clone());
        let groups = SqliteGroupRepository::new(pool);
        let id = AccountId::from("U1");

        memberships.create(&group.key, &id).await.unwrap();
        groups.soft_delete(&group.key).await.unwrap();

        assert!(memberships.list_groups(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn leaving_a_group_you_are_not_in_is_not_found() {
        let pool = test_pool().await;
        let team = seed_team(&pool).await;
        let group = seed_group(&pool, &team.id, "Night Crew", "nc").await;
        let repo = SqliteMembershipRepository::new(pool);

        let err = repo
            .delete(&group.key, &AccountId::from("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
