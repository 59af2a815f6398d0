//! SQLite chat account repository implementation.

use chrono::Utc;
use greenroom_core::repository::account::AccountRepository;
use greenroom_types::account::{Account, AccountId};
use greenroom_types::error::RepositoryError;
use greenroom_types::session::Session;
use sqlx::Row;
use tracing::warn;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteAccountRepository {
    pool: DatabasePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AccountRow {
    account_id: String,
    session: String,
    created_at: String,
    updated_at: String,
}

impl AccountRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            account_id: row.try_get("account_id")?,
            session: row.try_get("session")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_account(self) -> Result<Account, RepositoryError> {
        // An unreadable session blob degrades to idle rather than
        // locking the account out of the bot entirely.
        let session = match serde_json::from_str::<Session>(&self.session) {
            Ok(session) => session,
            Err(error) => {
                warn!(account = %self.account_id, %error, "stored session unreadable, treating as idle");
                Session::Idle
            }
        };
        Ok(Account {
            id: AccountId::from(self.account_id),
            session,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl AccountRepository for SqliteAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM accounts WHERE account_id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let account_row = AccountRow::from_row(&row).map_err(query_error)?;
                Ok(Some(account_row.into_account()?))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, id: &AccountId) -> Result<(), RepositoryError> {
        let now = format_datetime(&Utc::now());
        let result = sqlx::query(
            "INSERT INTO accounts (account_id, session, created_at, updated_at)
             VALUES (?, '{}', ?, ?)",
        )
        .bind(id.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("account '{id}' already exists")),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn update_session(
        &self,
        id: &AccountId,
        session: &Session,
    ) -> Result<(), RepositoryError> {
        let blob =
            serde_json::to_string(session).map_err(|e| RepositoryError::Query(e.to_string()))?;
        let result =
            sqlx::query("UPDATE accounts SET session = ?, updated_at = ? WHERE account_id = ?")
                .bind(&blob)
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

    async fn delete(&self, id: &AccountId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM accounts WHERE account_id = ?")
            .bind(id.as_str())
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
    use crate::sqlite::testutil::test_pool;
    use greenroom_types::session::{AddPracticeState, Session};

    #[tokio::test]
    async fn create_get_roundtrip_starts_idle() {
        let pool = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);
        let id = AccountId::from("U100");

        repo.create(&id).await.unwrap();
        let account = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(account.id, id);
        assert_eq!(account.session, Session::Idle);
    }

    #[tokio::test]
    async fn duplicate_create_is_a_conflict() {
        let pool = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);
        let id = AccountId::from("U100");

        repo.create(&id).await.unwrap();
        let err = repo.create(&id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn session_survives_update() {
        let pool = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);
        let id = AccountId::from("U100");
        repo.create(&id).await.unwrap();

        let session = Session::AddPractice(AddPracticeState::AskGroup);
        repo.update_session(&id, &session).await.unwrap();

        let account = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(account.session, session);
    }

    #[tokio::test]
    async fn corrupt_session_degrades_to_idle() {
        let pool = test_pool().await;
        let repo = SqliteAccountRepository::new(pool.clone());
        let id = AccountId::from("U100");
        repo.create(&id).await.unwrap();

        sqlx::query("UPDATE accounts SET session = ? WHERE account_id = ?")
            .bind("{\"mode\": \"AddPractice\"}")
            .bind(id.as_str())
            .execute(&pool.writer)
            .await
            .unwrap();

        let account = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(account.session, Session::Idle);
    }

    #[tokio::test]
    async fn delete_removes_the_account() {
        let pool = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);
        let id = AccountId::from("U100");
        repo.create(&id).await.unwrap();

        repo.delete(&id).await.unwrap();
        assert!(repo.get(&id).await.unwrap().is_none());

        let err = repo.delete(&id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn updating_a_missing_account_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);

        let err = repo
            .update_session(&AccountId::from("ghost"), &Session::Idle)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
