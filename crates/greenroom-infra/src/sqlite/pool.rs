//! SQLite connection handling.
//!
//! One process owns the database file. Writes go through a dedicated
//! single-connection pool so SQLite never sees two concurrent writers;
//! reads come from a separate read-only pool sized for the handful of
//! concurrent webhook and API requests this service handles.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// A second writer connection would only queue behind SQLite's own
/// write lock.
const WRITER_CONNECTIONS: u32 = 1;
/// Webhook traffic is serialized per account and the management API is
/// low volume, so a small read pool covers the concurrency we see.
const READER_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Paired read-only and write pools over one SQLite file.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the database (creating the file if needed), run pending
    /// migrations on the write side, then open the read side.
    ///
    /// WAL journaling keeps readers unblocked while a write is in
    /// progress; foreign keys are enforced on every connection.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let writer = SqlitePoolOptions::new()
            .max_connections(WRITER_CONNECTIONS)
            .connect_with(options.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}

/// Database URL from `GREENROOM_DATA_DIR`, defaulting to
/// `~/.greenroom/greenroom.db`.
pub fn default_database_url() -> String {
    let data_dir = std::env::var("GREENROOM_DATA_DIR").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        format!("{home}/.greenroom")
    });
    format!("sqlite://{data_dir}/greenroom.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_pool(name: &str) -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join(name).display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn migrations_create_the_full_schema() {
        let (_dir, pool) = open_pool("schema.db").await;

        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table'
             AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations'",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        let mut names: Vec<&str> = rows.iter().map(|r| r.0.as_str()).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            [
                "account_groups",
                "accounts",
                "groups",
                "places",
                "practices",
                "teams",
                "users"
            ]
        );
    }

    #[tokio::test]
    async fn connections_run_wal_with_foreign_keys() {
        let (_dir, pool) = open_pool("pragmas.db").await;

        let (journal,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(journal.to_lowercase(), "wal");

        // An orphan group row is refused, not silently stored.
        let result = sqlx::query(
            "INSERT INTO groups (group_key, join_code, team_id, name, created_at, updated_at)
             VALUES ('g1', 'code', 'no-such-team', 'Ghosts', '2026-01-01', '2026-01-01')",
        )
        .execute(&pool.writer)
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn default_url_points_into_the_data_dir() {
        let url = default_database_url();
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("/greenroom.db"));
    }
}
