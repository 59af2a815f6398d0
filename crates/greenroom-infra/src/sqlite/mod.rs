//! SQLite repository implementations.
//!
//! Each submodule implements one repository trait from greenroom-core
//! against the shared [`pool::DatabasePool`]. Row mapping goes through
//! per-module row structs; dates are stored as `YYYY-MM-DD`, times as
//! `HH:MM`, timestamps as RFC 3339.

pub mod account;
pub mod group;
pub mod membership;
pub mod place;
pub mod pool;
pub mod practice;
pub mod team;
pub mod user;

use chrono::{DateTime, Utc};
use greenroom_types::error::RepositoryError;

/// Hard cap on list query results.
pub(crate) const LIST_LIMIT: i64 = 20;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

#[cfg(test)]
pub(crate) mod testutil {
    //! Shared fixtures for the repository tests: a throwaway migrated
    //! pool plus seed rows satisfying the foreign keys.

    use chrono::Utc;
    use greenroom_types::group::{Group, GroupKey};
    use greenroom_types::place::{Place, PlaceId};
    use greenroom_types::team::{Team, TeamId};

    use super::format_datetime;
    use super::pool::DatabasePool;

    pub async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    pub async fn seed_team(pool: &DatabasePool) -> Team {
        let now = Utc::now();
        let team = Team {
            id: TeamId::new(),
            name: "Moonlight Players".to_string(),
            address: "1 Stage Rd".to_string(),
            image_url: None,
            created_at: now,
            updated_at: now,
        };
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
        .execute(&pool.writer)
        .await
        .unwrap();
        team
    }

    pub async fn seed_group(pool: &DatabasePool, team_id: &TeamId, name: &str, join_code: &str) -> Group {
        let now = Utc::now();
        let group = Group {
            key: GroupKey::new(),
            join_code: join_code.to_string(),
            team_id: team_id.clone(),
            name: name.to_string(),
            deleted: false,
            created_at: now,
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO groups (group_key, join_code, team_id, name, is_deleted, created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(group.key.to_string())
        .bind(&group.join_code)
        .bind(group.team_id.to_string())
        .bind(&group.name)
        .bind(format_datetime(&group.created_at))
        .bind(format_datetime(&group.updated_at))
        .execute(&pool.writer)
        .await
        .unwrap();
        group
    }

    pub async fn seed_place(pool: &DatabasePool, team_id: &TeamId, name: &str) -> Place {
        let now = Utc::now();
        let place = Place {
            id: PlaceId::new(),
            team_id: team_id.clone(),
            name: name.to_string(),
            address: "2 Stage Rd".to_string(),
            image_url: None,
            created_at: now,
            updated_at: now,
        };
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
        .execute(&pool.writer)
        .await
        .unwrap();
        place
    }

    pub async fn seed_account(pool: &DatabasePool, account_id: &str) {
        let now = format_datetime(&Utc::now());
        sqlx::query(
            "INSERT INTO accounts (account_id, session, created_at, updated_at)
             VALUES (?, '{}', ?, ?)",
        )
        .bind(account_id)
        .bind(&now)
        .bind(&now)
        .execute(&pool.writer)
        .await
        .unwrap();
    }
}
