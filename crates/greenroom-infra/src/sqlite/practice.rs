//! SQLite practice repository implementation.

use chrono::{NaiveDate, NaiveTime, Utc};
use greenroom_core::dialogue::action::{DATE_FORMAT, TIME_FORMAT};
use greenroom_core::repository::practice::PracticeRepository;
use greenroom_types::error::RepositoryError;
use greenroom_types::group::GroupKey;
use greenroom_types::place::PlaceId;
use greenroom_types::practice::{Practice, PracticeView};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{LIST_LIMIT, format_datetime, query_error};

pub struct SqlitePracticeRepository {
    pool: DatabasePool,
}

impl SqlitePracticeRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| RepositoryError::Query(format!("invalid date: {e}")))
}

fn parse_time(s: &str) -> Result<NaiveTime, RepositoryError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| RepositoryError::Query(format!("invalid time: {e}")))
}

fn view_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PracticeView, RepositoryError> {
    let date: String = row.try_get("date").map_err(query_error)?;
    let start: String = row.try_get("start_time").map_err(query_error)?;
    let end: Option<String> = row.try_get("end_time").map_err(query_error)?;
    Ok(PracticeView {
        date: parse_date(&date)?,
        start: parse_time(&start)?,
        end: end.as_deref().map(parse_time).transpose()?,
        group_name: row.try_get("group_name").map_err(query_error)?,
        place_name: row.try_get("place_name").map_err(query_error)?,
    })
}

const VIEW_SELECT: &str = "SELECT p.date, p.start_time, p.end_time,
        g.name AS group_name, pl.name AS place_name
     FROM practices p
     JOIN groups g ON g.group_key = p.group_key
     JOIN places pl ON pl.place_id = p.place_id";

impl PracticeRepository for SqlitePracticeRepository {
    async fn list_views(
        &self,
        group_key: &GroupKey,
        from: Option<NaiveDate>,
    ) -> Result<Vec<PracticeView>, RepositoryError> {
        let mut sql = format!("{VIEW_SELECT} WHERE p.group_key = ? AND p.is_deleted = 0");
        if from.is_some() {
            sql.push_str(" AND p.date >= ?");
        }
        sql.push_str(" ORDER BY p.date, p.start_time LIMIT ?");

        let mut query = sqlx::query(&sql).bind(group_key.to_string());
        if let Some(from) = from {
            query = query.bind(format_date(from));
        }
        let rows = query
            .bind(LIST_LIMIT)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(view_from_row).collect()
    }

    async fn conflict_exists(
        &self,
        group_key: &GroupKey,
        place_id: &PlaceId,
        date: NaiveDate,
        start: NaiveTime,
    ) -> Result<bool, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM practices
             WHERE group_key = ? AND place_id = ? AND date = ? AND start_time = ?
               AND is_deleted = 0",
        )
        .bind(group_key.to_string())
        .bind(place_id.to_string())
        .bind(format_date(date))
        .bind(format_time(start))
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_error)?;

        Ok(count > 0)
    }

    async fn create(&self, practice: &Practice) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO practices (practice_id, group_key, place_id, date, start_time, end_time,
                                    is_deleted, is_notified, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(practice.id.to_string())
        .bind(practice.group_key.to_string())
        .bind(practice.place_id.to_string())
        .bind(format_date(practice.date))
        .bind(format_time(practice.start))
        .bind(practice.end.map(format_time))
        .bind(practice.deleted as i64)
        .bind(practice.notified as i64)
        .bind(format_datetime(&practice.created_at))
        .bind(format_datetime(&practice.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn groups_with_practice_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<GroupKey>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT DISTINCT group_key FROM practices
             WHERE date = ? AND is_deleted = 0 AND is_notified = 0",
        )
        .bind(format_date(date))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                let key: String = row.try_get("group_key").map_err(query_error)?;
                key.parse::<GroupKey>()
                    .map_err(|e| RepositoryError::Query(format!("invalid group key: {e}")))
            })
            .collect()
    }

    async fn views_on(
        &self,
        group_key: &GroupKey,
        date: NaiveDate,
    ) -> Result<Vec<PracticeView>, RepositoryError> {
        let sql = format!(
            "{VIEW_SELECT} WHERE p.group_key = ? AND p.date = ? AND p.is_deleted = 0
             ORDER BY p.start_time"
        );
        let rows = sqlx::query(&sql)
            .bind(group_key.to_string())
            .bind(format_date(date))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(view_from_row).collect()
    }

    async fn mark_notified(
        &self,
        group_key: &GroupKey,
        date: NaiveDate,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE practices SET is_notified = 1, updated_at = ?
             WHERE group_key = ? AND date = ? AND is_deleted = 0",
        )
        .bind(format_datetime(&Utc::now()))
        .bind(group_key.to_string())
        .bind(format_date(date))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }
}
