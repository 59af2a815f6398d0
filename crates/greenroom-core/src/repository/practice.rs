//! Practice repository trait definition.

use chrono::{NaiveDate, NaiveTime};
use greenroom_types::error::RepositoryError;
use greenroom_types::group::GroupKey;
use greenroom_types::place::PlaceId;
use greenroom_types::practice::{Practice, PracticeView};

/// Persistence for scheduled rehearsals.
pub trait PracticeRepository: Send + Sync {
    /// Non-deleted practices of a group joined with group/place names,
    /// ordered by date then start time. With `from`, only practices on
    /// or after that date are returned.
    fn list_views(
        &self,
        group_key: &GroupKey,
        from: Option<NaiveDate>,
    ) -> impl std::future::Future<Output = Result<Vec<PracticeView>, RepositoryError>> + Send;

    /// Whether a non-deleted practice with the same
    /// (group, place, date, start) tuple already exists. Checked before
    /// every create; there is deliberately no storage constraint.
    fn conflict_exists(
        &self,
        group_key: &GroupKey,
        place_id: &PlaceId,
        date: NaiveDate,
        start: NaiveTime,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    fn create(
        &self,
        practice: &Practice,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Distinct groups that still have an unnotified, non-deleted
    /// practice on the given date (the notifier's work list; groups
    /// flagged by an earlier run drop out, making re-runs safe).
    fn groups_with_practice_on(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<GroupKey>, RepositoryError>> + Send;

    /// Display rows for one group's practices on one date.
    fn views_on(
        &self,
        group_key: &GroupKey,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<PracticeView>, RepositoryError>> + Send;

    /// Flag a group's practices on a date as notified. Called only
    /// after every push for the run succeeded.
    fn mark_notified(
        &self,
        group_key: &GroupKey,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
