//! The daily practice notifier.
//!
//! Once a day (the scheduled endpoint fires the evening before) every
//! group with a practice on the target date gets a reminder pushed to
//! each of its members. A group's practices are flagged notified only
//! after every push for that group succeeded, so a failed run is
//! retried by simply firing the endpoint again; already-notified
//! practices are filtered out by the flag check here, not by storage.

use chrono::NaiveDate;
use greenroom_types::error::{MessagingError, RepositoryError};
use greenroom_types::group::GroupKey;
use greenroom_types::message::Message;
use thiserror::Error;
use tracing::{info, warn};

use crate::dialogue::prompts;
use crate::messaging::MessagingClient;
use crate::repository::membership::MembershipRepository;
use crate::repository::practice::PracticeRepository;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Messaging(#[from] MessagingError),
}

/// Outcome of one notifier run, for the scheduled endpoint's response
/// and the log line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotifyReport {
    pub groups_notified: usize,
    pub pushes_sent: usize,
    /// Groups whose pushes failed partway; they stay unflagged and are
    /// picked up by the next run.
    pub groups_failed: usize,
}

pub struct DailyNotifier<M, R, C> {
    memberships: M,
    practices: R,
    client: C,
}

impl<M, R, C> DailyNotifier<M, R, C>
where
    M: MembershipRepository,
    R: PracticeRepository,
    C: MessagingClient,
{
    pub fn new(memberships: M, practices: R, client: C) -> Self {
        Self {
            memberships,
            practices,
            client,
        }
    }

    /// Notify every group that has a practice on `date`.
    ///
    /// A push failure aborts that group only; remaining groups are
    /// still processed and the report counts the casualty.
    pub async fn run(&self, date: NaiveDate) -> Result<NotifyReport, NotifyError> {
        let groups = self.practices.groups_with_practice_on(date).await?;
        info!(%date, groups = groups.len(), "notifier run started");

        let mut report = NotifyReport::default();
        for group_key in &groups {
            match self.notify_group(group_key, date).await {
                Ok(pushes) => {
                    report.groups_notified += 1;
                    report.pushes_sent += pushes;
                }
                Err(error) => {
                    warn!(group = %group_key, %error, "group notification failed");
                    report.groups_failed += 1;
                }
            }
        }
        info!(
            groups_notified = report.groups_notified,
            pushes_sent = report.pushes_sent,
            groups_failed = report.groups_failed,
            "notifier run finished"
        );
        Ok(report)
    }

    async fn notify_group(
        &self,
        group_key: &GroupKey,
        date: NaiveDate,
    ) -> Result<usize, NotifyError> {
        let views = self.practices.views_on(group_key, date).await?;
        if views.is_empty() {
            return Ok(0);
        }
        let messages = vec![Message::text(prompts::notification_text(&views))];

        let accounts = self.memberships.list_accounts(group_key).await?;
        let mut pushes = 0;
        for account_id in &accounts {
            self.client.push(account_id, &messages).await?;
            pushes += 1;
        }
        // Flag only after the whole fan-out went through.
        self.practices.mark_notified(group_key, date).await?;
        Ok(pushes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveTime;
    use greenroom_types::account::AccountId;
    use greenroom_types::message::Profile;
    use greenroom_types::place::PlaceId;
    use greenroom_types::practice::{Practice, PracticeId, PracticeView};

    #[derive(Clone, Default)]
    struct FakeMemberships {
        members: Arc<Mutex<Vec<(GroupKey, AccountId)>>>,
    }

    impl MembershipRepository for FakeMemberships {
        async fn list_groups(
            &self,
            _account_id: &AccountId,
        ) -> Result<Vec<greenroom_types::group::Membership>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn create(
            &self,
            group_key: &GroupKey,
            account_id: &AccountId,
        ) -> Result<(), RepositoryError> {
            self.members
                .lock()
                .unwrap()
                .push((group_key.clone(), account_id.clone()));
            Ok(())
        }

        async fn delete(
            &self,
            group_key: &GroupKey,
            account_id: &AccountId,
        ) -> Result<(), RepositoryError> {
            self.members
                .lock()
                .unwrap()
                .retain(|(k, a)| !(k == group_key && a == account_id));
            Ok(())
        }

        async fn list_accounts(
            &self,
            group_key: &GroupKey,
        ) -> Result<Vec<AccountId>, RepositoryError> {
            Ok(self
                .members
                .lock()
                .unwrap()
                .iter()
                .filter(|(k, _)| k == group_key)
                .map(|(_, a)| a.clone())
                .collect())
        }
    }

    #[derive(Clone, Default)]
    struct FakePractices {
        rows: Arc<Mutex<Vec<Practice>>>,
    }

    impl PracticeRepository for FakePractices {
        async fn list_views(
            &self,
            _group_key: &GroupKey,
            _from: Option<NaiveDate>,
        ) -> Result<Vec<PracticeView>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn conflict_exists(
            &self,
            _group_key: &GroupKey,
            _place_id: &PlaceId,
            _date: NaiveDate,
            _start: NaiveTime,
        ) -> Result<bool, RepositoryError> {
            Ok(false)
        }

        async fn create(&self, practice: &Practice) -> Result<(), RepositoryError> {
            self.rows.lock().unwrap().push(practice.clone());
            Ok(())
        }

        async fn groups_with_practice_on(
            &self,
            date: NaiveDate,
        ) -> Result<Vec<GroupKey>, RepositoryError> {
            let mut keys = Vec::new();
            for p in self.rows.lock().unwrap().iter() {
                if p.date == date && !p.deleted && !keys.contains(&p.group_key) {
                    keys.push(p.group_key.clone());
                }
            }
            Ok(keys)
        }

        async fn views_on(
            &self,
            group_key: &GroupKey,
            date: NaiveDate,
        ) -> Result<Vec<PracticeView>, RepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|p| &p.group_key == group_key && p.date == date && !p.deleted)
                .map(|p| PracticeView {
                    date: p.date,
                    start: p.start,
                    end: p.end,
                    group_name: "Night Crew".to_string(),
                    place_name: "Studio A".to_string(),
                })
                .collect())
        }

        async fn mark_notified(
            &self,
            group_key: &GroupKey,
            date: NaiveDate,
        ) -> Result<(), RepositoryError> {
            for p in self.rows.lock().unwrap().iter_mut() {
                if &p.group_key == group_key && p.date == date {
                    p.notified = true;
                }
            }
            Ok(())
        }
    }

    /// Records pushes; fails for account ids listed in `fail_for`.
    #[derive(Clone, Default)]
    struct FakeClient {
        pushed: Arc<Mutex<Vec<(AccountId, String)>>>,
        fail_for: Arc<Mutex<Vec<AccountId>>>,
    }

    impl MessagingClient for FakeClient {
        async fn reply(
            &self,
            _reply_token: &str,
            _messages: &[Message],
        ) -> Result<(), MessagingError> {
            Ok(())
        }

        async fn push(&self, to: &AccountId, messages: &[Message]) -> Result<(), MessagingError> {
            if self.fail_for.lock().unwrap().contains(to) {
                return Err(MessagingError::Transport("connection refused".to_string()));
            }
            let text = match &messages[0] {
                Message::Text { text } => text.clone(),
                _ => String::new(),
            };
            self.pushed.lock().unwrap().push((to.clone(), text));
            Ok(())
        }

        async fn get_profile(&self, _account_id: &AccountId) -> Result<Profile, MessagingError> {
            Ok(Profile {
                display_name: "tester".to_string(),
            })
        }
    }

    fn practice(group_key: &GroupKey, date: NaiveDate) -> Practice {
        let now = chrono::Utc::now();
        Practice {
            id: PracticeId::new(),
            group_key: group_key.clone(),
            place_id: PlaceId::new(),
            date,
            start: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            end: Some(NaiveTime::from_hms_opt(21, 0, 0).unwrap()),
            deleted: false,
            notified: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()
    }

    #[tokio::test]
    async fn pushes_to_every_member_and_flags_practices() {
        let memberships = FakeMemberships::default();
        let practices = FakePractices::default();
        let client = FakeClient::default();

        let group = GroupKey::new();
        practices.rows.lock().unwrap().push(practice(&group, date()));
        memberships
            .members
            .lock()
            .unwrap()
            .extend([(group.clone(), AccountId::from("U1")), (group.clone(), AccountId::from("U2"))]);

        let notifier =
            DailyNotifier::new(memberships, practices.clone(), client.clone());
        let report = notifier.run(date()).await.unwrap();

        assert_eq!(report.groups_notified, 1);
        assert_eq!(report.pushes_sent, 2);
        assert_eq!(report.groups_failed, 0);

        let pushed = client.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 2);
        assert!(pushed[0].1.contains("practice tomorrow"));
        assert!(pushed[0].1.contains("19:00~21:00 @ Studio A"));

        assert!(practices.rows.lock().unwrap()[0].notified);
    }

    #[tokio::test]
    async fn quiet_day_sends_nothing() {
        let notifier = DailyNotifier::new(
            FakeMemberships::default(),
            FakePractices::default(),
            FakeClient::default(),
        );
        let report = notifier.run(date()).await.unwrap();
        assert_eq!(report, NotifyReport::default());
    }

    #[tokio::test]
    async fn push_failure_leaves_the_group_unflagged() {
        let memberships = FakeMemberships::default();
        let practices = FakePractices::default();
        let client = FakeClient::default();

        let failing = GroupKey::new();
        let healthy = GroupKey::new();
        practices
            .rows
            .lock()
            .unwrap()
            .extend([practice(&failing, date()), practice(&healthy, date())]);
        memberships.members.lock().unwrap().extend([
            (failing.clone(), AccountId::from("U1")),
            (healthy.clone(), AccountId::from("U2")),
        ]);
        client.fail_for.lock().unwrap().push(AccountId::from("U1"));

        let notifier =
            DailyNotifier::new(memberships, practices.clone(), client.clone());
        let report = notifier.run(date()).await.unwrap();

        assert_eq!(report.groups_notified, 1);
        assert_eq!(report.groups_failed, 1);
        assert_eq!(report.pushes_sent, 1);

        let rows = practices.rows.lock().unwrap();
        let flagged = |key: &GroupKey| rows.iter().find(|p| &p.group_key == key).unwrap().notified;
        assert!(!flagged(&failing), "failed group must stay retryable");
        assert!(flagged(&healthy));
    }
}
