//! The dialogue state machine.
//!
//! One inbound event plus the account's stored session determine the
//! next session and the reply. The engine owns every transition; the
//! webhook layer only decodes events, takes the per-account lock and
//! sends whatever messages come back.
//!
//! Menu postbacks always win: tapping a rich-menu item mid-flow
//! abandons the old flow and starts the new one. Any (state, input)
//! pair without a transition is a silent no-op so that stale buttons
//! from old messages cannot corrupt a session.

use chrono::{NaiveDate, Utc};
use greenroom_types::account::AccountId;
use greenroom_types::error::RepositoryError;
use greenroom_types::group::Membership;
use greenroom_types::message::Message;
use greenroom_types::practice::{Practice, PracticeId};
use greenroom_types::session::{AddPracticeState, GroupRef, Session, WithdrawState};
use tracing::debug;

use crate::repository::account::AccountRepository;
use crate::repository::group::GroupRepository;
use crate::repository::membership::MembershipRepository;
use crate::repository::place::PlaceRepository;
use crate::repository::practice::PracticeRepository;

use super::MAX_JOINABLE_GROUPS;
use super::action::{ConfirmAction, MenuAction, PostbackAction};
use super::prompts::{self, TimeAsk};

/// One decoded inbound event, as far as the engine is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Text(String),
    Postback(PostbackAction),
}

pub struct DialogueEngine<A, G, M, P, R> {
    accounts: A,
    groups: G,
    memberships: M,
    places: P,
    practices: R,
}

impl<A, G, M, P, R> DialogueEngine<A, G, M, P, R>
where
    A: AccountRepository,
    G: GroupRepository,
    M: MembershipRepository,
    P: PlaceRepository,
    R: PracticeRepository,
{
    pub fn new(accounts: A, groups: G, memberships: M, places: P, practices: R) -> Self {
        Self {
            accounts,
            groups,
            memberships,
            places,
            practices,
        }
    }

    /// Run one event through the state machine.
    ///
    /// `session` is the state loaded by the caller (under the account
    /// lock); any state change is persisted before this returns. The
    /// returned messages are the reply; empty means "say nothing".
    pub async fn handle(
        &self,
        account_id: &AccountId,
        session: Session,
        input: Inbound,
        today: NaiveDate,
    ) -> Result<Vec<Message>, RepositoryError> {
        debug!(account = %account_id, mode = session.mode_label(), "dialogue event");
        match input {
            Inbound::Text(text) => self.on_text(account_id, session, &text).await,
            Inbound::Postback(PostbackAction::Menu(menu)) => {
                self.on_menu(account_id, menu, today).await
            }
            Inbound::Postback(action) => self.on_flow(account_id, session, action, today).await,
        }
    }

    async fn set(&self, account_id: &AccountId, session: Session) -> Result<(), RepositoryError> {
        self.accounts.update_session(account_id, &session).await
    }

    async fn reset(&self, account_id: &AccountId) -> Result<(), RepositoryError> {
        self.set(account_id, Session::Idle).await
    }

    // -----------------------------------------------------------------
    // Menu entries
    // -----------------------------------------------------------------

    async fn on_menu(
        &self,
        account_id: &AccountId,
        menu: MenuAction,
        today: NaiveDate,
    ) -> Result<Vec<Message>, RepositoryError> {
        let memberships = self.memberships.list_groups(account_id).await?;
        match menu {
            MenuAction::JoinGroup => {
                // Joining is allowed at the limit and refused one past
                // it; the count only exceeds the maximum after that
                // final join.
                if memberships.len() > MAX_JOINABLE_GROUPS {
                    return Ok(vec![Message::text(prompts::too_many_groups())]);
                }
                self.set(account_id, Session::JoinGroup).await?;
                Ok(vec![Message::text(prompts::JOIN_PROMPT)])
            }
            MenuAction::ListPractices => {
                self.reset(account_id).await?;
                if memberships.is_empty() {
                    return Ok(vec![Message::text(prompts::NO_GROUPS)]);
                }
                let mut per_group = Vec::new();
                for membership in &memberships {
                    let views = self
                        .practices
                        .list_views(&membership.group_key, Some(today))
                        .await?;
                    if !views.is_empty() {
                        per_group.push((membership.group_name.clone(), views));
                    }
                }
                if per_group.is_empty() {
                    Ok(vec![Message::text(prompts::NO_PRACTICES)])
                } else {
                    Ok(vec![Message::text(prompts::schedule_text(&per_group))])
                }
            }
            MenuAction::AddPractice => {
                match memberships.len() {
                    0 => {
                        self.reset(account_id).await?;
                        Ok(vec![Message::text(prompts::NO_GROUPS)])
                    }
                    // A single group needs no group question.
                    1 => {
                        let Some(membership) = memberships.into_iter().next() else {
                            return Ok(Vec::new());
                        };
                        self.begin_place_selection(account_id, membership).await
                    }
                    _ => {
                        self.set(account_id, Session::AddPractice(AddPracticeState::AskGroup))
                            .await?;
                        Ok(vec![prompts::ask_group_message(&memberships)])
                    }
                }
            }
            MenuAction::WithdrawGroup => {
                if memberships.is_empty() {
                    self.reset(account_id).await?;
                    return Ok(vec![Message::text(prompts::NO_GROUPS)]);
                }
                self.set(
                    account_id,
                    Session::WithdrawGroup(WithdrawState::AskGroup),
                )
                .await?;
                Ok(vec![prompts::withdraw_group_message(&memberships)])
            }
        }
    }

    // -----------------------------------------------------------------
    // Text input
    // -----------------------------------------------------------------

    async fn on_text(
        &self,
        account_id: &AccountId,
        session: Session,
        text: &str,
    ) -> Result<Vec<Message>, RepositoryError> {
        match session {
            Session::JoinGroup => self.join_with_code(account_id, text.trim()).await,
            _ => {
                // Free text outside the join flow is never an answer.
                let memberships = self.memberships.list_groups(account_id).await?;
                if memberships.is_empty() {
                    Ok(vec![Message::text(prompts::NOT_A_MEMBER_HINT)])
                } else {
                    Ok(vec![Message::text(prompts::CANNOT_ANSWER)])
                }
            }
        }
    }

    async fn join_with_code(
        &self,
        account_id: &AccountId,
        code: &str,
    ) -> Result<Vec<Message>, RepositoryError> {
        let Some(group) = self.groups.get_by_join_code(code).await? else {
            // Session stays in JoinGroup so a typo can be retried.
            return Ok(vec![Message::text(prompts::JOIN_CODE_NOT_FOUND)]);
        };
        let memberships = self.memberships.list_groups(account_id).await?;
        if memberships.iter().any(|m| m.group_key == group.key) {
            self.reset(account_id).await?;
            return Ok(vec![Message::text(prompts::ALREADY_MEMBER)]);
        }
        if memberships.len() > MAX_JOINABLE_GROUPS {
            return Ok(vec![Message::text(prompts::too_many_groups())]);
        }
        self.memberships.create(&group.key, account_id).await?;
        self.reset(account_id).await?;
        Ok(vec![Message::text(prompts::joined(&group.name))])
    }

    // -----------------------------------------------------------------
    // In-flow postbacks
    // -----------------------------------------------------------------

    async fn on_flow(
        &self,
        account_id: &AccountId,
        session: Session,
        action: PostbackAction,
        today: NaiveDate,
    ) -> Result<Vec<Message>, RepositoryError> {
        match (session, action) {
            (
                Session::AddPractice(AddPracticeState::AskGroup),
                PostbackAction::GroupSelected(key),
            ) => {
                let Some(membership) = self.membership_of(account_id, &key).await? else {
                    return Ok(Vec::new());
                };
                self.begin_place_selection(account_id, membership).await
            }

            (
                Session::AddPractice(AddPracticeState::AskPlace { group }),
                PostbackAction::PlaceSelected(place_id),
            ) => {
                if self.places.get(&place_id).await?.is_none() {
                    return Ok(Vec::new());
                }
                self.set(
                    account_id,
                    Session::AddPractice(AddPracticeState::AskDate { group, place_id }),
                )
                .await?;
                Ok(vec![prompts::ask_date_message()])
            }

            (
                Session::AddPractice(AddPracticeState::AskDate { group, place_id }),
                PostbackAction::DatePicked(date),
            ) => {
                if date < today {
                    // Keep the phase, re-present the picker.
                    return Ok(vec![
                        Message::text(prompts::DATE_IN_PAST),
                        prompts::ask_date_message(),
                    ]);
                }
                self.set(
                    account_id,
                    Session::AddPractice(AddPracticeState::AskStart {
                        group,
                        place_id,
                        date,
                    }),
                )
                .await?;
                Ok(vec![prompts::ask_time_message(TimeAsk::Start)])
            }

            (
                Session::AddPractice(AddPracticeState::AskStart {
                    group,
                    place_id,
                    date,
                }),
                PostbackAction::TimePicked(start),
            ) => {
                if self
                    .practices
                    .conflict_exists(&group.key, &place_id, date, start)
                    .await?
                {
                    self.reset(account_id).await?;
                    return Ok(vec![Message::text(prompts::DUPLICATE_PRACTICE)]);
                }
                self.set(
                    account_id,
                    Session::AddPractice(AddPracticeState::AskEnd {
                        group,
                        place_id,
                        date,
                        start,
                    }),
                )
                .await?;
                Ok(vec![prompts::ask_time_message(TimeAsk::End)])
            }

            (
                Session::AddPractice(AddPracticeState::AskEnd {
                    group,
                    place_id,
                    date,
                    start,
                }),
                PostbackAction::TimePicked(end),
            ) => {
                if end <= start {
                    return Ok(vec![
                        Message::text(prompts::END_NOT_AFTER_START),
                        prompts::ask_time_message(TimeAsk::End),
                    ]);
                }
                // Re-checked here: another account may have registered
                // the same slot while this flow was mid-dialogue.
                if self
                    .practices
                    .conflict_exists(&group.key, &place_id, date, start)
                    .await?
                {
                    self.reset(account_id).await?;
                    return Ok(vec![Message::text(prompts::DUPLICATE_PRACTICE)]);
                }
                let Some(place) = self.places.get(&place_id).await? else {
                    self.reset(account_id).await?;
                    return Ok(vec![Message::text(prompts::GENERIC_ERROR)]);
                };
                let now = Utc::now();
                let practice = Practice {
                    id: PracticeId::new(),
                    group_key: group.key.clone(),
                    place_id,
                    date,
                    start,
                    end: Some(end),
                    deleted: false,
                    notified: false,
                    created_at: now,
                    updated_at: now,
                };
                self.practices.create(&practice).await?;
                self.reset(account_id).await?;
                Ok(vec![Message::text(prompts::practice_summary(
                    &group.name,
                    &place.name,
                    date,
                    start,
                    end,
                ))])
            }

            (
                Session::WithdrawGroup(WithdrawState::AskGroup),
                PostbackAction::GroupSelected(key),
            ) => {
                let Some(membership) = self.membership_of(account_id, &key).await? else {
                    return Ok(Vec::new());
                };
                self.set(
                    account_id,
                    Session::WithdrawGroup(WithdrawState::Confirm {
                        group: GroupRef {
                            key: membership.group_key,
                            name: membership.group_name.clone(),
                        },
                    }),
                )
                .await?;
                Ok(vec![prompts::withdraw_confirm_message(
                    &membership.group_name,
                )])
            }

            (
                Session::WithdrawGroup(WithdrawState::Confirm { group }),
                PostbackAction::Confirm(ConfirmAction::Approve),
            ) => {
                self.memberships.delete(&group.key, account_id).await?;
                self.reset(account_id).await?;
                Ok(vec![Message::text(prompts::left(&group.name))])
            }

            (
                Session::WithdrawGroup(WithdrawState::Confirm { .. }),
                PostbackAction::Confirm(ConfirmAction::Cancel),
            ) => {
                self.reset(account_id).await?;
                Ok(vec![Message::text(prompts::STAYING)])
            }

            (session, action) => {
                debug!(
                    account = %account_id,
                    mode = session.mode_label(),
                    ?action,
                    "no transition, ignoring"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Enter the AskPlace phase for a chosen group: venue carousel or,
    /// with no venues registered, a reset plus an explanation.
    async fn begin_place_selection(
        &self,
        account_id: &AccountId,
        membership: Membership,
    ) -> Result<Vec<Message>, RepositoryError> {
        let places = self.places.list(&membership.team_id).await?;
        if places.is_empty() {
            self.reset(account_id).await?;
            return Ok(vec![Message::text(prompts::NO_PLACES)]);
        }
        self.set(
            account_id,
            Session::AddPractice(AddPracticeState::AskPlace {
                group: GroupRef {
                    key: membership.group_key,
                    name: membership.group_name,
                },
            }),
        )
        .await?;
        Ok(prompts::ask_place_messages(&places))
    }

    async fn membership_of(
        &self,
        account_id: &AccountId,
        key: &greenroom_types::group::GroupKey,
    ) -> Result<Option<Membership>, RepositoryError> {
        let memberships = self.memberships.list_groups(account_id).await?;
        Ok(memberships.into_iter().find(|m| &m.group_key == key))
    }
}
