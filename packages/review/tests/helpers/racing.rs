//! A store wrapper that lands a competing write right before the real one.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use reviewflow_review::models::{
    PullRequest, PullRequestDetails, PullRequestReviewer, TeamStats, User, UserStats,
};
use reviewflow_store::{
    InMemoryStore, MembershipStore, PrRepository, StatsSource, StoreError, StoreTransaction,
    TransactionalStore,
};

/// The competing write to land before the next matching call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Race {
    /// Another request creates the same pull request id first.
    DuplicatePr,
    /// The author looks active on read but is gone by the time of the write.
    AuthorVanished { user_id: String, team_name: String },
    /// Another request replaces the old reviewer with `by` first.
    OldReviewerReplaced { by: String },
    /// Another request hands the chosen replacement the seat of `other`.
    ReplacementTaken { other: String },
    /// The cascade's reviewer delete fails inside the transaction.
    CascadeDeleteFails,
}

pub struct RacingStore {
    inner: Arc<InMemoryStore>,
    race: Mutex<Option<Race>>,
}

impl RacingStore {
    #[must_use]
    pub const fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            race: Mutex::new(None),
        }
    }

    pub fn arm(&self, race: Race) {
        *self.race.lock().unwrap_or_else(PoisonError::into_inner) = Some(race);
    }

    fn take_if(&self, matches: impl FnOnce(&Race) -> bool) -> Option<Race> {
        let mut race = self.race.lock().unwrap_or_else(PoisonError::into_inner);
        if race.as_ref().is_some_and(matches) {
            race.take()
        } else {
            None
        }
    }

    fn peek(&self) -> Option<Race> {
        self.race
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MembershipStore for RacingStore {
    async fn team_exists(&self, team_name: &str) -> Result<bool, StoreError> {
        self.inner.team_exists(team_name).await
    }

    async fn create_team_with_members(
        &self,
        team_name: &str,
        members: &[User],
    ) -> Result<(), StoreError> {
        self.inner.create_team_with_members(team_name, members).await
    }

    async fn list_team_members(&self, team_name: &str) -> Result<Vec<User>, StoreError> {
        self.inner.list_team_members(team_name).await
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        match self.peek() {
            Some(Race::AuthorVanished {
                user_id: vanished,
                team_name,
            }) if vanished == user_id => Ok(Some(User {
                user_id: vanished.clone(),
                username: vanished,
                team_name,
                is_active: true,
            })),
            _ => self.inner.find_user(user_id).await,
        }
    }

    async fn find_active_team_members(
        &self,
        team_name: &str,
        exclude_ids: &[&str],
    ) -> Result<Vec<User>, StoreError> {
        self.inner
            .find_active_team_members(team_name, exclude_ids)
            .await
    }

    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, StoreError> {
        self.inner.set_user_active(user_id, is_active).await
    }

    async fn deactivate_all_active(&self, team_name: &str) -> Result<usize, StoreError> {
        self.inner.deactivate_all_active(team_name).await
    }
}

#[async_trait]
impl PrRepository for RacingStore {
    async fn find_pr(
        &self,
        pull_request_id: &str,
    ) -> Result<Option<PullRequestDetails>, StoreError> {
        self.inner.find_pr(pull_request_id).await
    }

    async fn pr_exists(&self, pull_request_id: &str) -> Result<bool, StoreError> {
        self.inner.pr_exists(pull_request_id).await
    }

    async fn create_pr_with_reviewers(
        &self,
        pr: &PullRequest,
        reviewers: &[PullRequestReviewer],
    ) -> Result<(), StoreError> {
        if self
            .take_if(|race| matches!(race, Race::DuplicatePr))
            .is_some()
        {
            let competing = PullRequest::open(
                &pr.pull_request_id,
                "competing",
                &pr.author_id,
                Utc::now(),
            );
            self.inner.create_pr_with_reviewers(&competing, &[]).await?;
        }
        self.take_if(|race| matches!(race, Race::AuthorVanished { .. }));

        self.inner.create_pr_with_reviewers(pr, reviewers).await
    }

    async fn save_merged_status(&self, pr: &PullRequest) -> Result<PullRequest, StoreError> {
        self.inner.save_merged_status(pr).await
    }

    async fn replace_reviewer(
        &self,
        pull_request_id: &str,
        old_user_id: &str,
        new_reviewer: &PullRequestReviewer,
    ) -> Result<(), StoreError> {
        match self.take_if(|race| {
            matches!(
                race,
                Race::OldReviewerReplaced { .. } | Race::ReplacementTaken { .. }
            )
        }) {
            Some(Race::OldReviewerReplaced { by }) => {
                let competing = PullRequestReviewer::new(pull_request_id, by, Utc::now());
                self.inner
                    .replace_reviewer(pull_request_id, old_user_id, &competing)
                    .await?;
            }
            Some(Race::ReplacementTaken { other }) => {
                self.inner
                    .replace_reviewer(pull_request_id, &other, new_reviewer)
                    .await?;
            }
            _ => {}
        }

        self.inner
            .replace_reviewer(pull_request_id, old_user_id, new_reviewer)
            .await
    }

    async fn delete_all_reviewers_for_open_prs_of_team(
        &self,
        team_name: &str,
    ) -> Result<usize, StoreError> {
        self.inner
            .delete_all_reviewers_for_open_prs_of_team(team_name)
            .await
    }

    async fn list_open_prs_for_team(
        &self,
        team_name: &str,
    ) -> Result<Vec<PullRequest>, StoreError> {
        self.inner.list_open_prs_for_team(team_name).await
    }

    async fn list_prs_reviewed_by(&self, user_id: &str) -> Result<Vec<PullRequest>, StoreError> {
        self.inner.list_prs_reviewed_by(user_id).await
    }
}

#[async_trait]
impl StatsSource for RacingStore {
    async fn team_stats(&self, team_name: &str) -> Result<TeamStats, StoreError> {
        self.inner.team_stats(team_name).await
    }

    async fn user_stats(&self, team_name: &str) -> Result<Vec<UserStats>, StoreError> {
        self.inner.user_stats(team_name).await
    }
}

#[async_trait]
impl TransactionalStore for RacingStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>, StoreError> {
        let inner = self.inner.begin().await?;
        let fail_delete = self
            .take_if(|race| matches!(race, Race::CascadeDeleteFails))
            .is_some();

        Ok(Box::new(RacingTransaction { inner, fail_delete }))
    }
}

struct RacingTransaction<'a> {
    inner: Box<dyn StoreTransaction + 'a>,
    fail_delete: bool,
}

#[async_trait]
impl StoreTransaction for RacingTransaction<'_> {
    async fn team_exists(&mut self, team_name: &str) -> Result<bool, StoreError> {
        self.inner.team_exists(team_name).await
    }

    async fn deactivate_all_active(&mut self, team_name: &str) -> Result<usize, StoreError> {
        self.inner.deactivate_all_active(team_name).await
    }

    async fn list_open_prs_for_team(
        &mut self,
        team_name: &str,
    ) -> Result<Vec<PullRequest>, StoreError> {
        self.inner.list_open_prs_for_team(team_name).await
    }

    async fn delete_all_reviewers_for_open_prs_of_team(
        &mut self,
        team_name: &str,
    ) -> Result<usize, StoreError> {
        if self.fail_delete {
            return Err(StoreError::Unavailable("connection reset".to_string()));
        }
        self.inner
            .delete_all_reviewers_for_open_prs_of_team(team_name)
            .await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.inner.commit().await
    }
}
