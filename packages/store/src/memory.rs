//! Process-local store backed by ordered maps behind a single lock.
//!
//! Each trait method takes the lock once, validates every constraint and only
//! then writes, so a failed call leaves no partial rows. Transactions hold the
//! write lock for their whole lifetime and restore a snapshot when dropped
//! without a commit.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use reviewflow_review_models::{
    PrStatus, PullRequest, PullRequestDetails, PullRequestReviewer, TeamStats, User, UserStats,
};

use crate::error::{Relation, StoreError};
use crate::store::{
    MembershipStore, PrRepository, StatsSource, StoreTransaction, TransactionalStore,
};

type ReviewerKey = (String, String);

fn reviewer_key(pull_request_id: &str, user_id: &str) -> String {
    format!("{pull_request_id}/{user_id}")
}

#[derive(Debug, Clone, Default)]
struct Tables {
    teams: BTreeSet<String>,
    users: BTreeMap<String, User>,
    pull_requests: BTreeMap<String, PullRequest>,
    reviewers: BTreeMap<ReviewerKey, PullRequestReviewer>,
}

impl Tables {
    fn team_exists(&self, team_name: &str) -> bool {
        self.teams.contains(team_name)
    }

    fn insert_team_with_members(
        &mut self,
        team_name: &str,
        members: &[User],
    ) -> Result<(), StoreError> {
        if self.teams.contains(team_name) {
            return Err(StoreError::unique(Relation::Teams, team_name));
        }

        let mut seen = BTreeSet::new();
        for member in members {
            if !seen.insert(member.user_id.as_str()) {
                return Err(StoreError::unique(Relation::Users, &member.user_id));
            }
        }

        self.teams.insert(team_name.to_string());
        for member in members {
            let user = User {
                team_name: team_name.to_string(),
                ..member.clone()
            };
            self.users.insert(user.user_id.clone(), user);
        }

        Ok(())
    }

    fn team_members<'a>(&'a self, team_name: &'a str) -> impl Iterator<Item = &'a User> {
        self.users.values().filter(move |u| u.team_name == team_name)
    }

    fn active_team_members(&self, team_name: &str, exclude_ids: &[&str]) -> Vec<User> {
        self.team_members(team_name)
            .filter(|u| u.is_active && !exclude_ids.contains(&u.user_id.as_str()))
            .cloned()
            .collect()
    }

    fn set_user_active(&mut self, user_id: &str, is_active: bool) -> Result<User, StoreError> {
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::not_found(Relation::Users, user_id))?;
        user.is_active = is_active;
        Ok(user.clone())
    }

    fn deactivate_all_active(&mut self, team_name: &str) -> usize {
        let mut affected = 0;
        for user in self
            .users
            .values_mut()
            .filter(|u| u.team_name == team_name && u.is_active)
        {
            user.is_active = false;
            affected += 1;
        }
        affected
    }

    fn reviewers_of(&self, pull_request_id: &str) -> Vec<PullRequestReviewer> {
        self.reviewers
            .values()
            .filter(|r| r.pull_request_id == pull_request_id)
            .cloned()
            .collect()
    }

    fn details(&self, pull_request_id: &str) -> Option<PullRequestDetails> {
        self.pull_requests
            .get(pull_request_id)
            .map(|pr| PullRequestDetails {
                pull_request: pr.clone(),
                reviewers: self.reviewers_of(pull_request_id),
            })
    }

    fn check_reviewer_row(
        &self,
        pull_request_id: &str,
        reviewer: &PullRequestReviewer,
    ) -> Result<(), StoreError> {
        if reviewer.pull_request_id != pull_request_id || !self.users.contains_key(&reviewer.user_id)
        {
            return Err(StoreError::foreign_key(
                Relation::PullRequestReviewers,
                reviewer_key(&reviewer.pull_request_id, &reviewer.user_id),
            ));
        }
        Ok(())
    }

    fn insert_pr_with_reviewers(
        &mut self,
        pr: &PullRequest,
        reviewers: &[PullRequestReviewer],
    ) -> Result<(), StoreError> {
        let id = pr.pull_request_id.as_str();

        if self.pull_requests.contains_key(id) {
            return Err(StoreError::unique(Relation::PullRequests, id));
        }
        if !self.users.contains_key(&pr.author_id) {
            return Err(StoreError::foreign_key(Relation::PullRequests, id));
        }

        let mut keys = BTreeSet::new();
        for reviewer in reviewers {
            self.check_reviewer_row(id, reviewer)?;
            if !keys.insert(reviewer.user_id.as_str()) {
                return Err(StoreError::unique(
                    Relation::PullRequestReviewers,
                    reviewer_key(id, &reviewer.user_id),
                ));
            }
        }

        self.pull_requests.insert(id.to_string(), pr.clone());
        for reviewer in reviewers {
            self.reviewers.insert(
                (id.to_string(), reviewer.user_id.clone()),
                reviewer.clone(),
            );
        }

        Ok(())
    }

    fn save_merged_status(&mut self, pr: &PullRequest) -> Result<PullRequest, StoreError> {
        let stored = self
            .pull_requests
            .get_mut(&pr.pull_request_id)
            .ok_or_else(|| StoreError::not_found(Relation::PullRequests, &pr.pull_request_id))?;

        if pr.is_merged() && !stored.is_merged() {
            stored.status = PrStatus::Merged;
            stored.merged_at = pr.merged_at;
            stored.updated_at = pr.updated_at;
        }

        Ok(stored.clone())
    }

    fn replace_reviewer(
        &mut self,
        pull_request_id: &str,
        old_user_id: &str,
        new_reviewer: &PullRequestReviewer,
    ) -> Result<(), StoreError> {
        let old_key = (pull_request_id.to_string(), old_user_id.to_string());
        if !self.reviewers.contains_key(&old_key) {
            return Err(StoreError::not_found(
                Relation::PullRequestReviewers,
                reviewer_key(pull_request_id, old_user_id),
            ));
        }

        self.check_reviewer_row(pull_request_id, new_reviewer)?;

        let new_key = (pull_request_id.to_string(), new_reviewer.user_id.clone());
        if new_key != old_key && self.reviewers.contains_key(&new_key) {
            return Err(StoreError::unique(
                Relation::PullRequestReviewers,
                reviewer_key(pull_request_id, &new_reviewer.user_id),
            ));
        }

        self.reviewers.remove(&old_key);
        self.reviewers.insert(new_key, new_reviewer.clone());

        Ok(())
    }

    fn open_prs_for_team(&self, team_name: &str) -> Vec<PullRequest> {
        self.pull_requests
            .values()
            .filter(|pr| pr.status == PrStatus::Open)
            .filter(|pr| {
                self.users
                    .get(&pr.author_id)
                    .is_some_and(|author| author.team_name == team_name)
            })
            .cloned()
            .collect()
    }

    fn delete_reviewers_for_open_prs_of_team(&mut self, team_name: &str) -> usize {
        let open: BTreeSet<String> = self
            .open_prs_for_team(team_name)
            .into_iter()
            .map(|pr| pr.pull_request_id)
            .collect();

        let before = self.reviewers.len();
        self.reviewers.retain(|(pr_id, _), _| !open.contains(pr_id));
        before - self.reviewers.len()
    }

    fn prs_reviewed_by(&self, user_id: &str) -> Vec<PullRequest> {
        self.reviewers
            .values()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| self.pull_requests.get(&r.pull_request_id))
            .cloned()
            .collect()
    }

    fn authored_by<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a PullRequest> {
        self.pull_requests
            .values()
            .filter(move |pr| pr.author_id == user_id)
    }

    #[allow(clippy::cast_precision_loss)]
    fn team_stats(&self, team_name: &str) -> TeamStats {
        let members: Vec<&User> = self.team_members(team_name).collect();
        let authored: Vec<&PullRequest> = members
            .iter()
            .flat_map(|m| self.authored_by(&m.user_id))
            .collect();

        let merge_hours: Vec<f64> = authored
            .iter()
            .filter_map(|pr| {
                pr.merged_at
                    .map(|merged| (merged - pr.created_at).num_milliseconds() as f64 / 3_600_000.0)
            })
            .collect();

        let avg_merge_time_hours = if merge_hours.is_empty() {
            0.0
        } else {
            merge_hours.iter().sum::<f64>() / merge_hours.len() as f64
        };

        TeamStats {
            team_name: team_name.to_string(),
            total_members: members.len() as u64,
            active_members: members.iter().filter(|m| m.is_active).count() as u64,
            total_prs: authored.len() as u64,
            open_prs: authored.iter().filter(|pr| !pr.is_merged()).count() as u64,
            merged_prs: authored.iter().filter(|pr| pr.is_merged()).count() as u64,
            avg_merge_time_hours,
        }
    }

    fn user_stats(&self, team_name: &str) -> Vec<UserStats> {
        self.team_members(team_name)
            .map(|user| {
                let authored: Vec<&PullRequest> = self.authored_by(&user.user_id).collect();
                UserStats {
                    user_id: user.user_id.clone(),
                    username: user.username.clone(),
                    authored_prs: authored.len() as u64,
                    open_authored_prs: authored.iter().filter(|pr| !pr.is_merged()).count()
                        as u64,
                    merged_authored_prs: authored.iter().filter(|pr| pr.is_merged()).count()
                        as u64,
                    assigned_reviews: self
                        .reviewers
                        .values()
                        .filter(|r| r.user_id == user.user_id)
                        .count() as u64,
                }
            })
            .collect()
    }
}

/// In-memory [`ReviewStore`](crate::ReviewStore) implementation.
///
/// Rows are kept in ordered maps, so listings come back sorted by primary key.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`] until
    /// switched back, simulating a lost database connection.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(offline: &AtomicBool) -> Result<(), StoreError> {
        if offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }

    async fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        Self::ensure_online(&self.offline)?;
        Ok(self.tables.read().await)
    }

    async fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        Self::ensure_online(&self.offline)?;
        Ok(self.tables.write().await)
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn team_exists(&self, team_name: &str) -> Result<bool, StoreError> {
        Ok(self.read().await?.team_exists(team_name))
    }

    async fn create_team_with_members(
        &self,
        team_name: &str,
        members: &[User],
    ) -> Result<(), StoreError> {
        self.write()
            .await?
            .insert_team_with_members(team_name, members)
    }

    async fn list_team_members(&self, team_name: &str) -> Result<Vec<User>, StoreError> {
        Ok(self
            .read()
            .await?
            .team_members(team_name)
            .cloned()
            .collect())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read().await?.users.get(user_id).cloned())
    }

    async fn find_active_team_members(
        &self,
        team_name: &str,
        exclude_ids: &[&str],
    ) -> Result<Vec<User>, StoreError> {
        Ok(self
            .read()
            .await?
            .active_team_members(team_name, exclude_ids))
    }

    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, StoreError> {
        self.write().await?.set_user_active(user_id, is_active)
    }

    async fn deactivate_all_active(&self, team_name: &str) -> Result<usize, StoreError> {
        Ok(self.write().await?.deactivate_all_active(team_name))
    }
}

#[async_trait]
impl PrRepository for InMemoryStore {
    async fn find_pr(
        &self,
        pull_request_id: &str,
    ) -> Result<Option<PullRequestDetails>, StoreError> {
        Ok(self.read().await?.details(pull_request_id))
    }

    async fn pr_exists(&self, pull_request_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .read()
            .await?
            .pull_requests
            .contains_key(pull_request_id))
    }

    async fn create_pr_with_reviewers(
        &self,
        pr: &PullRequest,
        reviewers: &[PullRequestReviewer],
    ) -> Result<(), StoreError> {
        self.write()
            .await?
            .insert_pr_with_reviewers(pr, reviewers)
    }

    async fn save_merged_status(&self, pr: &PullRequest) -> Result<PullRequest, StoreError> {
        self.write().await?.save_merged_status(pr)
    }

    async fn replace_reviewer(
        &self,
        pull_request_id: &str,
        old_user_id: &str,
        new_reviewer: &PullRequestReviewer,
    ) -> Result<(), StoreError> {
        self.write()
            .await?
            .replace_reviewer(pull_request_id, old_user_id, new_reviewer)
    }

    async fn delete_all_reviewers_for_open_prs_of_team(
        &self,
        team_name: &str,
    ) -> Result<usize, StoreError> {
        Ok(self
            .write()
            .await?
            .delete_reviewers_for_open_prs_of_team(team_name))
    }

    async fn list_open_prs_for_team(
        &self,
        team_name: &str,
    ) -> Result<Vec<PullRequest>, StoreError> {
        Ok(self.read().await?.open_prs_for_team(team_name))
    }

    async fn list_prs_reviewed_by(&self, user_id: &str) -> Result<Vec<PullRequest>, StoreError> {
        Ok(self.read().await?.prs_reviewed_by(user_id))
    }
}

#[async_trait]
impl StatsSource for InMemoryStore {
    async fn team_stats(&self, team_name: &str) -> Result<TeamStats, StoreError> {
        Ok(self.read().await?.team_stats(team_name))
    }

    async fn user_stats(&self, team_name: &str) -> Result<Vec<UserStats>, StoreError> {
        Ok(self.read().await?.user_stats(team_name))
    }
}

#[async_trait]
impl TransactionalStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>, StoreError> {
        let tables = self.write().await?;
        let snapshot = Some(tables.clone());

        Ok(Box::new(MemoryTransaction {
            tables,
            snapshot,
            offline: &self.offline,
        }))
    }
}

struct MemoryTransaction<'a> {
    tables: RwLockWriteGuard<'a, Tables>,
    /// State to restore on drop; `None` once committed.
    snapshot: Option<Tables>,
    offline: &'a AtomicBool,
}

impl MemoryTransaction<'_> {
    fn tables(&mut self) -> Result<&mut Tables, StoreError> {
        InMemoryStore::ensure_online(self.offline)?;
        Ok(&mut *self.tables)
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.tables = snapshot;
            log::debug!("Rolled back in-memory transaction");
        }
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction<'_> {
    async fn team_exists(&mut self, team_name: &str) -> Result<bool, StoreError> {
        Ok(self.tables()?.team_exists(team_name))
    }

    async fn deactivate_all_active(&mut self, team_name: &str) -> Result<usize, StoreError> {
        Ok(self.tables()?.deactivate_all_active(team_name))
    }

    async fn list_open_prs_for_team(
        &mut self,
        team_name: &str,
    ) -> Result<Vec<PullRequest>, StoreError> {
        Ok(self.tables()?.open_prs_for_team(team_name))
    }

    async fn delete_all_reviewers_for_open_prs_of_team(
        &mut self,
        team_name: &str,
    ) -> Result<usize, StoreError> {
        Ok(self
            .tables()?
            .delete_reviewers_for_open_prs_of_team(team_name))
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        self.tables()?;
        self.snapshot = None;
        Ok(())
    }
}
