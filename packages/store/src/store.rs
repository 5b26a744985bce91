//! Store traits consumed by the review engine.

use async_trait::async_trait;

use reviewflow_review_models::{
    PullRequest, PullRequestDetails, PullRequestReviewer, TeamStats, User, UserStats,
};

use crate::error::StoreError;

/// Teams and their users.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn team_exists(&self, team_name: &str) -> Result<bool, StoreError>;

    /// Insert a team and upsert its members into it as one unit.
    ///
    /// Members that already exist are moved into the new team.
    ///
    /// # Errors
    ///
    /// * `UniqueViolation` if the team already exists or a user id repeats
    async fn create_team_with_members(
        &self,
        team_name: &str,
        members: &[User],
    ) -> Result<(), StoreError>;

    /// All users of a team ordered by `user_id`.
    async fn list_team_members(&self, team_name: &str) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Active users of a team, minus `exclude_ids`, ordered by `user_id`.
    async fn find_active_team_members(
        &self,
        team_name: &str,
        exclude_ids: &[&str],
    ) -> Result<Vec<User>, StoreError>;

    /// # Errors
    ///
    /// * `RowNotFound` if the user does not exist
    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, StoreError>;

    /// Deactivate every active user of a team, returning how many changed.
    async fn deactivate_all_active(&self, team_name: &str) -> Result<usize, StoreError>;
}

/// Pull requests and their reviewer rows.
#[async_trait]
pub trait PrRepository: Send + Sync {
    async fn find_pr(&self, pull_request_id: &str)
    -> Result<Option<PullRequestDetails>, StoreError>;

    async fn pr_exists(&self, pull_request_id: &str) -> Result<bool, StoreError>;

    /// Write a pull request and its reviewer rows, all or nothing.
    ///
    /// # Errors
    ///
    /// * `UniqueViolation` on a duplicate pull request id or reviewer pair
    /// * `ForeignKeyViolation` if the author or a reviewer does not exist
    async fn create_pr_with_reviewers(
        &self,
        pr: &PullRequest,
        reviewers: &[PullRequestReviewer],
    ) -> Result<(), StoreError>;

    /// Persist a merge. Only an `OPEN` row is updated, so a concurrent merge
    /// that already landed keeps its `merged_at`. Returns the stored row.
    ///
    /// # Errors
    ///
    /// * `RowNotFound` if the pull request does not exist
    async fn save_merged_status(&self, pr: &PullRequest) -> Result<PullRequest, StoreError>;

    /// Delete `(pull_request_id, old_user_id)` and insert `new_reviewer`, all
    /// or nothing.
    ///
    /// # Errors
    ///
    /// * `RowNotFound` if the old assignment is gone
    /// * `UniqueViolation` if the new reviewer is already assigned
    /// * `ForeignKeyViolation` if the new reviewer does not exist
    async fn replace_reviewer(
        &self,
        pull_request_id: &str,
        old_user_id: &str,
        new_reviewer: &PullRequestReviewer,
    ) -> Result<(), StoreError>;

    /// Delete every reviewer row of the `OPEN` pull requests authored by
    /// members of a team, returning how many rows were removed.
    async fn delete_all_reviewers_for_open_prs_of_team(
        &self,
        team_name: &str,
    ) -> Result<usize, StoreError>;

    /// `OPEN` pull requests authored by members of a team.
    async fn list_open_prs_for_team(&self, team_name: &str)
    -> Result<Vec<PullRequest>, StoreError>;

    /// Pull requests a user is currently assigned to review.
    async fn list_prs_reviewed_by(&self, user_id: &str) -> Result<Vec<PullRequest>, StoreError>;
}

/// Read-only aggregates over a team.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn team_stats(&self, team_name: &str) -> Result<TeamStats, StoreError>;

    async fn user_stats(&self, team_name: &str) -> Result<Vec<UserStats>, StoreError>;
}

/// A store that can open a multi-statement unit of work.
#[async_trait]
pub trait TransactionalStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the store cannot start a transaction.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>, StoreError>;
}

/// An open unit of work. Dropping it without calling
/// [`commit`](StoreTransaction::commit) rolls every change back.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn team_exists(&mut self, team_name: &str) -> Result<bool, StoreError>;

    async fn deactivate_all_active(&mut self, team_name: &str) -> Result<usize, StoreError>;

    async fn list_open_prs_for_team(
        &mut self,
        team_name: &str,
    ) -> Result<Vec<PullRequest>, StoreError>;

    async fn delete_all_reviewers_for_open_prs_of_team(
        &mut self,
        team_name: &str,
    ) -> Result<usize, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Everything the review engine needs from a single shared store.
pub trait ReviewStore: MembershipStore + PrRepository + StatsSource + TransactionalStore {}

impl<T> ReviewStore for T where T: MembershipStore + PrRepository + StatsSource + TransactionalStore
{}
