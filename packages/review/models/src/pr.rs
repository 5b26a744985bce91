use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a pull request.
///
/// The only transition is `Open -> Merged`; `Merged` is terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl PrStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Merged)
    }

    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!((self, next), (Self::Open, Self::Merged))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl PullRequest {
    #[must_use]
    pub fn open(
        pull_request_id: impl Into<String>,
        pull_request_name: impl Into<String>,
        author_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            pull_request_id: pull_request_id.into(),
            pull_request_name: pull_request_name.into(),
            author_id: author_id.into(),
            status: PrStatus::Open,
            created_at: now,
            merged_at: None,
            updated_at: now,
        }
    }

    /// Moves the pull request to `Merged`, stamping `merged_at`.
    ///
    /// Returns `false` and leaves the record untouched when it is already merged,
    /// so `merged_at` always reflects the first merge.
    pub fn merge(&mut self, at: DateTime<Utc>) -> bool {
        if !self.status.can_transition_to(PrStatus::Merged) {
            return false;
        }

        self.status = PrStatus::Merged;
        self.merged_at = Some(at);
        self.updated_at = at;
        true
    }

    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A current review assignment, keyed by `(pull_request_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestReviewer {
    pub pull_request_id: String,
    pub user_id: String,
    pub assigned_at: DateTime<Utc>,
}

impl PullRequestReviewer {
    #[must_use]
    pub fn new(
        pull_request_id: impl Into<String>,
        user_id: impl Into<String>,
        assigned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pull_request_id: pull_request_id.into(),
            user_id: user_id.into(),
            assigned_at,
        }
    }
}

/// A pull request together with its resolved reviewer rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDetails {
    #[serde(flatten)]
    pub pull_request: PullRequest,
    pub reviewers: Vec<PullRequestReviewer>,
}

impl PullRequestDetails {
    #[must_use]
    pub fn reviewer_ids(&self) -> Vec<&str> {
        self.reviewers.iter().map(|r| r.user_id.as_str()).collect()
    }

    #[must_use]
    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.reviewers.iter().any(|r| r.user_id == user_id)
    }
}
