use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pr::{PrStatus, PullRequest, PullRequestDetails};
use crate::team::{Team, User};

/// Wire form of a pull request with its reviewers flattened to ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequestDetails> for PullRequestDto {
    fn from(details: PullRequestDetails) -> Self {
        let PullRequestDetails {
            pull_request,
            reviewers,
        } = details;

        Self {
            pull_request_id: pull_request.pull_request_id,
            pull_request_name: pull_request.pull_request_name,
            author_id: pull_request.author_id,
            status: pull_request.status,
            assigned_reviewers: reviewers.into_iter().map(|r| r.user_id).collect(),
            created_at: pull_request.created_at,
            merged_at: pull_request.merged_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestShort {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
}

impl From<PullRequest> for PullRequestShort {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.pull_request_id,
            pull_request_name: pr.pull_request_name,
            author_id: pr.author_id,
            status: pr.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePrResponse {
    pub pr: PullRequestDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePrResponse {
    pub pr: PullRequestDto,
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequestDetails> for MergePrResponse {
    fn from(details: PullRequestDetails) -> Self {
        let merged_at = details.pull_request.merged_at;
        Self {
            pr: details.into(),
            merged_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignPrResponse {
    pub pr: PullRequestDto,
    pub replaced_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTeamResponse {
    pub team: Team,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetIsActiveResponse {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivateTeamResponse {
    pub message: String,
    pub team: String,
    pub deactivated_users: usize,
    pub removed_reviewers: usize,
}

/// The pull requests a user is currently assigned to review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReview {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShort>,
}
