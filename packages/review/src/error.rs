use strum::Display;

use reviewflow_review_models::ValidationError;
use reviewflow_store::StoreError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum Entity {
    #[strum(serialize = "team")]
    Team,
    #[strum(serialize = "user")]
    User,
    #[strum(serialize = "pull request")]
    PullRequest,
}

/// Errors returned by review operations.
///
/// Every variant is terminal for the call that produced it; nothing is retried
/// and no partial write survives a failure.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// A required field was missing or empty.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A pull request with this id already exists.
    #[error("Pull request {pull_request_id} already exists")]
    AlreadyExists { pull_request_id: String },

    /// The author does not exist or is inactive.
    #[error("Author {author_id} not found or inactive")]
    AuthorNotFound { author_id: String },

    #[error("The {entity} {id} was not found")]
    NotFound { entity: Entity, id: String },

    /// The pull request is merged and can no longer change.
    #[error("Pull request {pull_request_id} is already merged")]
    AlreadyMerged { pull_request_id: String },

    #[error("User {user_id} is not assigned to pull request {pull_request_id}")]
    UserNotAssignedToPr {
        pull_request_id: String,
        user_id: String,
    },

    /// A concurrent writer assigned the chosen replacement first.
    #[error("User {user_id} is already assigned to pull request {pull_request_id}")]
    ReviewerAlreadyAssigned {
        pull_request_id: String,
        user_id: String,
    },

    /// Nobody in the old reviewer's team can take over.
    #[error("No replacement candidate for {user_id} on pull request {pull_request_id}")]
    NoReplacement {
        pull_request_id: String,
        user_id: String,
    },

    #[error("Team {team_name} already exists")]
    TeamAlreadyExists { team_name: String },

    /// The store failed for a reason the engine cannot classify.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReviewError {
    #[must_use]
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
