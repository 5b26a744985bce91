//! Reviewer selection and single-reviewer replacement.

use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;

use reviewflow_review_models::{PullRequestDetails, PullRequestReviewer, ReassignPrRequest, User};
use reviewflow_store::{MembershipStore, PrRepository, Relation};

use crate::error::{Entity, ReviewError};
use crate::service::{MAX_REVIEWERS, ReviewService};

/// Pick up to [`MAX_REVIEWERS`] distinct users uniformly at random.
///
/// A pool smaller than the maximum is taken whole, and an empty pool yields no
/// reviewers.
#[must_use]
pub fn select_reviewers<R: Rng + ?Sized>(candidates: &[User], rng: &mut R) -> Vec<User> {
    candidates
        .choose_multiple(rng, MAX_REVIEWERS)
        .cloned()
        .collect()
}

#[must_use]
pub fn pick_replacement<R: Rng + ?Sized>(candidates: &[User], rng: &mut R) -> Option<User> {
    candidates.choose(rng).cloned()
}

/// The outcome of a successful reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub pull_request: PullRequestDetails,
    pub replaced_by: String,
}

impl ReviewService {
    /// Replace one assigned reviewer with a random active member of that
    /// reviewer's team who is neither the author nor already assigned.
    ///
    /// # Errors
    ///
    /// * `Validation` if either id is empty
    /// * `NotFound` if the pull request or the old reviewer does not exist
    /// * `AlreadyMerged` if the pull request is merged
    /// * `UserNotAssignedToPr` if the old reviewer is not assigned
    /// * `NoReplacement` if no candidate is left
    /// * `ReviewerAlreadyAssigned` if a concurrent writer took the candidate
    pub async fn reassign_pr(&self, request: ReassignPrRequest) -> Result<Reassignment, ReviewError> {
        request.validate()?;
        let ReassignPrRequest {
            pull_request_id,
            old_reviewer_id,
        } = request;

        let details = self
            .store
            .find_pr(&pull_request_id)
            .await?
            .ok_or_else(|| ReviewError::not_found(Entity::PullRequest, &pull_request_id))?;

        if details.pull_request.is_merged() {
            log::debug!("Refusing to reassign on merged pull request {pull_request_id}");
            return Err(ReviewError::AlreadyMerged { pull_request_id });
        }

        if !details.has_reviewer(&old_reviewer_id) {
            log::debug!("User {old_reviewer_id} is not a reviewer of {pull_request_id}");
            return Err(ReviewError::UserNotAssignedToPr {
                pull_request_id,
                user_id: old_reviewer_id,
            });
        }

        let old_reviewer = self
            .store
            .find_user(&old_reviewer_id)
            .await?
            .ok_or_else(|| ReviewError::not_found(Entity::User, &old_reviewer_id))?;

        let mut exclude = details.reviewer_ids();
        exclude.push(details.pull_request.author_id.as_str());

        let candidates = self
            .store
            .find_active_team_members(&old_reviewer.team_name, &exclude)
            .await?;

        let replacement = {
            let mut rng = self.rng();
            pick_replacement(&candidates, &mut **rng)
        };

        let Some(replacement) = replacement else {
            log::debug!(
                "No replacement for {old_reviewer_id} in team {} on {pull_request_id}",
                old_reviewer.team_name
            );
            return Err(ReviewError::NoReplacement {
                pull_request_id,
                user_id: old_reviewer_id,
            });
        };

        let new_reviewer =
            PullRequestReviewer::new(&pull_request_id, &replacement.user_id, Utc::now());

        self.store
            .replace_reviewer(&pull_request_id, &old_reviewer_id, &new_reviewer)
            .await
            .map_err(|e| {
                if e.is_row_not_found_on(Relation::PullRequestReviewers) {
                    ReviewError::UserNotAssignedToPr {
                        pull_request_id: pull_request_id.clone(),
                        user_id: old_reviewer_id.clone(),
                    }
                } else if e.is_unique_violation_on(Relation::PullRequestReviewers) {
                    ReviewError::ReviewerAlreadyAssigned {
                        pull_request_id: pull_request_id.clone(),
                        user_id: replacement.user_id.clone(),
                    }
                } else {
                    ReviewError::Store(e)
                }
            })?;

        log::info!(
            "Replaced reviewer {old_reviewer_id} with {} on {pull_request_id}",
            replacement.user_id
        );

        let pull_request = self
            .store
            .find_pr(&pull_request_id)
            .await?
            .ok_or_else(|| ReviewError::not_found(Entity::PullRequest, &pull_request_id))?;

        Ok(Reassignment {
            pull_request,
            replaced_by: replacement.user_id,
        })
    }
}
