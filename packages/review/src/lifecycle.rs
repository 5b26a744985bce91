//! Pull request creation and the `OPEN -> MERGED` transition.

use chrono::Utc;

use reviewflow_review_models::{
    CreatePrRequest, MergePrRequest, PullRequest, PullRequestDetails, PullRequestReviewer,
};
use reviewflow_store::{MembershipStore, PrRepository, Relation};

use crate::assignment::select_reviewers;
use crate::error::{Entity, ReviewError};
use crate::service::ReviewService;

impl ReviewService {
    /// Open a pull request and assign up to two reviewers from the author's
    /// team.
    ///
    /// The pull request row and its reviewer rows are written as one unit.
    ///
    /// # Errors
    ///
    /// * `Validation` if the id or author id is empty
    /// * `AlreadyExists` if the id is taken
    /// * `AuthorNotFound` if the author is unknown or inactive
    pub async fn create_pr(
        &self,
        request: CreatePrRequest,
    ) -> Result<PullRequestDetails, ReviewError> {
        request.validate()?;
        let CreatePrRequest {
            pull_request_id,
            pull_request_name,
            author_id,
        } = request;

        if self.store.pr_exists(&pull_request_id).await? {
            log::debug!("Pull request {pull_request_id} already exists");
            return Err(ReviewError::AlreadyExists { pull_request_id });
        }

        let Some(author) = self
            .store
            .find_user(&author_id)
            .await?
            .filter(|user| user.is_active)
        else {
            log::debug!("Author {author_id} is unknown or inactive");
            return Err(ReviewError::AuthorNotFound { author_id });
        };

        let candidates = self
            .store
            .find_active_team_members(&author.team_name, &[author.user_id.as_str()])
            .await?;

        let chosen = {
            let mut rng = self.rng();
            select_reviewers(&candidates, &mut **rng)
        };

        let now = Utc::now();
        let pull_request = PullRequest::open(&pull_request_id, pull_request_name, &author_id, now);
        let reviewers: Vec<PullRequestReviewer> = chosen
            .iter()
            .map(|user| PullRequestReviewer::new(&pull_request_id, &user.user_id, now))
            .collect();

        self.store
            .create_pr_with_reviewers(&pull_request, &reviewers)
            .await
            .map_err(|e| {
                if e.is_unique_violation_on(Relation::PullRequests) {
                    ReviewError::AlreadyExists {
                        pull_request_id: pull_request_id.clone(),
                    }
                } else if e.is_foreign_key_violation_on(Relation::PullRequests) {
                    ReviewError::AuthorNotFound {
                        author_id: author_id.clone(),
                    }
                } else {
                    ReviewError::Store(e)
                }
            })?;

        log::info!(
            "Created pull request {pull_request_id} by {author_id} with {} reviewer(s)",
            reviewers.len()
        );

        Ok(PullRequestDetails {
            pull_request,
            reviewers,
        })
    }

    /// Merge a pull request.
    ///
    /// Merging an already merged pull request returns it as stored, without a
    /// write, so `merged_at` always reflects the first merge.
    ///
    /// # Errors
    ///
    /// * `Validation` if the id is empty
    /// * `NotFound` if the pull request does not exist
    pub async fn merge_pr(&self, request: MergePrRequest) -> Result<PullRequestDetails, ReviewError> {
        request.validate()?;
        let pull_request_id = request.pull_request_id;

        let mut details = self
            .store
            .find_pr(&pull_request_id)
            .await?
            .ok_or_else(|| ReviewError::not_found(Entity::PullRequest, &pull_request_id))?;

        if !details.pull_request.merge(Utc::now()) {
            log::debug!("Pull request {pull_request_id} is already merged");
            return Ok(details);
        }

        details.pull_request = self
            .store
            .save_merged_status(&details.pull_request)
            .await
            .map_err(|e| {
                if e.is_row_not_found_on(Relation::PullRequests) {
                    ReviewError::not_found(Entity::PullRequest, &pull_request_id)
                } else {
                    ReviewError::Store(e)
                }
            })?;

        log::info!("Merged pull request {pull_request_id}");

        Ok(details)
    }
}
