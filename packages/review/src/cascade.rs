use std::time::{Duration, Instant};

use reviewflow_review_models::require;
use reviewflow_store::TransactionalStore;

use crate::error::{Entity, ReviewError};
use crate::service::ReviewService;

const SLOW_CASCADE: Duration = Duration::from_millis(100);

/// Counts of what a team deactivation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeactivationSummary {
    pub deactivated_users: usize,
    pub affected_pull_requests: usize,
    pub removed_reviewers: usize,
}

impl DeactivationSummary {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.deactivated_users == 0
    }
}

impl ReviewService {
    /// Deactivate every active member of a team and strip all reviewers from
    /// the open pull requests its members authored.
    ///
    /// Runs inside a single store transaction. When no member was active the
    /// reviewer rows are left untouched. Reviewers are removed from those pull
    /// requests regardless of which team the reviewers belong to.
    ///
    /// # Errors
    ///
    /// * `Validation` if the team name is empty
    /// * `NotFound` if the team does not exist
    pub async fn mass_deactivate_team_users(
        &self,
        team_name: &str,
    ) -> Result<DeactivationSummary, ReviewError> {
        require(team_name, "team_name")?;

        let started = Instant::now();
        let mut tx = self.store.begin().await?;

        if !tx.team_exists(team_name).await? {
            log::debug!("Cannot deactivate unknown team {team_name}");
            return Err(ReviewError::not_found(Entity::Team, team_name));
        }

        let deactivated_users = tx.deactivate_all_active(team_name).await?;
        if deactivated_users == 0 {
            tx.commit().await?;
            log::debug!("Team {team_name} has no active users, nothing to cascade");
            return Ok(DeactivationSummary::default());
        }

        let affected_pull_requests = tx.list_open_prs_for_team(team_name).await?.len();
        let removed_reviewers = tx
            .delete_all_reviewers_for_open_prs_of_team(team_name)
            .await?;

        tx.commit().await?;

        let elapsed = started.elapsed();
        if elapsed > SLOW_CASCADE {
            log::warn!("Deactivating team {team_name} took {elapsed:?}");
        }

        log::info!(
            "Deactivated {deactivated_users} user(s) of team {team_name}, \
             removed {removed_reviewers} reviewer(s) from {affected_pull_requests} open pull request(s)"
        );

        Ok(DeactivationSummary {
            deactivated_users,
            affected_pull_requests,
            removed_reviewers,
        })
    }
}
