use reviewflow_review_models::{TeamStats, UserStats, require};
use reviewflow_store::{MembershipStore, StatsSource};

use crate::error::{Entity, ReviewError};
use crate::service::ReviewService;

impl ReviewService {
    async fn ensure_team(&self, team_name: &str) -> Result<(), ReviewError> {
        require(team_name, "team_name")?;

        if self.store.team_exists(team_name).await? {
            Ok(())
        } else {
            Err(ReviewError::not_found(Entity::Team, team_name))
        }
    }

    /// # Errors
    ///
    /// * `NotFound` if the team does not exist
    pub async fn team_stats(&self, team_name: &str) -> Result<TeamStats, ReviewError> {
        self.ensure_team(team_name).await?;
        Ok(self.store.team_stats(team_name).await?)
    }

    /// # Errors
    ///
    /// * `NotFound` if the team does not exist
    pub async fn user_stats(&self, team_name: &str) -> Result<Vec<UserStats>, ReviewError> {
        self.ensure_team(team_name).await?;
        Ok(self.store.user_stats(team_name).await?)
    }
}
