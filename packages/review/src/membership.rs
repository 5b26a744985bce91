use reviewflow_review_models::{
    AddTeamRequest, PullRequestShort, SetIsActiveRequest, Team, TeamMember, User, UserReview,
    require,
};
use reviewflow_store::{MembershipStore, PrRepository, Relation};

use crate::error::{Entity, ReviewError};
use crate::service::ReviewService;

impl ReviewService {
    /// Create a team and upsert its members into it.
    ///
    /// A member that already belongs to another team is moved into this one.
    ///
    /// # Errors
    ///
    /// * `Validation` if the team name or a member field is empty
    /// * `TeamAlreadyExists` if the team name is taken
    pub async fn add_team(&self, request: AddTeamRequest) -> Result<Team, ReviewError> {
        request.validate()?;
        let AddTeamRequest { team_name, members } = request;

        if self.store.team_exists(&team_name).await? {
            log::debug!("Team {team_name} already exists");
            return Err(ReviewError::TeamAlreadyExists { team_name });
        }

        let users: Vec<User> = members
            .into_iter()
            .map(|member| member.into_user(&team_name))
            .collect();

        self.store
            .create_team_with_members(&team_name, &users)
            .await
            .map_err(|e| {
                if e.is_unique_violation_on(Relation::Teams) {
                    ReviewError::TeamAlreadyExists {
                        team_name: team_name.clone(),
                    }
                } else {
                    ReviewError::Store(e)
                }
            })?;

        log::info!("Created team {team_name} with {} member(s)", users.len());

        Ok(Team {
            team_name,
            members: users.into_iter().map(TeamMember::from).collect(),
        })
    }

    /// # Errors
    ///
    /// * `NotFound` if the team does not exist
    pub async fn get_team(&self, team_name: &str) -> Result<Team, ReviewError> {
        require(team_name, "team_name")?;

        if !self.store.team_exists(team_name).await? {
            return Err(ReviewError::not_found(Entity::Team, team_name));
        }

        let members = self.store.list_team_members(team_name).await?;

        Ok(Team {
            team_name: team_name.to_string(),
            members: members.into_iter().map(TeamMember::from).collect(),
        })
    }

    /// Flip a single user's active flag. Existing review assignments are kept.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the user does not exist
    pub async fn set_is_active(&self, request: SetIsActiveRequest) -> Result<User, ReviewError> {
        request.validate()?;
        let SetIsActiveRequest { user_id, is_active } = request;

        let user = self
            .store
            .set_user_active(&user_id, is_active)
            .await
            .map_err(|e| {
                if e.is_row_not_found_on(Relation::Users) {
                    ReviewError::not_found(Entity::User, &user_id)
                } else {
                    ReviewError::Store(e)
                }
            })?;

        log::info!("Set user {user_id} is_active={is_active}");

        Ok(user)
    }

    /// The pull requests a user currently reviews.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the user does not exist
    pub async fn get_review(&self, user_id: &str) -> Result<UserReview, ReviewError> {
        require(user_id, "user_id")?;

        if self.store.find_user(user_id).await?.is_none() {
            return Err(ReviewError::not_found(Entity::User, user_id));
        }

        let pull_requests = self
            .store
            .list_prs_reviewed_by(user_id)
            .await?
            .into_iter()
            .map(PullRequestShort::from)
            .collect();

        Ok(UserReview {
            user_id: user_id.to_string(),
            pull_requests,
        })
    }
}
