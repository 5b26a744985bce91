use actix_web::{HttpResponse, web};
use reviewflow_review_models::{AddTeamRequest, AddTeamResponse, DeactivateTeamResponse};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    #[serde(default)]
    pub team_name: String,
}

#[allow(clippy::future_not_send)]
pub async fn add(
    body: web::Json<AddTeamRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let team = state.service.add_team(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(AddTeamResponse { team }))
}

#[allow(clippy::future_not_send)]
pub async fn get(
    query: web::Query<TeamQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let team = state.service.get_team(&query.team_name).await?;

    Ok(HttpResponse::Ok().json(team))
}

#[allow(clippy::future_not_send)]
pub async fn deactivate(
    query: web::Query<TeamQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let team_name = query.into_inner().team_name;
    let summary = state.service.mass_deactivate_team_users(&team_name).await?;

    Ok(HttpResponse::Ok().json(DeactivateTeamResponse {
        message: "Team users deactivated".to_string(),
        team: team_name,
        deactivated_users: summary.deactivated_users,
        removed_reviewers: summary.removed_reviewers,
    }))
}
