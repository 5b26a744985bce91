use actix_web::{HttpResponse, web};

use crate::error::ApiError;
use crate::state::AppState;
use crate::team::TeamQuery;

#[allow(clippy::future_not_send)]
pub async fn team(
    query: web::Query<TeamQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let stats = state.service.team_stats(&query.team_name).await?;

    Ok(HttpResponse::Ok().json(stats))
}

#[allow(clippy::future_not_send)]
pub async fn team_users(
    query: web::Query<TeamQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let stats = state.service.user_stats(&query.team_name).await?;

    Ok(HttpResponse::Ok().json(stats))
}
