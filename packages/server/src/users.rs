use actix_web::{HttpResponse, web};
use reviewflow_review_models::{SetIsActiveRequest, SetIsActiveResponse};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub user_id: String,
}

#[allow(clippy::future_not_send)]
pub async fn set_is_active(
    body: web::Json<SetIsActiveRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user = state.service.set_is_active(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(SetIsActiveResponse { user }))
}

#[allow(clippy::future_not_send)]
pub async fn get_review(
    query: web::Query<UserQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let review = state.service.get_review(&query.user_id).await?;

    Ok(HttpResponse::Ok().json(review))
}
