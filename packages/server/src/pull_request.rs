use actix_web::{HttpResponse, web};
use reviewflow_review_models::{
    CreatePrRequest, CreatePrResponse, MergePrRequest, MergePrResponse, ReassignPrRequest,
    ReassignPrResponse,
};

use crate::error::ApiError;
use crate::state::AppState;

#[allow(clippy::future_not_send)]
pub async fn create(
    body: web::Json<CreatePrRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let details = state.service.create_pr(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreatePrResponse {
        pr: details.into(),
    }))
}

#[allow(clippy::future_not_send)]
pub async fn merge(
    body: web::Json<MergePrRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let details = state.service.merge_pr(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MergePrResponse::from(details)))
}

#[allow(clippy::future_not_send)]
pub async fn reassign(
    body: web::Json<ReassignPrRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let reassignment = state.service.reassign_pr(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ReassignPrResponse {
        pr: reassignment.pull_request.into(),
        replaced_by: reassignment.replaced_by,
    }))
}
