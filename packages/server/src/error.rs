use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use reviewflow_review::ReviewError;
use serde::{Deserialize, Serialize};

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Review(#[from] ReviewError),

    /// The request body or query string could not be decoded.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "VALIDATION_ERROR",
            Self::Review(err) => match err {
                ReviewError::Validation(_) => "VALIDATION_ERROR",
                ReviewError::TeamAlreadyExists { .. } => "TEAM_EXISTS",
                ReviewError::AlreadyExists { .. } => "PR_EXISTS",
                ReviewError::AuthorNotFound { .. } | ReviewError::NotFound { .. } => "NOT_FOUND",
                ReviewError::AlreadyMerged { .. } => "PR_MERGED",
                ReviewError::UserNotAssignedToPr { .. } => "NOT_ASSIGNED",
                ReviewError::ReviewerAlreadyAssigned { .. } => "ALREADY_ASSIGNED",
                ReviewError::NoReplacement { .. } => "NO_CANDIDATE",
                ReviewError::Store(_) => "INTERNAL_ERROR",
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Review(err) => match err {
                ReviewError::Validation(_) | ReviewError::TeamAlreadyExists { .. } => {
                    StatusCode::BAD_REQUEST
                }
                ReviewError::AuthorNotFound { .. } | ReviewError::NotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                ReviewError::AlreadyExists { .. }
                | ReviewError::AlreadyMerged { .. }
                | ReviewError::UserNotAssignedToPr { .. }
                | ReviewError::ReviewerAlreadyAssigned { .. }
                | ReviewError::NoReplacement { .. } => StatusCode::CONFLICT,
                ReviewError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {self}");
        } else {
            log::debug!("Request rejected: {self}");
        }

        HttpResponse::build(status).json(ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        })
    }
}
