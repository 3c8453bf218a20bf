//! Mapping from domain errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domains::chairs::ChairError;
use crate::domains::matching::MatchingError;
use crate::domains::ride_status::RideStatusError;
use crate::domains::rides::RideError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Nothing to report yet (no status, no pending event). Answered with 204.
    #[error("no content")]
    NoContent,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            ApiError::NoContent => return StatusCode::NO_CONTENT.into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT"),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message
        }));

        (status, body).into_response()
    }
}

impl From<RideStatusError> for ApiError {
    fn from(e: RideStatusError) -> Self {
        match e {
            RideStatusError::NoMatchingStatus => ApiError::NoContent,
            RideStatusError::StoreUnavailable(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<RideError> for ApiError {
    fn from(e: RideError) -> Self {
        match e {
            RideError::UserNotFound(_) | RideError::RideNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            RideError::RideInProgress => ApiError::Conflict(e.to_string()),
            RideError::InvalidEvaluation(_)
            | RideError::UnexpectedStatus { .. }
            | RideError::PaymentTokenRequired(_) => ApiError::BadRequest(e.to_string()),
            RideError::Status(inner) => inner.into(),
            RideError::Payment(_) | RideError::Database(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ChairError> for ApiError {
    fn from(e: ChairError) -> Self {
        match e {
            ChairError::OwnerNotFound(_) | ChairError::ChairNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            ChairError::RideNotAssigned(_)
            | ChairError::StatusNotAllowed(_)
            | ChairError::UnexpectedStatus { .. } => ApiError::BadRequest(e.to_string()),
            ChairError::Status(inner) => inner.into(),
            ChairError::Database(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<MatchingError> for ApiError {
    fn from(e: MatchingError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
