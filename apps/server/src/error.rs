use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lifeplan_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

pub const SERVER_ERROR: &str = "Server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    // The message is returned as `details` so callers can diagnose failures
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// JSON envelope for every error response.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

pub(crate) fn server_error(details: String) -> (StatusCode, ErrorBody) {
    tracing::error!("Request failed: {}", details);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody::with_details(SERVER_ERROR, details),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Core(e) => match e {
                CoreError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorBody::new(message)),
                CoreError::Database(DatabaseError::NotFound(message)) => {
                    (StatusCode::NOT_FOUND, ErrorBody::new(message))
                }
                CoreError::Validation(reason) => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::with_details("Invalid request", reason.to_string()),
                ),
                CoreError::Conflict(message) => (StatusCode::CONFLICT, ErrorBody::new(message)),
                CoreError::Database(DatabaseError::UniqueViolation(reason)) => (
                    StatusCode::CONFLICT,
                    ErrorBody::with_details("Conflict", reason),
                ),
                other => server_error(other.to_string()),
            },
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody::new("Method not allowed"),
            ),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, ErrorBody::new(reason)),
            ApiError::Auth(e) => return e.into_response(),
            ApiError::Anyhow(e) => server_error(e.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
