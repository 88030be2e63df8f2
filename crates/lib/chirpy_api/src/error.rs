//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chirpy_core::auth::AuthError;
use chirpy_core::chirps::ChirpError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m.as_str()),
            AppError::Internal(detail) => {
                error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingHeader
            | AuthError::MalformedHeader
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::Malformed(_)
            | AuthError::Revoked
            | AuthError::CredentialMismatch => AppError::Unauthorized(e.to_string()),
            AuthError::Unauthenticated(m) => AppError::Unauthorized(m),
            AuthError::NotFound(m) => AppError::NotFound(m),
            AuthError::Forbidden(m) => AppError::Forbidden(m),
            AuthError::Conflict(m) => AppError::Conflict(m),
            AuthError::DbError(e) => AppError::from(e),
            AuthError::HashingFailure(m) | AuthError::Internal(m) => AppError::Internal(m),
        }
    }
}

impl From<ChirpError> for AppError {
    fn from(e: ChirpError) -> Self {
        match e {
            ChirpError::NotFound(id) => AppError::NotFound(format!("chirp {id}")),
            // The token outlived its user.
            ChirpError::UnknownAuthor(id) => AppError::Unauthorized(format!("unknown user {id}")),
            ChirpError::Validation(m) => AppError::Validation(m),
            ChirpError::DbError(e) => AppError::from(e),
        }
    }
}
