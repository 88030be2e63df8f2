//! Authentication and session management.
//!
//! Password hashing, bearer extraction, access-token signing, refresh-token
//! lifecycle and ownership checks. Transport-agnostic: the HTTP layer in
//! `chirpy_api` maps [`AuthError`] kinds onto status codes.

pub mod bearer;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod queries;
pub mod refresh;
pub mod store;

use thiserror::Error;

/// Authentication errors.
///
/// Each kind stays distinguishable so callers can tell "who are you" apart
/// from "you may not do this".
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Token revoked")]
    Revoked,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid credentials")]
    CredentialMismatch,

    #[error("Hashing failure: {0}")]
    HashingFailure(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
