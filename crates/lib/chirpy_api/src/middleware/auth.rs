//! Authentication middleware: bearer token extraction and JWT verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chirpy_core::auth::guard::authenticate;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;

/// The user resolved from the request's access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

/// Axum middleware: verifies `Authorization: Bearer <token>` and injects
/// [`AuthenticatedUser`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(v) => Some(
            v.to_str()
                .map_err(|_| AppError::Unauthorized("Malformed authorization header".into()))?,
        ),
    };
    let user_id = authenticate(header, state.config.jwt_secret.as_bytes())?;

    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}
