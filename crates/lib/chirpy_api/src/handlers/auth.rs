//! Session handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use chirpy_core::auth::bearer::bearer_from_headers;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CredentialsRequest, LoginResponse, TokenResponse};
use crate::services::auth;

/// `POST /api/login`
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<Json<LoginResponse>> {
    let resp = auth::login(
        &*state.users,
        &state.refresh_tokens,
        state.config.jwt_secret.as_bytes(),
        &body.email,
        &body.password,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /api/refresh`: the refresh token travels as a bearer token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<TokenResponse>> {
    let token = bearer_from_headers(&headers).map_err(|e| AppError::Unauthorized(e.to_string()))?;
    let resp = auth::refresh(&state.refresh_tokens, token).await?;
    Ok(Json(resp))
}

/// `POST /api/revoke`
pub async fn revoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    let token = bearer_from_headers(&headers).map_err(|e| AppError::Unauthorized(e.to_string()))?;
    auth::revoke(&state.refresh_tokens, token).await?;
    Ok(StatusCode::NO_CONTENT)
}
