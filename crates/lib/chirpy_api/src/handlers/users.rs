//! Account handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CredentialsRequest, UserResponse};
use crate::services::auth;

/// `POST /api/users`: create an account.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = auth::register(&*state.users, &body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `PUT /api/users`: change the caller's email and password. Existing
/// refresh tokens are revoked.
pub async fn update_credentials_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = auth::update_credentials(
        &*state.users,
        &state.refresh_tokens,
        user_id,
        &body.email,
        &body.password,
    )
    .await?;
    Ok(Json(user.into()))
}
