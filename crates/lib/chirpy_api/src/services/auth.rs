//! Account and session flows delegating to `chirpy_core::auth`.

use std::sync::LazyLock;

use chirpy_core::auth::AuthError;
use chirpy_core::auth::jwt::{access_token_ttl, issue_access_token};
use chirpy_core::auth::password::{hash_password, verify_password};
use chirpy_core::auth::refresh::RefreshTokenService;
use chirpy_core::auth::store::UserStore;
use chirpy_core::models::auth::User;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{LoginResponse, TokenResponse};

/// Hash checked when the email is unknown, so a miss costs one bcrypt
/// verification like a hit does.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("chirpy-dummy-password").ok());

fn validate_credentials(email: &str, password: &str) -> AppResult<()> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("email is required".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("password is required".into()));
    }
    Ok(())
}

/// Create an account.
pub async fn register(users: &dyn UserStore, email: &str, password: &str) -> AppResult<User> {
    validate_credentials(email, password)?;
    let hash = hash_password(password)?;
    let user = users.create(email, &hash).await?;
    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Authenticate with email + password and open a session.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    users: &dyn UserStore,
    refresh_tokens: &RefreshTokenService,
    jwt_secret: &[u8],
    email: &str,
    password: &str,
) -> AppResult<LoginResponse> {
    let Some(found) = users.find_by_email(email).await? else {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = verify_password(password, dummy);
        }
        return Err(AuthError::CredentialMismatch.into());
    };
    verify_password(password, &found.password_hash)?;

    let user = found.user;
    let token = issue_access_token(user.id, jwt_secret, access_token_ttl())?;
    let refresh = refresh_tokens.issue(user.id).await?;
    info!(user_id = %user.id, "user logged in");

    Ok(LoginResponse {
        user: user.into(),
        token,
        refresh_token: refresh.token,
    })
}

/// Replace the email and password of the authenticated user and end all of
/// their sessions.
pub async fn update_credentials(
    users: &dyn UserStore,
    refresh_tokens: &RefreshTokenService,
    user_id: Uuid,
    email: &str,
    password: &str,
) -> AppResult<User> {
    validate_credentials(email, password)?;
    let hash = hash_password(password)?;
    let user = users
        .update_credential(user_id, email, &hash)
        .await?
        .ok_or_else(|| AppError::NotFound("user".into()))?;
    let revoked = refresh_tokens.revoke_all(user_id).await?;
    info!(%user_id, revoked, "credentials updated");
    Ok(user)
}

/// Exchange a refresh token for a new access token.
pub async fn refresh(refresh_tokens: &RefreshTokenService, token: &str) -> AppResult<TokenResponse> {
    match refresh_tokens.redeem(token).await {
        Ok(token) => Ok(TokenResponse { token }),
        Err(AuthError::NotFound(_)) => {
            Err(AppError::Unauthorized("Invalid refresh token".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Revoke a refresh token.
pub async fn revoke(refresh_tokens: &RefreshTokenService, token: &str) -> AppResult<()> {
    refresh_tokens.revoke(token).await?;
    Ok(())
}

/// Mark a user as a Chirpy Red member.
pub async fn upgrade_to_chirpy_red(users: &dyn UserStore, user_id: Uuid) -> AppResult<User> {
    let user = users
        .upgrade_to_chirpy_red(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;
    info!(user_id = %user.id, "user upgraded to Chirpy Red");
    Ok(user)
}
