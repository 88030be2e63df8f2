//! Payment provider webhooks.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use chirpy_core::auth::guard::verify_api_key;
use tracing::debug;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::PolkaWebhookRequest;
use crate::services::{auth, chirps::parse_id};

const USER_UPGRADED: &str = "user.upgraded";

/// `POST /api/polka/webhooks`: authenticated with `ApiKey <POLKA_KEY>`.
///
/// The key is checked before the body is decoded. Only `user.upgraded` has
/// an effect; other events are acknowledged.
pub async fn polka_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    verify_api_key(header, &state.config.polka_key)?;

    let body: PolkaWebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("invalid webhook body: {e}")))?;

    if body.event != USER_UPGRADED {
        debug!(event = %body.event, "ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }
    let data = body
        .data
        .ok_or_else(|| AppError::Validation("missing data".into()))?;
    let user_id = parse_id(&data.user_id, "user_id")?;
    auth::upgrade_to_chirpy_red(&*state.users, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
