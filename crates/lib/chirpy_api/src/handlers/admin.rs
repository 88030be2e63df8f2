//! Admin handlers.

use axum::Json;
use axum::extract::State;
use axum::response::Html;
use tracing::warn;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::ResetResponse;

/// `GET /admin/metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    \
         <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        state.metrics.hits()
    ))
}

/// `POST /admin/reset`: zero the visit counter and delete every user.
/// Only allowed on the `dev` platform.
pub async fn reset_handler(State(state): State<AppState>) -> AppResult<Json<ResetResponse>> {
    if !state.config.is_dev() {
        return Err(AppError::Forbidden("reset is only allowed in dev".into()));
    }
    state.metrics.reset();
    let users_deleted = state.users.delete_all().await?;
    warn!(users_deleted, "database reset");
    Ok(Json(ResetResponse { users_deleted }))
}
