//! Chirp handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ChirpResponse, CreateChirpRequest, ListChirpsQuery};
use crate::services::chirps;

/// `POST /api/chirps`
pub async fn create_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateChirpRequest>,
) -> AppResult<(StatusCode, Json<ChirpResponse>)> {
    let chirp = chirps::create(&*state.chirps, user_id, &body.body).await?;
    Ok((StatusCode::CREATED, Json(chirp.into())))
}

/// `GET /api/chirps?author_id=<uuid>&sort=asc|desc`
pub async fn list_chirps_handler(
    State(state): State<AppState>,
    Query(query): Query<ListChirpsQuery>,
) -> AppResult<Json<Vec<ChirpResponse>>> {
    let list = chirps::list(
        &*state.chirps,
        query.author_id.as_deref(),
        query.sort.as_deref(),
    )
    .await?;
    Ok(Json(list.into_iter().map(ChirpResponse::from).collect()))
}

/// `GET /api/chirps/{id}`
pub async fn get_chirp_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ChirpResponse>> {
    let id = chirps::parse_id(&id, "chirp id")?;
    let chirp = chirps::get(&*state.chirps, id).await?;
    Ok(Json(chirp.into()))
}

/// `DELETE /api/chirps/{id}`: owner only.
pub async fn delete_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = chirps::parse_id(&id, "chirp id")?;
    chirps::delete(&*state.chirps, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
