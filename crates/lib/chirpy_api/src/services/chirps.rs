//! Chirp flows delegating to `chirpy_core::chirps`.

use chirpy_core::auth::guard::authorize_mutation;
use chirpy_core::chirps::{ChirpError, ChirpStore, prepare_body};
use chirpy_core::models::chirp::{Chirp, SortOrder};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Parse a path or query id, rejecting anything that is not a UUID.
pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("invalid {what}: {raw:?}")))
}

/// Validate, censor and store a chirp for `user_id`.
pub async fn create(chirps: &dyn ChirpStore, user_id: Uuid, body: &str) -> AppResult<Chirp> {
    let body = prepare_body(body)?;
    let chirp = chirps.create(user_id, &body).await?;
    info!(chirp_id = %chirp.id, %user_id, "chirp created");
    Ok(chirp)
}

/// List chirps from raw query parameters.
pub async fn list(
    chirps: &dyn ChirpStore,
    author_id: Option<&str>,
    sort: Option<&str>,
) -> AppResult<Vec<Chirp>> {
    let author = author_id
        .filter(|a| !a.is_empty())
        .map(|a| parse_id(a, "author_id"))
        .transpose()?;
    let sort = match sort.filter(|s| !s.is_empty()) {
        Some(s) => s.parse::<SortOrder>().map_err(AppError::Validation)?,
        None => SortOrder::default(),
    };
    Ok(chirps.list(author, sort).await?)
}

pub async fn get(chirps: &dyn ChirpStore, id: Uuid) -> AppResult<Chirp> {
    chirps
        .get(id)
        .await?
        .ok_or_else(|| ChirpError::NotFound(id).into())
}

/// Delete a chirp owned by `user_id`.
pub async fn delete(chirps: &dyn ChirpStore, user_id: Uuid, id: Uuid) -> AppResult<()> {
    authorize_mutation(chirps, user_id, id).await?;
    if !chirps.delete(id).await? {
        return Err(ChirpError::NotFound(id).into());
    }
    info!(chirp_id = %id, %user_id, "chirp deleted");
    Ok(())
}
