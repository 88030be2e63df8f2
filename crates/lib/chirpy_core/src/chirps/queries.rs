//! Chirp database queries (PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ChirpError, ChirpStore};
use crate::auth::AuthError;
use crate::auth::store::OwnershipLookup;
use crate::models::chirp::{Chirp, SortOrder};
use crate::uuid::uuidv7;

type ChirpRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, Uuid);

const CHIRP_COLUMNS: &str = "id, created_at, updated_at, body, user_id";

fn chirp_from_row((id, created_at, updated_at, body, user_id): ChirpRow) -> Chirp {
    Chirp {
        id,
        created_at,
        updated_at,
        body,
        user_id,
    }
}

/// Turn a foreign-key violation on `chirps.user_id` into `UnknownAuthor`.
fn unknown_author(user_id: Uuid, e: sqlx::Error) -> ChirpError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            ChirpError::UnknownAuthor(user_id)
        }
        _ => ChirpError::DbError(e),
    }
}

/// [`ChirpStore`] backed by the `chirps` table.
#[derive(Clone)]
pub struct PgChirpStore {
    pool: PgPool,
}

impl PgChirpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnershipLookup for PgChirpStore {
    async fn owner_of(&self, resource_id: Uuid) -> Result<Uuid, AuthError> {
        sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM chirps WHERE id = $1")
            .bind(resource_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("chirp {resource_id}")))
    }
}

#[async_trait]
impl ChirpStore for PgChirpStore {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, ChirpError> {
        let row = sqlx::query_as::<_, ChirpRow>(&format!(
            "INSERT INTO chirps (id, body, user_id) VALUES ($1, $2, $3) RETURNING {CHIRP_COLUMNS}"
        ))
        .bind(uuidv7())
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unknown_author(user_id, e))?;
        Ok(chirp_from_row(row))
    }

    async fn list(&self, author: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>, ChirpError> {
        let direction = match sort {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        // `$1 IS NULL` lets one statement serve both the filtered and full listing.
        let rows = sqlx::query_as::<_, ChirpRow>(&format!(
            "SELECT {CHIRP_COLUMNS} FROM chirps \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
             ORDER BY created_at {direction}, id {direction}"
        ))
        .bind(author)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(chirp_from_row).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Chirp>, ChirpError> {
        let row = sqlx::query_as::<_, ChirpRow>(&format!(
            "SELECT {CHIRP_COLUMNS} FROM chirps WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(chirp_from_row))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ChirpError> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
