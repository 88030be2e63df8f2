//! Chirps: short posts, each owned by one user.
//!
//! Listing and reading are public. Creation and deletion go through the
//! ownership rules in [`crate::auth::guard`].

pub mod queries;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::store::OwnershipLookup;
use crate::models::chirp::{Chirp, SortOrder};

/// Maximum chirp length, in characters.
pub const MAX_CHIRP_LEN: usize = 140;

/// Replacement for filtered words.
const CENSORED: &str = "****";

/// Words replaced by [`CENSORED`], compared case-insensitively.
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Chirp errors.
#[derive(Debug, Error)]
pub enum ChirpError {
    #[error("Chirp not found: {0}")]
    NotFound(Uuid),

    #[error("Unknown author: {0}")]
    UnknownAuthor(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// Chirp persistence.
#[async_trait]
pub trait ChirpStore: OwnershipLookup {
    /// Store a new chirp owned by `user_id`. `body` is stored as given.
    /// Fails with `UnknownAuthor` if no such user exists.
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, ChirpError>;

    /// All chirps, optionally only those of `author`, ordered by creation time.
    async fn list(&self, author: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>, ChirpError>;

    async fn get(&self, id: Uuid) -> Result<Option<Chirp>, ChirpError>;

    /// Delete a chirp. Returns `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, ChirpError>;
}

/// Validate a chirp body and censor profane words.
pub fn prepare_body(body: &str) -> Result<String, ChirpError> {
    if body.chars().count() > MAX_CHIRP_LEN {
        return Err(ChirpError::Validation("Chirp is too long".into()));
    }
    Ok(censor(body))
}

/// Replace profane words. Words are split on single spaces, so punctuation
/// attached to a word keeps it from matching.
pub fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                CENSORED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
