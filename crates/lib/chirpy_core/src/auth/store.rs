//! Storage contracts consumed by the auth core.
//!
//! Postgres implementations live in [`super::queries`], in-memory ones in
//! [`crate::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::{RefreshTokenRecord, User, UserWithPassword};

/// User records and their credentials.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user and password hash by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, AuthError>;

    /// Fetch a user by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

    /// Create a user. Fails with `Conflict` if the email is taken.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AuthError>;

    /// Replace a user's email and password hash. `None` if no such user,
    /// `Conflict` if the new email belongs to someone else.
    async fn update_credential(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AuthError>;

    /// Mark a user as a Chirpy Red member. `None` if no such user.
    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<Option<User>, AuthError>;

    /// Delete every user (and, by cascade, their chirps and tokens).
    async fn delete_all(&self) -> Result<u64, AuthError>;
}

/// Server-side refresh token records, keyed by token hash.
///
/// Implementations must make `find_by_hash` observe a consistent row and
/// `set_revoked` a single atomic conditional update, so that a token is
/// never usable after a concurrent revocation has completed.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<(), AuthError>;

    async fn find_by_hash(&self, token_hash: &str)
    -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Set `revoked_at = at` unless already revoked. Returns `false` if no
    /// record has this hash.
    async fn set_revoked(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, AuthError>;

    /// Revoke every active token of a user. Returns how many were revoked.
    async fn revoke_all_for_user(&self, user_id: Uuid, at: DateTime<Utc>)
    -> Result<u64, AuthError>;
}

/// Resolves the owning user of a resource.
#[async_trait]
pub trait OwnershipLookup: Send + Sync {
    /// The owner of `resource_id`, or `NotFound`.
    async fn owner_of(&self, resource_id: Uuid) -> Result<Uuid, AuthError>;
}
