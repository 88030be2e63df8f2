//! Refresh token lifecycle.
//!
//! Refresh tokens are opaque random strings persisted server-side (as SHA-256
//! digests). They mint new access tokens without re-entering credentials and
//! are the only thing that can be revoked.
//!
//! Tokens are not rotated on redemption: the same refresh token keeps working
//! until it expires or is revoked. A stolen token therefore stays usable for
//! its whole lifetime unless someone revokes it.

use std::sync::Arc;

use chrono::Duration;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use super::AuthError;
use super::jwt::{access_token_ttl, issue_access_token_at};
use super::store::RefreshTokenStore;
use crate::clock::{Clock, SystemClock};
use crate::models::auth::{RefreshToken, RefreshTokenRecord};

/// Refresh token lifetime: 60 days.
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 60;

/// Length of a refresh token in alphanumeric characters (~381 bits).
const REFRESH_TOKEN_LEN: usize = 64;

/// Generate a cryptographically random refresh token.
fn generate_refresh_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// SHA-256 hash a refresh token for storage.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Issues, redeems and revokes refresh tokens.
#[derive(Clone)]
pub struct RefreshTokenService {
    store: Arc<dyn RefreshTokenStore>,
    jwt_secret: Arc<[u8]>,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenService {
    /// Create a service over `store`, minting access tokens with `jwt_secret`.
    pub fn new(store: Arc<dyn RefreshTokenStore>, jwt_secret: &[u8]) -> Self {
        Self::with_clock(store, jwt_secret, Arc::new(SystemClock))
    }

    /// Same as [`RefreshTokenService::new`] with an explicit clock.
    pub fn with_clock(
        store: Arc<dyn RefreshTokenStore>,
        jwt_secret: &[u8],
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            jwt_secret: Arc::from(jwt_secret),
            clock,
        }
    }

    /// Issue and persist a new refresh token for `user_id`.
    ///
    /// Existing tokens of the user are left untouched, so several sessions
    /// can be live at once.
    pub async fn issue(&self, user_id: Uuid) -> Result<RefreshToken, AuthError> {
        let now = self.clock.now();
        let token = generate_refresh_token();
        let record = RefreshTokenRecord {
            token_hash: hash_refresh_token(&token),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
            revoked_at: None,
        };
        let expires_at = record.expires_at;
        self.store.insert(record).await?;
        debug!(%user_id, "issued refresh token");

        Ok(RefreshToken {
            token,
            user_id,
            created_at: now,
            expires_at,
        })
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// The refresh token itself stays valid.
    pub async fn redeem(&self, token: &str) -> Result<String, AuthError> {
        let now = self.clock.now();
        let record = self
            .store
            .find_by_hash(&hash_refresh_token(token))
            .await?
            .ok_or_else(|| AuthError::NotFound("refresh token".into()))?;

        if record.revoked_at.is_some() {
            debug!(user_id = %record.user_id, "refresh token revoked");
            return Err(AuthError::Revoked);
        }
        if !record.is_active(now) {
            debug!(user_id = %record.user_id, "refresh token expired");
            return Err(AuthError::Expired);
        }

        issue_access_token_at(record.user_id, &self.jwt_secret, access_token_ttl(), now)
    }

    /// Revoke a refresh token. Revoking twice is not an error; the first
    /// revocation time is kept.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let found = self
            .store
            .set_revoked(&hash_refresh_token(token), self.clock.now())
            .await?;
        if !found {
            return Err(AuthError::NotFound("refresh token".into()));
        }
        Ok(())
    }

    /// Revoke every active refresh token of `user_id`.
    pub async fn revoke_all(&self, user_id: Uuid) -> Result<u64, AuthError> {
        let revoked = self
            .store
            .revoke_all_for_user(user_id, self.clock.now())
            .await?;
        debug!(%user_id, revoked, "revoked all refresh tokens");
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::auth::jwt::verify_access_token_at;
    use crate::clock::ManualClock;
    use crate::memory::MemoryStore;

    const SECRET: &[u8] = b"test-secret";

    fn service() -> (RefreshTokenService, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let svc = RefreshTokenService::with_clock(store.clone(), SECRET, clock.clone());
        (svc, store, clock)
    }

    #[test]
    fn generated_tokens_are_long_and_distinct() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_eq!(a.len(), REFRESH_TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn token_hash_is_sha256_hex() {
        let h = hash_refresh_token("abc");
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn issue_persists_hash_not_plaintext() {
        let (svc, store, clock) = service();
        let user = Uuid::new_v4();
        let issued = svc.issue(user).await.unwrap();

        assert_eq!(issued.expires_at, clock.now() + Duration::days(60));
        let record = store
            .find_by_hash(&hash_refresh_token(&issued.token))
            .await
            .unwrap()
            .expect("record stored");
        assert_eq!(record.user_id, user);
        assert_ne!(record.token_hash, issued.token);
        assert!(record.revoked_at.is_none());
    }

    #[tokio::test]
    async fn redeem_repeats_until_revoked() {
        let (svc, _store, clock) = service();
        let u1 = Uuid::new_v4();
        let issued = svc.issue(u1).await.unwrap();

        let first = svc.redeem(&issued.token).await.unwrap();
        let second = svc.redeem(&issued.token).await.unwrap();
        assert_eq!(verify_access_token_at(&first, SECRET, clock.now()).unwrap(), u1);
        assert_eq!(verify_access_token_at(&second, SECRET, clock.now()).unwrap(), u1);

        svc.revoke(&issued.token).await.unwrap();
        assert!(matches!(svc.redeem(&issued.token).await, Err(AuthError::Revoked)));
        assert!(matches!(svc.redeem(&issued.token).await, Err(AuthError::Revoked)));
    }

    #[tokio::test]
    async fn minted_access_token_lives_one_hour() {
        let (svc, _store, clock) = service();
        let issued = svc.issue(Uuid::new_v4()).await.unwrap();
        let access = svc.redeem(&issued.token).await.unwrap();

        let later = clock.now() + Duration::hours(1) + Duration::seconds(1);
        assert!(matches!(
            verify_access_token_at(&access, SECRET, later),
            Err(AuthError::Expired)
        ));
    }

    #[tokio::test]
    async fn redeem_fails_after_sixty_days() {
        let (svc, _store, clock) = service();
        let issued = svc.issue(Uuid::new_v4()).await.unwrap();

        clock.advance(Duration::days(59));
        svc.redeem(&issued.token).await.unwrap();

        clock.advance(Duration::days(1));
        assert!(matches!(svc.redeem(&issued.token).await, Err(AuthError::Expired)));
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (svc, _store, _clock) = service();
        assert!(matches!(svc.redeem("nope").await, Err(AuthError::NotFound(_))));
        assert!(matches!(svc.revoke("nope").await, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn revoke_is_idempotent_and_keeps_first_timestamp() {
        let (svc, store, clock) = service();
        let issued = svc.issue(Uuid::new_v4()).await.unwrap();
        let hash = hash_refresh_token(&issued.token);

        svc.revoke(&issued.token).await.unwrap();
        let first = store.find_by_hash(&hash).await.unwrap().unwrap().revoked_at;

        clock.advance(Duration::minutes(5));
        svc.revoke(&issued.token).await.unwrap();
        let second = store.find_by_hash(&hash).await.unwrap().unwrap().revoked_at;

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let (svc, _store, _clock) = service();
        let user = Uuid::new_v4();
        let a = svc.issue(user).await.unwrap();
        let b = svc.issue(user).await.unwrap();

        svc.revoke(&a.token).await.unwrap();
        assert!(matches!(svc.redeem(&a.token).await, Err(AuthError::Revoked)));
        svc.redeem(&b.token).await.unwrap();
    }

    #[tokio::test]
    async fn revoke_all_only_touches_one_user() {
        let (svc, _store, _clock) = service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let a1 = svc.issue(alice).await.unwrap();
        let a2 = svc.issue(alice).await.unwrap();
        let b1 = svc.issue(bob).await.unwrap();

        assert_eq!(svc.revoke_all(alice).await.unwrap(), 2);
        assert!(matches!(svc.redeem(&a1.token).await, Err(AuthError::Revoked)));
        assert!(matches!(svc.redeem(&a2.token).await, Err(AuthError::Revoked)));
        svc.redeem(&b1.token).await.unwrap();
    }
}
