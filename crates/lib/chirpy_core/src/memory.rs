//! In-memory stores.
//!
//! One [`MemoryStore`] implements every store trait so that deleting users
//! cascades to their chirps and refresh tokens, matching the foreign keys of
//! the PostgreSQL schema. Used by tests and by the server's `--in-memory`
//! mode.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::auth::store::{OwnershipLookup, RefreshTokenStore, UserStore};
use crate::chirps::{ChirpError, ChirpStore};
use crate::models::auth::{RefreshTokenRecord, User, UserWithPassword};
use crate::models::chirp::{Chirp, SortOrder};
use crate::uuid::uuidv7;

/// Users, chirps and refresh tokens held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, UserWithPassword>>,
    chirps: DashMap<Uuid, Chirp>,
    // Per-entry locking gives atomic read-then-update on a single token.
    refresh_tokens: DashMap<String, RefreshTokenRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, AuthError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(|u| u.user.clone()))
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AuthError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.user.email == email) {
            return Err(AuthError::Conflict("Email already registered".into()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
            is_chirpy_red: false,
        };
        users.insert(
            user.id,
            UserWithPassword {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(user)
    }

    async fn update_credential(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AuthError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.user.id != id && u.user.email == email)
        {
            return Err(AuthError::Conflict("Email already registered".into()));
        }
        Ok(users.get_mut(&id).map(|entry| {
            entry.user.email = email.to_string();
            entry.user.updated_at = Utc::now();
            entry.password_hash = password_hash.to_string();
            entry.user.clone()
        }))
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|entry| {
            entry.user.is_chirpy_red = true;
            entry.user.updated_at = Utc::now();
            entry.user.clone()
        }))
    }

    async fn delete_all(&self) -> Result<u64, AuthError> {
        let mut users = self.users.write().await;
        let deleted = users.len() as u64;
        users.clear();
        self.chirps.clear();
        self.refresh_tokens.clear();
        Ok(deleted)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<(), AuthError> {
        self.refresh_tokens.insert(record.token_hash.clone(), record);
        Ok(())
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        Ok(self.refresh_tokens.get(token_hash).map(|r| r.value().clone()))
    }

    async fn set_revoked(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, AuthError> {
        match self.refresh_tokens.get_mut(token_hash) {
            Some(mut record) => {
                record.revoked_at.get_or_insert(at);
                record.updated_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, AuthError> {
        let mut revoked = 0;
        for mut record in self.refresh_tokens.iter_mut() {
            if record.user_id == user_id && record.revoked_at.is_none() {
                record.revoked_at = Some(at);
                record.updated_at = at;
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}

#[async_trait]
impl OwnershipLookup for MemoryStore {
    async fn owner_of(&self, resource_id: Uuid) -> Result<Uuid, AuthError> {
        self.chirps
            .get(&resource_id)
            .map(|c| c.user_id)
            .ok_or_else(|| AuthError::NotFound(format!("chirp {resource_id}")))
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, ChirpError> {
        // Held across the insert so a concurrent `delete_all` cannot orphan the chirp.
        let users = self.users.read().await;
        if !users.contains_key(&user_id) {
            return Err(ChirpError::UnknownAuthor(user_id));
        }
        let now = Utc::now();
        let chirp = Chirp {
            id: uuidv7(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        self.chirps.insert(chirp.id, chirp.clone());
        drop(users);
        Ok(chirp)
    }

    async fn list(&self, author: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>, ChirpError> {
        let mut chirps: Vec<Chirp> = self
            .chirps
            .iter()
            .filter(|c| author.is_none_or(|a| c.user_id == a))
            .map(|c| c.value().clone())
            .collect();
        chirps.sort_by_key(|c| (c.created_at, c.id));
        if sort == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Chirp>, ChirpError> {
        Ok(self.chirps.get(&id).map(|c| c.value().clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ChirpError> {
        Ok(self.chirps.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(user_id: Uuid, hash: &str) -> RefreshTokenRecord {
        let now = Utc::now();
        RefreshTokenRecord {
            token_hash: hash.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::days(60),
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        UserStore::create(&store, "a@example.com", "h").await.unwrap();
        assert!(matches!(
            UserStore::create(&store, "a@example.com", "h2").await,
            Err(AuthError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn update_credential_replaces_email_and_hash() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, "a@example.com", "old").await.unwrap();
        let updated = store
            .update_credential(user.id, "b@example.com", "new")
            .await
            .unwrap()
            .expect("user exists");
        assert_eq!(updated.email, "b@example.com");

        assert!(store.find_by_email("a@example.com").await.unwrap().is_none());
        let found = store.find_by_email("b@example.com").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "new");

        assert!(
            store
                .update_credential(Uuid::new_v4(), "c@example.com", "x")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn update_credential_rejects_taken_email() {
        let store = MemoryStore::new();
        let a = UserStore::create(&store, "a@example.com", "h").await.unwrap();
        UserStore::create(&store, "b@example.com", "h").await.unwrap();
        assert!(matches!(
            store.update_credential(a.id, "b@example.com", "h").await,
            Err(AuthError::Conflict(_))
        ));
        // Keeping one's own email is fine.
        store
            .update_credential(a.id, "a@example.com", "h2")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn set_revoked_reports_missing_rows() {
        let store = MemoryStore::new();
        assert!(!store.set_revoked("nope", Utc::now()).await.unwrap());

        store.insert(record(Uuid::new_v4(), "h1")).await.unwrap();
        assert!(store.set_revoked("h1", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn delete_all_cascades() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, "a@example.com", "h").await.unwrap();
        ChirpStore::create(&store, user.id, "hello").await.unwrap();
        store.insert(record(user.id, "h1")).await.unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert!(store.list(None, SortOrder::Asc).await.unwrap().is_empty());
        assert!(store.find_by_hash("h1").await.unwrap().is_none());
    }

    async fn user(store: &MemoryStore, email: &str) -> Uuid {
        UserStore::create(store, email, "h").await.unwrap().id
    }

    #[tokio::test]
    async fn chirp_needs_an_existing_author() {
        let store = MemoryStore::new();
        let alice = user(&store, "a@example.com").await;
        store.delete_all().await.unwrap();

        assert!(matches!(
            ChirpStore::create(&store, alice, "orphan").await,
            Err(ChirpError::UnknownAuthor(id)) if id == alice
        ));
        assert!(store.list(None, SortOrder::Asc).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let store = MemoryStore::new();
        let alice = user(&store, "a@example.com").await;
        let bob = user(&store, "b@example.com").await;
        let first = ChirpStore::create(&store, alice, "one").await.unwrap();
        ChirpStore::create(&store, bob, "two").await.unwrap();
        let third = ChirpStore::create(&store, alice, "three").await.unwrap();

        let all = store.list(None, SortOrder::Asc).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, first.id);

        let alice_desc = store.list(Some(alice), SortOrder::Desc).await.unwrap();
        let ids: Vec<Uuid> = alice_desc.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);
    }

    #[tokio::test]
    async fn owner_lookup_and_delete() {
        let store = MemoryStore::new();
        let alice = user(&store, "a@example.com").await;
        let chirp = ChirpStore::create(&store, alice, "mine").await.unwrap();

        assert_eq!(store.owner_of(chirp.id).await.unwrap(), alice);
        assert!(store.delete(chirp.id).await.unwrap());
        assert!(!store.delete(chirp.id).await.unwrap());
        assert!(matches!(
            store.owner_of(chirp.id).await,
            Err(AuthError::NotFound(_))
        ));
    }
}
