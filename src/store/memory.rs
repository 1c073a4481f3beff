//! In-memory store implementations.
//!
//! Reference implementations of the repository traits backed by tokio
//! `RwLock` maps. They serve single-process deployments and double as test
//! fixtures; production deployments supply their own database-backed stores.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::types::{ProfileId, UserId, Username};

use super::{
    NewRefreshToken, ProfileRecord, ProfileStore, RefreshTokenRecord, RefreshTokenStore,
    SecretStore, UserRecord, UserStore,
};

/// In-memory user store.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user record.
    pub async fn insert(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Set the soft-delete marker on a user.
    pub async fn mark_deleted(&self, id: &UserId) {
        if let Some(user) = self.users.write().await.get_mut(id) {
            user.deleted_at = Some(Utc::now());
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == *username)
            .cloned())
    }
}

/// In-memory refresh-token store.
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a record regardless of owner; used to observe revocation state.
    pub async fn get(&self, token: &str) -> Option<RefreshTokenRecord> {
        self.tokens.read().await.get(token).cloned()
    }

    /// Insert a pre-built record, e.g. one that is already expired.
    pub async fn insert(&self, record: RefreshTokenRecord) {
        self.tokens.write().await.insert(record.token.clone(), record);
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn create(&self, token: NewRefreshToken) -> Result<()> {
        let record = RefreshTokenRecord {
            token: token.token.clone(),
            user_id: token.user_id,
            expires_at: token.expires_at,
            created_at: Utc::now(),
            revoked_at: None,
        };
        self.tokens.write().await.insert(token.token, record);
        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &str,
        user_id: &UserId,
    ) -> Result<Option<RefreshTokenRecord>> {
        Ok(self
            .tokens
            .read()
            .await
            .get(token)
            .filter(|r| r.user_id == *user_id)
            .cloned())
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        if let Some(record) = self.tokens.write().await.get_mut(token) {
            if record.revoked_at.is_none() {
                record.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }
}

/// In-memory secret store.
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().await.insert(name.into(), value.into());
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.secrets.read().await.get(name).cloned())
    }
}

/// In-memory profile store.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<ProfileId, ProfileRecord>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: ProfileRecord) {
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<ProfileRecord>> {
        Ok(self.profiles.read().await.get(id).cloned())
    }
}
