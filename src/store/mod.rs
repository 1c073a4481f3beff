//! Repository collaborators consumed by the auth core.
//!
//! Persistence mechanics are out of scope here: users, refresh tokens,
//! secrets and profiles live in externally-owned stores behind these traits.
//! Store failures are opaque (`anyhow`) and surface to callers as internal
//! errors.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProfileId, TenantId, UserId, Username};

/// A user account, read-only from this crate's point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: Username,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Master users may impersonate and bypass tenant scoping.
    pub is_master: bool,
    /// Home tenant stamped into access-token claims at sign-in.
    pub tenant_id: Option<TenantId>,
    /// Soft-delete marker; a set value invalidates every credential that
    /// references this user.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Whether this account can still authenticate.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// A persisted refresh token.
///
/// `revoked_at` is the record's single terminal mutation, set on logout,
/// rotation, or expiry detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// 256-bit random value, lowercase hex.
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Payload used when persisting a freshly issued refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRefreshToken {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// A user profile; ownership target for authorization checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: ProfileId,
    pub user_id: UserId,
    pub tenant_id: Option<TenantId>,
}

/// Read access to user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>>;
    async fn find_by_username(&self, username: &Username) -> Result<Option<UserRecord>>;
}

/// Persistence for refresh tokens.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a newly issued token.
    async fn create(&self, token: NewRefreshToken) -> Result<()>;

    /// Look up a token scoped to its owner. Implementations return whatever
    /// record exists, revoked or not; interpretation is the lifecycle's job.
    async fn find_by_token(
        &self,
        token: &str,
        user_id: &UserId,
    ) -> Result<Option<RefreshTokenRecord>>;

    /// Mark a token revoked. Revoking an unknown or already-revoked token is
    /// a no-op.
    async fn revoke(&self, token: &str) -> Result<()>;
}

/// Named secrets, e.g. the static API key.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<String>>;
}

/// Read access to user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<ProfileRecord>>;
}
