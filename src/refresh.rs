//! Refresh-token lifecycle: issue, validate, revoke.
//!
//! Refresh tokens are opaque references (256 bits from the OS RNG, hex
//! encoded), not signed structures; possession means nothing until the
//! persisted record checks out. Absent and revoked records are externally
//! indistinguishable so callers cannot probe for token existence.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AuthError, Result};
use crate::store::{NewRefreshToken, RefreshTokenRecord, RefreshTokenStore};
use crate::types::UserId;

/// Shared rejection for every invalid-token shape: absent, revoked, expired.
const INVALID_REFRESH_TOKEN: &str = "invalid refresh token";

/// Number of random bytes in a token (hex-encodes to 64 chars).
const TOKEN_BYTES: usize = 32;

/// A freshly issued refresh token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues, validates and revokes refresh tokens against the store.
pub struct RefreshTokenLifecycle {
    store: Arc<dyn RefreshTokenStore>,
    ttl_seconds: u64,
}

impl RefreshTokenLifecycle {
    pub fn new(store: Arc<dyn RefreshTokenStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    /// Generate and persist a new refresh token for a user.
    pub async fn issue(&self, user_id: &UserId) -> Result<IssuedRefreshToken> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let expires_at = Utc::now() + Duration::seconds(self.ttl_seconds as i64);
        self.store
            .create(NewRefreshToken {
                token: token.clone(),
                user_id: user_id.clone(),
                expires_at,
            })
            .await?;

        info!(user_id = %user_id, %expires_at, "issued refresh token");
        Ok(IssuedRefreshToken { token, expires_at })
    }

    /// Validate a token presented by `user_id`.
    ///
    /// An expired record is revoked *before* the failure is returned, so an
    /// expired token cannot be replayed; the revoke is the only write on
    /// this path and is idempotent at the store.
    pub async fn validate(&self, token: &str, user_id: &UserId) -> Result<RefreshTokenRecord> {
        let record = self.store.find_by_token(token, user_id).await?;

        let Some(record) = record else {
            debug!(user_id = %user_id, "refresh token not found");
            return Err(AuthError::NotSigned(INVALID_REFRESH_TOKEN.into()));
        };

        if record.revoked_at.is_some() {
            debug!(user_id = %user_id, "refresh token already revoked");
            return Err(AuthError::NotSigned(INVALID_REFRESH_TOKEN.into()));
        }

        if record.expires_at < Utc::now() {
            // Lazy revoke on expiry detection.
            self.store.revoke(token).await?;
            info!(user_id = %user_id, "revoked expired refresh token");
            return Err(AuthError::NotSigned(INVALID_REFRESH_TOKEN.into()));
        }

        Ok(record)
    }

    /// Revoke a token, e.g. on logout.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        self.store.revoke(token).await?;
        Ok(())
    }
}
