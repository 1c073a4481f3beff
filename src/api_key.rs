//! Static API-key authentication.
//!
//! One configured secret, fetched from the `SecretStore` collaborator and
//! compared in constant time. Byte lengths are compared first (cheap, reveals
//! only length), then the buffers via `subtle`; every failure collapses to a
//! single generic rejection so length and content mismatches are
//! indistinguishable to the caller.

use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::context::{AccessType, SessionPartial};
use crate::error::{AuthError, Result};
use crate::headers::RequestHeaders;
use crate::store::SecretStore;

/// Validates static API keys against one configured secret.
pub struct KeyAuthenticator {
    secrets: Arc<dyn SecretStore>,
    secret_name: String,
}

impl KeyAuthenticator {
    pub fn new(secrets: Arc<dyn SecretStore>, secret_name: impl Into<String>) -> Self {
        Self {
            secrets,
            secret_name: secret_name.into(),
        }
    }

    /// Authenticate the request's `x-api-key` header.
    ///
    /// On success the session gains `ApiKey` access plus whatever user and
    /// tenant ids the request asserted in its headers. They are trusted
    /// verbatim; the key itself already authorizes the caller.
    pub async fn authenticate(&self, headers: &RequestHeaders) -> Result<SessionPartial> {
        let Some(candidate) = headers.api_key.as_deref() else {
            debug!("api key header missing");
            return Err(AuthError::not_signed());
        };

        let secret = match self.secrets.get(&self.secret_name).await? {
            Some(secret) => secret,
            None => {
                warn!(secret = %self.secret_name, "api key secret is not configured");
                return Err(AuthError::not_signed());
            }
        };

        if candidate.len() != secret.len() {
            return Err(AuthError::not_signed());
        }
        if !bool::from(candidate.as_bytes().ct_eq(secret.as_bytes())) {
            return Err(AuthError::not_signed());
        }

        debug!("api key accepted");
        Ok(SessionPartial {
            access_type: Some(AccessType::ApiKey),
            user_id: headers.user_id.clone(),
            tenant_id: headers.tenant_id.clone(),
            ..Default::default()
        })
    }
}
