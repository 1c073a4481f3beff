// Core modules
pub mod config;
pub mod context;
pub mod error;
pub mod headers;
pub mod keys;
pub mod store;
pub mod types;

// Authentication and authorization
pub mod api_key;
pub mod bearer;
pub mod password;
pub mod policy;
pub mod refresh;
pub mod service;
pub mod token;

// Re-export key types and functions
pub use config::{Argon2Config, AuthConfig};
pub use context::{AccessType, SessionContext, SessionPartial};
pub use error::{AuthError, Result};
pub use headers::RequestHeaders;
pub use keys::SigningKeyMaterial;
pub use policy::AuthorizationPolicy;
pub use service::{AuthService, RefreshRequest, SignInRequest, TokenResponse};
pub use token::{TokenClaims, TokenCodec};

use std::sync::Arc;
use store::{ProfileStore, RefreshTokenStore, SecretStore, UserStore};

/// Convenience function to wire a fully configured auth core.
///
/// Parses the signing key pair, builds the [`AuthService`] and the
/// [`AuthorizationPolicy`] over the given stores, and fails fast on any
/// configuration problem.
pub fn create_auth_core(
    config: AuthConfig,
    private_key_pem: &str,
    public_key_pem: &str,
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    secrets: Arc<dyn SecretStore>,
    profiles: Arc<dyn ProfileStore>,
) -> Result<(Arc<AuthService>, Arc<AuthorizationPolicy>)> {
    let keys = SigningKeyMaterial::from_pem(private_key_pem, public_key_pem)?;
    let service = AuthService::new(config, keys, users.clone(), refresh_tokens, secrets)?;
    let policy = AuthorizationPolicy::new(users, profiles);

    Ok((Arc::new(service), Arc::new(policy)))
}
