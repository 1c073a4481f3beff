//! Facade wiring the auth components into the operations the embedding
//! process calls: authenticate a request, sign a user in, refresh an access
//! token.
//!
//! The service owns no state of its own beyond the injected collaborators;
//! every operation is a pure composition of the pieces in the sibling
//! modules.

use http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api_key::KeyAuthenticator;
use crate::bearer::TokenAuthenticator;
use crate::config::AuthConfig;
use crate::context::SessionContext;
use crate::error::{AuthError, Result};
use crate::headers::RequestHeaders;
use crate::keys::SigningKeyMaterial;
use crate::password::PasswordHasher;
use crate::refresh::RefreshTokenLifecycle;
use crate::store::{RefreshTokenStore, SecretStore, UserRecord, UserStore};
use crate::token::{TokenCodec, TokenSubject};
use crate::types::Username;

/// Credentials presented at sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub username: Username,
    pub password: String,
}

/// Request to mint a fresh access token from a refresh token.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
    pub username: Username,
}

/// Token pair returned by sign-in and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: u64,
    pub token_type: String,
    pub username: Username,
    pub status: String,
}

/// Entry point for the authentication and authorization core.
pub struct AuthService {
    config: AuthConfig,
    codec: Arc<TokenCodec>,
    hasher: PasswordHasher,
    refresh_tokens: RefreshTokenLifecycle,
    bearer: TokenAuthenticator,
    api_key: KeyAuthenticator,
    users: Arc<dyn UserStore>,
}

impl AuthService {
    /// Wire the service from configuration, key material and stores.
    ///
    /// Fails fast on invalid configuration so a misconfigured process never
    /// starts serving.
    pub fn new(
        config: AuthConfig,
        keys: SigningKeyMaterial,
        users: Arc<dyn UserStore>,
        refresh_store: Arc<dyn RefreshTokenStore>,
        secrets: Arc<dyn SecretStore>,
    ) -> Result<Self> {
        let codec = Arc::new(TokenCodec::new(keys));
        let hasher = PasswordHasher::new(config.argon2)?;
        let refresh_tokens = RefreshTokenLifecycle::new(refresh_store, config.refresh_ttl_seconds);
        let bearer = TokenAuthenticator::new(codec.clone(), users.clone());
        let api_key = KeyAuthenticator::new(secrets, config.api_key_secret_name.clone());

        Ok(Self {
            config,
            codec,
            hasher,
            refresh_tokens,
            bearer,
            api_key,
            users,
        })
    }

    /// Authenticate a request by its bearer token.
    pub async fn authenticate_bearer(&self, headers: &HeaderMap) -> Result<SessionContext> {
        let typed = RequestHeaders::from_header_map(headers);
        let mut ctx = SessionContext::new_for_request(None);
        if typed.correlation_id.is_some() {
            ctx.correlation_id = typed.correlation_id.clone();
        }

        let partial = self.bearer.authenticate(&typed).await?;
        ctx.enrich(partial);
        Ok(ctx)
    }

    /// Authenticate a request by its static API key.
    pub async fn authenticate_api_key(&self, headers: &HeaderMap) -> Result<SessionContext> {
        let typed = RequestHeaders::from_header_map(headers);
        let mut ctx = SessionContext::new_for_request(None);
        if typed.correlation_id.is_some() {
            ctx.correlation_id = typed.correlation_id.clone();
        }

        let partial = self.api_key.authenticate(&typed).await?;
        ctx.enrich(partial);
        Ok(ctx)
    }

    /// Verify a username/password pair and issue a token pair.
    ///
    /// Unknown username, wrong password and deleted account all fail with the
    /// same generic rejection; nothing in the response distinguishes them.
    pub async fn sign_in(&self, request: SignInRequest) -> Result<TokenResponse> {
        let user = self.users.find_by_username(&request.username).await?;
        let Some(user) = user.filter(UserRecord::is_active) else {
            debug!(username = %request.username, "sign-in for unknown or inactive user");
            return Err(AuthError::not_signed());
        };

        let verified = self.hasher.verify(&request.password, &user.password_hash)?;
        if !verified {
            debug!(user_id = %user.id, "sign-in password mismatch");
            return Err(AuthError::not_signed());
        }

        let refresh = self.refresh_tokens.issue(&user.id).await?;
        let access_token = self.sign_access_token(&user)?;

        info!(user_id = %user.id, "user signed in");
        Ok(self.token_response(access_token, refresh.token, user.username))
    }

    /// Exchange a live refresh token for a fresh access token.
    ///
    /// The refresh token itself is returned unchanged; it stays valid until
    /// it expires or is revoked.
    pub async fn refresh(&self, request: RefreshRequest) -> Result<TokenResponse> {
        let user = self.users.find_by_username(&request.username).await?;
        let Some(user) = user.filter(UserRecord::is_active) else {
            debug!(username = %request.username, "refresh for unknown or inactive user");
            return Err(AuthError::not_signed());
        };

        self.refresh_tokens
            .validate(&request.refresh_token, &user.id)
            .await?;

        let access_token = self.sign_access_token(&user)?;

        debug!(user_id = %user.id, "access token refreshed");
        Ok(self.token_response(access_token, request.refresh_token, user.username))
    }

    /// Revoke a refresh token, e.g. on sign-out. Idempotent.
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<()> {
        self.refresh_tokens.revoke(token).await
    }

    fn sign_access_token(&self, user: &UserRecord) -> Result<String> {
        self.codec.sign(
            TokenSubject {
                user_id: user.id.clone(),
                username: user.username.clone(),
                tenant_id: user.tenant_id.clone(),
                is_master: user.is_master,
            },
            self.config.access_ttl_seconds,
        )
    }

    fn token_response(
        &self,
        access_token: String,
        refresh_token: String,
        username: Username,
    ) -> TokenResponse {
        TokenResponse {
            access_token,
            refresh_token,
            expires_in: self.config.access_ttl_seconds,
            token_type: "Bearer".to_string(),
            username,
            status: "success".to_string(),
        }
    }
}
