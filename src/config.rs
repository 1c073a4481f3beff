//! Configuration for the auth core.
//!
//! All values are sourced externally: the embedding process either builds an
//! [`AuthConfig`] directly or calls [`AuthConfig::from_env`]. Signing key
//! material is deliberately *not* part of this struct; it is loaded once at
//! startup into `SigningKeyMaterial` and injected where needed.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AuthError, Result};

/// Default access-token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECONDS: u64 = 900;

/// Default refresh-token lifetime: 7 days.
pub const DEFAULT_REFRESH_TTL_SECONDS: u64 = 604_800;

/// Argon2id cost parameters for password hashing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Argon2Config {
    /// Number of iterations.
    pub time_cost: u32,
    /// Memory size in KiB.
    pub memory_kib: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
    /// Digest length in bytes.
    pub output_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        // time 3, memory 64 MiB, parallelism 4, 32-byte digest
        Self {
            time_cost: 3,
            memory_kib: 64 * 1024,
            parallelism: 4,
            output_len: 32,
        }
    }
}

/// Auth core configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Access-token lifetime in seconds.
    pub access_ttl_seconds: u64,
    /// Refresh-token lifetime in seconds.
    pub refresh_ttl_seconds: u64,
    /// Password hashing cost parameters.
    pub argon2: Argon2Config,
    /// Name under which the static API-key secret is stored in the
    /// `SecretStore` collaborator.
    pub api_key_secret_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            argon2: Argon2Config::default(),
            api_key_secret_name: "api-key".to_string(),
        }
    }
}

impl AuthConfig {
    /// Build a config from `LEDGER_AUTH_*` environment variables, falling
    /// back to defaults for anything unset.
    ///
    /// Recognized variables:
    /// - `LEDGER_AUTH_ACCESS_TTL_SECONDS`
    /// - `LEDGER_AUTH_REFRESH_TTL_SECONDS`
    /// - `LEDGER_AUTH_API_KEY_SECRET_NAME`
    ///
    /// A variable that is present but unparsable is a configuration error,
    /// not a silent fallback.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(ttl) = parse_env_u64("LEDGER_AUTH_ACCESS_TTL_SECONDS")? {
            config.access_ttl_seconds = ttl;
        }
        if let Some(ttl) = parse_env_u64("LEDGER_AUTH_REFRESH_TTL_SECONDS")? {
            config.refresh_ttl_seconds = ttl;
        }
        if let Ok(name) = env::var("LEDGER_AUTH_API_KEY_SECRET_NAME") {
            if !name.is_empty() {
                config.api_key_secret_name = name;
            }
        }

        Ok(config)
    }
}

fn parse_env_u64(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| AuthError::Configuration(format!("{} must be an integer", name))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl_seconds, 900);
        assert_eq!(config.refresh_ttl_seconds, 604_800);
        assert_eq!(config.api_key_secret_name, "api-key");

        let argon2 = config.argon2;
        assert_eq!(argon2.time_cost, 3);
        assert_eq!(argon2.memory_kib, 65_536);
        assert_eq!(argon2.parallelism, 4);
        assert_eq!(argon2.output_len, 32);
    }

    #[test]
    fn test_from_env_overrides() {
        // Env vars are process-global; use names only this test touches.
        unsafe {
            env::set_var("LEDGER_AUTH_ACCESS_TTL_SECONDS", "120");
            env::set_var("LEDGER_AUTH_API_KEY_SECRET_NAME", "gateway-key");
        }

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.access_ttl_seconds, 120);
        assert_eq!(config.api_key_secret_name, "gateway-key");
        assert_eq!(config.refresh_ttl_seconds, DEFAULT_REFRESH_TTL_SECONDS);

        unsafe {
            env::remove_var("LEDGER_AUTH_ACCESS_TTL_SECONDS");
            env::remove_var("LEDGER_AUTH_API_KEY_SECRET_NAME");
        }
    }

    #[test]
    fn test_from_env_rejects_garbage() {
        unsafe {
            env::set_var("LEDGER_AUTH_REFRESH_TTL_SECONDS", "next tuesday");
        }

        let err = AuthConfig::from_env().unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));

        unsafe {
            env::remove_var("LEDGER_AUTH_REFRESH_TTL_SECONDS");
        }
    }
}
