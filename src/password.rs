//! Password hashing with Argon2id.
//!
//! One-way hash and verify, nothing else. A fresh random salt is generated
//! per call and embedded in the returned PHC string, so `hash` never returns
//! the same string twice for one password. Verification is delegated to the
//! argon2 crate, which compares digests in constant time; nothing here
//! branches on *where* two inputs differ. Plaintext passwords never reach
//! the logs.

use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::debug;

use crate::config::Argon2Config;
use crate::error::{AuthError, Result};

/// Argon2id password hasher.
#[derive(Debug)]
pub struct PasswordHasher {
    inner: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher from cost parameters.
    ///
    /// Invalid parameter combinations (e.g. zero memory) are a configuration
    /// error.
    pub fn new(config: Argon2Config) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.time_cost,
            config.parallelism,
            Some(config.output_len),
        )
        .map_err(|e| AuthError::Configuration(format!("invalid argon2 parameters: {}", e)))?;

        Ok(Self {
            inner: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password into a self-describing PHC string.
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(AuthError::Validation("password must not be empty".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .inner
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {}", e)))?;

        Ok(phc.to_string())
    }

    /// Verify a password against a stored PHC string.
    ///
    /// A hash string that does not parse, or that was produced by a different
    /// algorithm, yields `Ok(false)` rather than an error: from the caller's
    /// point of view the credential simply does not match.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        if password.is_empty() || hash.is_empty() {
            return Err(AuthError::Validation(
                "password and hash must not be empty".into(),
            ));
        }

        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "stored password hash did not parse");
                return Ok(false);
            }
        };

        match self.inner.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!(error = %e, "password verification rejected");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Low-cost parameters so the test suite stays fast; the production
    /// defaults only change work factor, not behavior.
    fn test_hasher() -> PasswordHasher {
        PasswordHasher::new(Argon2Config {
            time_cost: 1,
            memory_kib: 8 * 1024,
            parallelism: 1,
            output_len: 32,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hasher = test_hasher();
        let hash = hasher.hash("correct horse battery staple").unwrap();

        assert!(hasher.verify("correct horse battery staple", &hash).unwrap());
        assert!(!hasher.verify("correct horse battery stapl", &hash).unwrap());
        assert!(!hasher.verify("completely different", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted_per_call() {
        let hasher = test_hasher();
        let a = hasher.hash("hunter2!").unwrap();
        let b = hasher.hash("hunter2!").unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify("hunter2!", &a).unwrap());
        assert!(hasher.verify("hunter2!", &b).unwrap());
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hasher = test_hasher();
        let hash = hasher.hash("secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_empty_inputs_are_validation_errors() {
        let hasher = test_hasher();

        assert!(matches!(
            hasher.hash("").unwrap_err(),
            AuthError::Validation(_)
        ));
        assert!(matches!(
            hasher.verify("", "$argon2id$x").unwrap_err(),
            AuthError::Validation(_)
        ));
        assert!(matches!(
            hasher.verify("secret", "").unwrap_err(),
            AuthError::Validation(_)
        ));
    }

    #[test]
    fn test_malformed_hash_returns_false() {
        let hasher = test_hasher();

        assert!(!hasher.verify("secret", "not-a-phc-string").unwrap());
        assert!(!hasher.verify("secret", "$argon2id$truncated").unwrap());
        // A valid PHC string from a different algorithm is equally "no match".
        assert!(
            !hasher
                .verify(
                    "secret",
                    "$2b$12$C6UzMDM.H6dfI/f/IKcEeO5S0WYhWyzc0Qh4fO5p1rC2mJ4mTSkGy"
                )
                .unwrap()
        );
    }

    #[test]
    fn test_zero_memory_is_configuration_error() {
        let err = PasswordHasher::new(Argon2Config {
            time_cost: 1,
            memory_kib: 0,
            parallelism: 1,
            output_len: 32,
        })
        .unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }
}
