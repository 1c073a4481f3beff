//! Access-token signing and verification.
//!
//! Tokens are compact JWTs signed with ES256 (ECDSA over P-256/SHA-256,
//! fixed-length IEEE-P1363 signatures): three base64url segments joined by
//! `.`. Verification is strictly ordered (format, then signature, then
//! payload, then expiry) and each step is a terminal failure point. The
//! codec performs no I/O; key material is parsed once at startup and
//! injected.

use jsonwebtoken::{Algorithm, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AuthError, GENERIC_REJECTION, Result};
use crate::keys::SigningKeyMaterial;
use crate::types::{TenantId, UserId, Username};

/// Claims carried in a signed access token.
///
/// Immutable once signed; `exp - iat` equals the TTL passed to
/// [`TokenCodec::sign`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the authenticated user id.
    pub sub: UserId,
    /// Login name, for display and audit only.
    pub username: Username,
    /// Home tenant of the user, when they have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    /// Whether the subject is a master user.
    pub is_master: bool,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: u64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
}

/// Input for signing a new access token; the codec stamps `iat`/`exp`.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: UserId,
    pub username: Username,
    pub tenant_id: Option<TenantId>,
    pub is_master: bool,
}

/// Signs and verifies bearer access tokens.
#[derive(Clone)]
pub struct TokenCodec {
    keys: SigningKeyMaterial,
}

impl TokenCodec {
    /// Create a codec over already-validated key material.
    pub fn new(keys: SigningKeyMaterial) -> Self {
        Self { keys }
    }

    /// Sign an access token valid for `ttl_seconds` from now.
    pub fn sign(&self, subject: TokenSubject, ttl_seconds: u64) -> Result<String> {
        let now = unix_now()?;
        let claims = TokenClaims {
            sub: subject.user_id,
            username: subject.username,
            tenant_id: subject.tenant_id,
            is_master: subject.is_master,
            iat: now,
            exp: now + ttl_seconds,
        };

        encode(&Header::new(Algorithm::ES256), &claims, self.keys.encoding_key())
            .map_err(|e| AuthError::Internal(format!("token signing failed: {}", e)))
    }

    /// Verify a token and return its claims.
    ///
    /// Failure points, in order: segment count, signature, payload parse,
    /// expiry. Signature and payload failures share the generic rejection
    /// message; format and expiry carry their own stable messages (both are
    /// facts the caller already knows about its own token).
    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        if token.split('.').count() != 3 {
            return Err(AuthError::NotSigned("invalid token format".into()));
        }

        let mut validation = Validation::new(Algorithm::ES256);
        validation.leeway = 0;

        match decode::<TokenClaims>(token, self.keys.decoding_key(), &validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::NotSigned("token expired".into())),
                _ => Err(AuthError::NotSigned(GENERIC_REJECTION.into())),
            },
        }
    }
}

fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AuthError::Internal(format!("system clock error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::test_keys::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(SigningKeyMaterial::from_pem(PRIVATE_KEY_PEM, PUBLIC_KEY_PEM).unwrap())
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: UserId::new("user-1"),
            username: Username::new("alice"),
            tenant_id: Some(TenantId::new("tenant-1")),
            is_master: false,
        }
    }

    #[test]
    fn test_sign_then_verify_round_trip() {
        let codec = codec();
        let token = codec.sign(subject(), 900).unwrap();

        assert_eq!(token.split('.').count(), 3);

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, UserId::new("user-1"));
        assert_eq!(claims.username, Username::new("alice"));
        assert_eq!(claims.tenant_id, Some(TenantId::new("tenant-1")));
        assert!(!claims.is_master);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_tenant_is_optional_in_claims() {
        let codec = codec();
        let token = codec
            .sign(
                TokenSubject {
                    tenant_id: None,
                    is_master: true,
                    ..subject()
                },
                60,
            )
            .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.tenant_id, None);
        assert!(claims.is_master);
    }

    #[test]
    fn test_wrong_segment_count_is_invalid_format() {
        let codec = codec();

        for garbage in ["", "abc", "a.b", "a.b.c.d"] {
            let err = codec.verify(garbage).unwrap_err();
            assert_eq!(err.to_string(), "not signed: invalid token format");
        }
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let codec = codec();
        let token = codec.sign(subject(), 900).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        // Re-encode the payload with a privilege escalation; the signature
        // no longer matches.
        use base64::Engine as _;
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let payload = engine.decode(&parts[1]).unwrap();
        let mut claims: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        claims["is_master"] = serde_json::Value::Bool(true);
        parts[1] = engine.encode(serde_json::to_vec(&claims).unwrap());

        let err = codec.verify(&parts.join(".")).unwrap_err();
        assert_eq!(err.to_string(), format!("not signed: {}", GENERIC_REJECTION));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let codec = codec();
        let token = codec.sign(subject(), 900).unwrap();

        let mut bytes = token.into_bytes();
        let last = *bytes.last().unwrap();
        *bytes.last_mut().unwrap() = if last == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let err = codec.verify(&tampered).unwrap_err();
        assert_eq!(err.to_string(), format!("not signed: {}", GENERIC_REJECTION));
    }

    #[test]
    fn test_token_from_other_key_pair_is_rejected() {
        let other = TokenCodec::new(
            SigningKeyMaterial::from_pem(OTHER_PRIVATE_KEY_PEM, OTHER_PUBLIC_KEY_PEM).unwrap(),
        );
        let token = other.sign(subject(), 900).unwrap();

        let err = codec().verify(&token).unwrap_err();
        assert_eq!(err.to_string(), format!("not signed: {}", GENERIC_REJECTION));
    }

    #[test]
    fn test_expired_token_is_rejected_as_expired() {
        let keys = SigningKeyMaterial::from_pem(PRIVATE_KEY_PEM, PUBLIC_KEY_PEM).unwrap();
        let now = unix_now().unwrap();
        let claims = TokenClaims {
            sub: UserId::new("user-1"),
            username: Username::new("alice"),
            tenant_id: None,
            is_master: false,
            iat: now - 120,
            exp: now - 60,
        };
        let token = encode(&Header::new(Algorithm::ES256), &claims, keys.encoding_key()).unwrap();

        let err = TokenCodec::new(keys).verify(&token).unwrap_err();
        assert_eq!(err.to_string(), "not signed: token expired");
    }
}
