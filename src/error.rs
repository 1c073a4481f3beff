//! Error types for the auth core.
//!
//! Every authentication failure (bad token, missing user, wrong password,
//! invalid api key) normalizes to [`AuthError::NotSigned`] with one generic
//! message so callers cannot distinguish *why* a credential was rejected.
//! The single documented exception is the impersonation-target lookup, which
//! is only reachable by already-authenticated master users.

use http::StatusCode;

/// Generic rejection message shared by all credential failures.
///
/// Length mismatch, content mismatch, unknown user, expired token: all of
/// them surface as this exact string to avoid enumeration oracles.
pub(crate) const GENERIC_REJECTION: &str = "invalid authentication credentials";

/// Main error type for auth core operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Credential missing, malformed, expired, or revoked (~401).
    #[error("not signed: {0}")]
    NotSigned(String),

    /// Caller is authenticated but not permitted (~403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A referenced entity does not exist (~404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller-supplied input failed validation (~400).
    #[error("validation: {0}")]
    Validation(String),

    /// Startup or key-material misconfiguration (~500).
    #[error("configuration: {0}")]
    Configuration(String),

    /// Unexpected internal failure, e.g. a hashing backend error (~500).
    #[error("internal: {0}")]
    Internal(String),
}

impl AuthError {
    /// The shared generic credential rejection.
    pub fn not_signed() -> Self {
        Self::NotSigned(GENERIC_REJECTION.into())
    }

    /// Convert error to HTTP status code for the (out-of-scope) routing layer.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotSigned(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Repository collaborators are opaque; whatever they fail with is internal.
impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type alias for auth core operations.
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::not_signed().status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Forbidden("nope".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::NotFound("profile".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::Validation("empty password".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Configuration("bad key".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_generic_rejection_is_stable() {
        let a = AuthError::not_signed().to_string();
        let b = AuthError::not_signed().to_string();
        assert_eq!(a, b);
        assert!(a.contains(GENERIC_REJECTION));
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let err: AuthError = anyhow::anyhow!("connection reset").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
