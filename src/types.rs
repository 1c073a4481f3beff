//! NewType wrappers for strong typing throughout the auth core.
//!
//! These types prevent accidental mixing of semantically different strings
//! (e.g., passing a tenant id where a user id is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// Stable identifier of a user account.
    ///
    /// This is the subject of access tokens (`sub` claim), the owner of
    /// refresh tokens, and the identity recorded in the session context.
    UserId
);

newtype_string!(
    /// Login name of a user account.
    ///
    /// Usernames are carried in access-token claims for display and audit
    /// purposes only; all lookups during authentication go through `UserId`
    /// except at sign-in.
    Username
);

newtype_string!(
    /// Logical customer boundary scoping ledger data visibility.
    ///
    /// Non-master authenticated users always act within exactly one tenant.
    /// Master users may act without a tenant, or select one verbatim through
    /// impersonation headers.
    TenantId
);

newtype_string!(
    /// Stable identifier of a user profile.
    ///
    /// Profiles are ownership targets for authorization checks; this crate
    /// never creates or mutates them.
    ProfileId
);

newtype_string!(
    /// Correlation id attached to a request's session context.
    ///
    /// Generated fresh per request (UUID v4) unless the caller supplied one
    /// via the `x-correlation-id` header. Used for log correlation only;
    /// never for authorization decisions.
    CorrelationId
);
