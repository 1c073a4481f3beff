//! Per-request session context.
//!
//! One [`SessionContext`] exists per request: created empty when the request
//! arrives, enriched by whichever authenticator accepts the credentials, read
//! by downstream use cases, and discarded at request end. Enrichment is
//! additive: a later merge can fill fields but never clear them, so no code
//! path can silently downgrade an established identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CorrelationId, TenantId, UserId};

/// How the current request was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    /// No credential accepted (the initial state).
    NotAuthenticated,
    /// Bearer access token, possibly via impersonation.
    AuthUser,
    /// Static API key.
    ApiKey,
}

/// The principal record consumed by downstream logic.
///
/// Invariants upheld by the authenticators: `AuthUser` implies `user_id` is
/// set, and a non-master `AuthUser` carries a `tenant_id`; `ApiKey` may omit
/// both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub access_type: AccessType,
    pub user_id: Option<UserId>,
    pub tenant_id: Option<TenantId>,
    /// Set only while impersonating: the master user who authorized the
    /// request, as opposed to the user it acts as. Exists purely for audit.
    pub master_user_id: Option<UserId>,
    pub correlation_id: Option<CorrelationId>,
    /// Logical endpoint handling the request, for audit logging.
    /// Authentication leaves this empty; the embedding router fills it in,
    /// either at construction or later via [`enrich`](Self::enrich).
    pub endpoint: Option<String>,
}

/// Additive update applied to a [`SessionContext`].
#[derive(Debug, Clone, Default)]
pub struct SessionPartial {
    pub access_type: Option<AccessType>,
    pub user_id: Option<UserId>,
    pub tenant_id: Option<TenantId>,
    pub master_user_id: Option<UserId>,
    pub correlation_id: Option<CorrelationId>,
    pub endpoint: Option<String>,
}

impl SessionContext {
    /// Fresh unauthenticated context with a generated correlation id.
    pub fn new_for_request(endpoint: Option<String>) -> Self {
        Self {
            access_type: AccessType::NotAuthenticated,
            user_id: None,
            tenant_id: None,
            master_user_id: None,
            correlation_id: Some(CorrelationId::new(Uuid::new_v4().to_string())),
            endpoint,
        }
    }

    /// Merge a partial into this context. Fields already set are kept when
    /// the partial leaves them `None`; merging never clears anything.
    pub fn enrich(&mut self, partial: SessionPartial) {
        if let Some(access_type) = partial.access_type {
            self.access_type = access_type;
        }
        if partial.user_id.is_some() {
            self.user_id = partial.user_id;
        }
        if partial.tenant_id.is_some() {
            self.tenant_id = partial.tenant_id;
        }
        if partial.master_user_id.is_some() {
            self.master_user_id = partial.master_user_id;
        }
        if partial.correlation_id.is_some() {
            self.correlation_id = partial.correlation_id;
        }
        if partial.endpoint.is_some() {
            self.endpoint = partial.endpoint;
        }
    }

    /// Whether a master user is acting as someone else on this request.
    pub fn is_impersonating(&self) -> bool {
        self.master_user_id.is_some()
    }
}
