//! Bearer-token authentication, including master impersonation.
//!
//! The flow is a strict state machine: extract token, verify signature,
//! resolve the live user, resolve impersonation, enrich. Each step gates the
//! next; any failure is terminal. Every rejection uses the shared generic
//! message except one: an impersonation target that does not resolve. That
//! branch is reachable only by already-authenticated master users, who need
//! to know why their impersonation failed.
//!
//! User existence is re-checked on every request; nothing here caches a
//! verified token, so a deleted user is rejected on their very next call.

use std::sync::Arc;
use tracing::{debug, info};

use crate::context::{AccessType, SessionPartial};
use crate::error::{AuthError, Result};
use crate::headers::RequestHeaders;
use crate::store::{UserRecord, UserStore};
use crate::token::TokenCodec;
use crate::types::{TenantId, UserId};

/// Message for the single distinguishable rejection.
const IMPERSONATED_USER_NOT_FOUND: &str = "impersonated user not found";

/// Authenticates bearer access tokens into a session enrichment.
pub struct TokenAuthenticator {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
}

impl TokenAuthenticator {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self { codec, users }
    }

    /// Run the full authentication state machine for one request.
    pub async fn authenticate(&self, headers: &RequestHeaders) -> Result<SessionPartial> {
        // Start -> TokenExtracted
        let Some(token) = headers.bearer_token() else {
            debug!("bearer token missing");
            return Err(AuthError::not_signed());
        };

        // -> SignatureVerified. Codec failure detail stays in the logs; the
        // caller only sees the generic rejection.
        let claims = self.codec.verify(token).map_err(|e| {
            debug!(error = %e, "bearer token rejected");
            AuthError::not_signed()
        })?;

        // -> UserResolved
        let user = self.users.find_by_id(&claims.sub).await?;
        let Some(user) = user.filter(UserRecord::is_active) else {
            debug!(user_id = %claims.sub, "token subject missing or deleted");
            return Err(AuthError::not_signed());
        };

        // -> ImpersonationResolved -> Enriched
        if user.is_master && headers.has_impersonation() {
            return self.resolve_impersonation(&user, headers).await;
        }

        let tenant_id = if user.is_master {
            // Masters bypass the tenant requirement; an explicit scope is
            // still honored.
            headers.tenant_id.clone()
        } else {
            let tenant = headers
                .impersonate_tenant_id
                .clone()
                .or_else(|| headers.tenant_id.clone());
            let Some(tenant) = tenant else {
                debug!(user_id = %user.id, "non-master request without tenant scope");
                return Err(AuthError::not_signed());
            };
            Some(tenant)
        };

        Ok(SessionPartial {
            access_type: Some(AccessType::AuthUser),
            user_id: Some(user.id),
            tenant_id,
            ..Default::default()
        })
    }

    /// Resolve the impersonation headers of an authenticated master.
    ///
    /// The target user must independently resolve to a live account; the
    /// target tenant is accepted verbatim, unvalidated.
    async fn resolve_impersonation(
        &self,
        master: &UserRecord,
        headers: &RequestHeaders,
    ) -> Result<SessionPartial> {
        let acting_user_id: UserId = match &headers.impersonate_user_id {
            Some(target_id) => {
                let target = self.users.find_by_id(target_id).await?;
                let Some(target) = target.filter(UserRecord::is_active) else {
                    debug!(master = %master.id, target = %target_id, "impersonation target unresolved");
                    return Err(AuthError::NotSigned(IMPERSONATED_USER_NOT_FOUND.into()));
                };
                target.id
            }
            None => master.id.clone(),
        };

        let tenant_id: Option<TenantId> = headers.impersonate_tenant_id.clone();

        info!(
            master = %master.id,
            acting_as = %acting_user_id,
            "master impersonation resolved"
        );

        Ok(SessionPartial {
            access_type: Some(AccessType::AuthUser),
            user_id: Some(acting_user_id),
            tenant_id,
            // Audit trail: who authorized vs. who is acting.
            master_user_id: Some(master.id.clone()),
            ..Default::default()
        })
    }
}
