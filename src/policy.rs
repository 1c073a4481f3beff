//! Post-authentication authorization checks.
//!
//! All checks read the request's `SessionContext`. Anything other than an
//! authenticated user fails closed with `Forbidden`. Authorization errors
//! keep distinct kinds and messages; the caller's identity is already
//! established, so there is no enumeration oracle to worry about here.

use std::sync::Arc;
use tracing::debug;

use crate::context::{AccessType, SessionContext};
use crate::error::{AuthError, Result};
use crate::store::{ProfileStore, UserRecord, UserStore};
use crate::types::{ProfileId, UserId};

/// Ownership and role checks over the session context.
pub struct AuthorizationPolicy {
    users: Arc<dyn UserStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl AuthorizationPolicy {
    pub fn new(users: Arc<dyn UserStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { users, profiles }
    }

    /// The authenticated user id, or `Forbidden`.
    pub fn authenticated_user_id(&self, ctx: &SessionContext) -> Result<UserId> {
        if ctx.access_type != AccessType::AuthUser {
            return Err(AuthError::Forbidden("authentication required".into()));
        }
        ctx.user_id
            .clone()
            .ok_or_else(|| AuthError::Forbidden("authentication required".into()))
    }

    /// Require the current user to be a master.
    pub async fn require_master(&self, ctx: &SessionContext) -> Result<()> {
        let user = self.current_user(ctx).await?;
        if !user.is_master {
            debug!(user_id = %user.id, "master access denied");
            return Err(AuthError::Forbidden("master access required".into()));
        }
        Ok(())
    }

    /// Allow access to a profile iff the current user is a master or owns it.
    pub async fn check_profile_ownership(
        &self,
        ctx: &SessionContext,
        profile_id: &ProfileId,
    ) -> Result<()> {
        let user = self.current_user(ctx).await?;

        let profile = self.profiles.find_by_id(profile_id).await?;
        let Some(profile) = profile else {
            return Err(AuthError::NotFound("profile not found".into()));
        };

        if user.is_master || profile.user_id == user.id {
            return Ok(());
        }
        debug!(user_id = %user.id, profile_id = %profile_id, "profile access denied");
        Err(AuthError::Forbidden("not the profile owner".into()))
    }

    /// Allow access to a user resource iff the current user is a master or
    /// is that user. Structurally `check_profile_ownership` without the
    /// profile indirection.
    pub async fn check_user_ownership(
        &self,
        ctx: &SessionContext,
        target_user_id: &UserId,
    ) -> Result<()> {
        let user = self.current_user(ctx).await?;

        if user.is_master || *target_user_id == user.id {
            return Ok(());
        }
        debug!(user_id = %user.id, target = %target_user_id, "user access denied");
        Err(AuthError::Forbidden("not the resource owner".into()))
    }

    /// Load the live record behind the session's user id.
    ///
    /// A context whose user vanished since authentication fails closed; the
    /// next `authenticate` call would reject it anyway.
    async fn current_user(&self, ctx: &SessionContext) -> Result<UserRecord> {
        let user_id = self.authenticated_user_id(ctx)?;
        let user = self.users.find_by_id(&user_id).await?;
        user.filter(UserRecord::is_active)
            .ok_or_else(|| AuthError::Forbidden("authentication required".into()))
    }
}
