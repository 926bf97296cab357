//! Per-request authorization pipeline.
//!
//! caller → declared type → accessor → fetch → coerce → ability → decision.
//! Runs once, holds nothing across requests, and performs no writes.

use std::sync::Arc;

use uuid::Uuid;

use liftlog_core::UserId;

use crate::ability::define_ability;
use crate::coercion::to_entity;
use crate::error::{AccessError, Denial, DenialKind};
use crate::ownership::OwnershipSource;
use crate::resolver::ResourceResolver;
use crate::subject::ResourceTag;
use crate::Action;

/// What the guard needs to know about the incoming request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessContext {
    /// Identity established upstream by authentication.
    pub caller: Option<UserId>,
    /// Resource type declared by the protected route.
    pub resource_type: Option<ResourceTag>,
    /// Raw identifier taken from the request path.
    pub resource_id: Option<String>,
}

impl AccessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caller(mut self, caller: UserId) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_resource_type(mut self, tag: impl Into<ResourceTag>) -> Self {
        self.resource_type = Some(tag.into());
        self
    }

    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    fn deny(kind: DenialKind) -> Self {
        Decision::Deny(Denial::new(kind))
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decides whether the caller may manage the addressed resource.
#[derive(Clone)]
pub struct AuthorizationGuard {
    resolver: ResourceResolver,
    ownership: Arc<dyn OwnershipSource>,
}

impl AuthorizationGuard {
    pub fn new(resolver: ResourceResolver, ownership: Arc<dyn OwnershipSource>) -> Self {
        Self { resolver, ownership }
    }

    /// Allow/deny for the request. `Err` is reserved for configuration faults
    /// and repository failures, which are never turned into denials.
    pub async fn decide(&self, ctx: &AccessContext) -> Result<Decision, AccessError> {
        let result = self.run(ctx).await;

        let tag = ctx.resource_type.as_ref().map(ResourceTag::as_str).unwrap_or("-");
        let resource_id = ctx.resource_id.as_deref().unwrap_or("-");
        match &result {
            Ok(Decision::Allow) => {
                tracing::debug!(caller = ?ctx.caller, resource_type = tag, resource_id, "access allowed");
            }
            Ok(Decision::Deny(denial)) => {
                tracing::info!(
                    caller = ?ctx.caller,
                    resource_type = tag,
                    resource_id,
                    reason = %denial.message,
                    "access denied"
                );
            }
            Err(e) => {
                tracing::error!(caller = ?ctx.caller, resource_type = tag, resource_id, error = %e, "authorization failed");
            }
        }

        result
    }

    /// `Ok(())` lets the request proceed; every denial comes back as
    /// `AccessError::Denied`.
    pub async fn can_activate(&self, ctx: &AccessContext) -> Result<(), AccessError> {
        match self.decide(ctx).await? {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(AccessError::Denied(denial)),
        }
    }

    async fn run(&self, ctx: &AccessContext) -> Result<Decision, AccessError> {
        let Some(caller_id) = ctx.caller else {
            return Ok(Decision::deny(DenialKind::CallerMissing));
        };

        let tag = ctx
            .resource_type
            .as_ref()
            .ok_or(AccessError::ResourceTypeNotDeclared)?;
        let (resource_type, accessor) = self.resolver.resolve_tag(tag)?;

        // An id that is not a UUID cannot name a stored record.
        let Some(resource_id) = ctx
            .resource_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        else {
            return Ok(Decision::deny(DenialKind::ResourceNotFound));
        };

        let Some(record) = accessor.fetch_by_id(resource_id).await? else {
            return Ok(Decision::deny(DenialKind::ResourceNotFound));
        };

        let instance = to_entity(&record, resource_type)?;

        let caller = self.ownership.load_caller(caller_id).await?;
        let ability = define_ability(&caller)?;

        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(explanation = ?ability.explain(Action::Manage, &instance), "ownership check");
        }

        if ability.can(Action::Manage, &instance) {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::deny(DenialKind::PermissionDenied))
        }
    }
}

impl core::fmt::Debug for AuthorizationGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthorizationGuard")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
