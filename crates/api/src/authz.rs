//! Route-level ownership enforcement.
//!
//! A route group declares which resource type its `:id` refers to with
//! [`protect`]; [`require_ownership`] then runs the authorization guard before
//! the handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, RawPathParams, Request},
    middleware::Next,
    response::Response,
    Router,
};

use liftlog_auth::{AccessContext, ResourceTag, ResourceType};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::CallerContext;

/// Path parameter holding the protected resource's id.
pub const RESOURCE_ID_PARAM: &str = "id";

/// Declare `resource` as the type addressed by `:id` on every route in
/// `router`, and enforce ownership on them.
pub fn protect(router: Router, resource: ResourceType) -> Router {
    router
        .route_layer(axum::middleware::from_fn(require_ownership))
        .route_layer(Extension(ResourceTag::from(resource)))
}

pub async fn require_ownership(
    Extension(services): Extension<Arc<AppServices>>,
    params: RawPathParams,
    req: Request,
    next: Next,
) -> Response {
    let ctx = AccessContext {
        caller: req.extensions().get::<CallerContext>().map(CallerContext::user_id),
        resource_type: req.extensions().get::<ResourceTag>().cloned(),
        resource_id: params
            .iter()
            .find(|(key, _)| *key == RESOURCE_ID_PARAM)
            .map(|(_, value)| value.to_string()),
    };

    match services.guard.can_activate(&ctx).await {
        Ok(()) => next.run(req).await,
        Err(e) => errors::access_error_to_response(&e),
    }
}
