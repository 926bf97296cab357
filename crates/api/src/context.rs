use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;

use liftlog_auth::{AccessError, DenialKind};
use liftlog_core::UserId;

use crate::app::errors;

/// Caller identity for a request, established upstream and inserted by
/// [`crate::middleware::caller_middleware`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CallerContext {
    user_id: UserId,
}

impl CallerContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Handlers that take a `CallerContext` reject anonymous requests with the
/// same denial the guard produces.
#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerContext>()
            .copied()
            .ok_or_else(|| errors::access_error_to_response(&AccessError::denied(DenialKind::CallerMissing)))
    }
}
