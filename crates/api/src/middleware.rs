use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, StatusCode},
    middleware::Next,
    response::Response,
};

use liftlog_core::UserId;

use crate::app::errors;
use crate::context::CallerContext;

#[derive(Clone)]
pub struct CallerState {
    pub header: HeaderName,
}

/// Attach the upstream-authenticated caller to the request.
///
/// A missing header is passed through (the guard denies it); a malformed one
/// is rejected here.
pub async fn caller_middleware(
    State(state): State<CallerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    if let Some(user_id) = extract_caller(req.headers(), &state.header)? {
        req.extensions_mut().insert(CallerContext::new(user_id));
    }

    Ok(next.run(req).await)
}

fn extract_caller(headers: &HeaderMap, name: &HeaderName) -> Result<Option<UserId>, Response> {
    let Some(header) = headers.get(name) else {
        return Ok(None);
    };

    let malformed = || {
        errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_caller",
            format!("header '{name}' does not carry a caller id"),
        )
    };

    let value = header.to_str().map_err(|_| malformed())?.trim();
    if value.is_empty() {
        return Err(malformed());
    }

    value.parse::<UserId>().map(Some).map_err(|_| malformed())
}
