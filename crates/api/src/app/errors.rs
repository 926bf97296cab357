use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use liftlog_auth::{AccessError, DenialKind};
use liftlog_core::DomainError;

/// Single place where authorization outcomes become HTTP statuses.
pub fn access_error_to_response(err: &AccessError) -> Response {
    match err {
        AccessError::Denied(denial) => {
            let (status, code) = match denial.kind {
                DenialKind::CallerMissing => (StatusCode::UNAUTHORIZED, "unauthenticated"),
                DenialKind::ResourceNotFound => (StatusCode::NOT_FOUND, "not_found"),
                DenialKind::PermissionDenied => (StatusCode::FORBIDDEN, "forbidden"),
            };
            json_error(status, code, denial.message.clone())
        }
        AccessError::Repository(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "repository_error", e.to_string())
        }
        AccessError::ResourceTypeNotDeclared
        | AccessError::InvalidResourceType(_)
        | AccessError::UnrecognizedEntityType(_)
        | AccessError::EntityTypeMismatch { .. }
        | AccessError::MalformedRecord { .. }
        | AccessError::InvalidRule { .. } => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "authorization_misconfigured",
            err.to_string(),
        ),
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
