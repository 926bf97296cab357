use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use liftlog_core::DomainResult;

use crate::app::errors;

pub mod exercises;
pub mod sets;
pub mod system;
pub mod users;
pub mod workouts;

/// Router for all caller-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/users", users::router())
        .nest("/workouts", workouts::router())
        .nest("/exercises", exercises::router())
        .nest("/sets", sets::router())
}

/// 200 with the record, 404 if the store no longer has it.
///
/// The guard already proved existence; a miss here means it was deleted in between.
fn found<T: Serialize>(result: DomainResult<Option<T>>) -> Response {
    match result {
        Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn listed<T: Serialize>(result: DomainResult<Vec<T>>) -> Response {
    match result {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn created<T: Serialize>(item: T) -> Response {
    (StatusCode::CREATED, Json(item)).into_response()
}

fn deleted(result: DomainResult<bool>) -> Response {
    match result {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}
