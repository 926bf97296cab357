use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::get,
    Json, Router,
};

use liftlog_auth::ResourceType;
use liftlog_core::{DomainError, SetId};

use crate::app::routes::{deleted, found};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz::protect;

pub fn router() -> Router {
    protect(
        Router::new().route("/:id", get(get_set).patch(update_set).delete(delete_set)),
        ResourceType::Set,
    )
}

pub async fn get_set(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<SetId>,
) -> Response {
    found(services.store.set(id))
}

pub async fn update_set(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<SetId>,
    Json(body): Json<dto::UpdateSetRequest>,
) -> Response {
    let mut set = match services.store.set(id) {
        Ok(Some(s)) => s,
        Ok(None) => return errors::domain_error_to_response(DomainError::not_found()),
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = set.record(body.reps, body.weight_kg) {
        return errors::domain_error_to_response(e);
    }

    match services.store.upsert_set(set.clone()) {
        Ok(()) => found(Ok(Some(set))),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_set(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<SetId>,
) -> Response {
    deleted(services.store.delete_set(id))
}
