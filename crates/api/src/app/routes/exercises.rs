use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{get, post},
    Json, Router,
};

use liftlog_auth::ResourceType;
use liftlog_core::{ExerciseId, SetId};
use liftlog_workouts::WorkoutSet;

use crate::app::routes::{created, deleted, found, listed};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz::protect;

pub fn router() -> Router {
    protect(
        Router::new()
            .route("/:id", get(get_exercise).delete(delete_exercise))
            .route("/:id/sets", post(add_set).get(list_sets)),
        ResourceType::Exercise,
    )
}

pub async fn get_exercise(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<ExerciseId>,
) -> Response {
    found(services.store.exercise(id))
}

pub async fn delete_exercise(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<ExerciseId>,
) -> Response {
    deleted(services.store.delete_exercise(id))
}

pub async fn add_set(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<ExerciseId>,
    Json(body): Json<dto::AddSetRequest>,
) -> Response {
    let set = match WorkoutSet::new(SetId::new(), id, body.reps, body.weight_kg) {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store.upsert_set(set.clone()) {
        Ok(()) => created(set),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_sets(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<ExerciseId>,
) -> Response {
    listed(services.store.sets_for(id))
}
