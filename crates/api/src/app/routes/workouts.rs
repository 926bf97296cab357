use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use liftlog_auth::ResourceType;
use liftlog_core::{DomainError, ExerciseId, WorkoutId};
use liftlog_workouts::{Exercise, Workout};

use crate::app::routes::{created, deleted, found, listed};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz::protect;
use crate::context::CallerContext;

pub fn router() -> Router {
    let owned = protect(
        Router::new()
            .route("/:id", get(get_workout).patch(update_workout).delete(delete_workout))
            .route("/:id/exercises", post(add_exercise).get(list_exercises)),
        ResourceType::Workout,
    );

    Router::new()
        .route("/", post(create_workout).get(list_workouts))
        .merge(owned)
}

pub async fn create_workout(
    Extension(services): Extension<Arc<AppServices>>,
    caller: CallerContext,
    Json(body): Json<dto::CreateWorkoutRequest>,
) -> Response {
    let workout = match Workout::new(
        WorkoutId::new(),
        caller.user_id(),
        body.name,
        body.notes,
        body.performed_at.unwrap_or_else(Utc::now),
    ) {
        Ok(w) => w,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store.upsert_workout(workout.clone()) {
        Ok(()) => created(workout),
        // The owner link points at the caller; a missing parent means they never registered.
        Err(DomainError::NotFound) => errors::domain_error_to_response(DomainError::validation(
            "register the caller before creating workouts",
        )),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_workouts(
    Extension(services): Extension<Arc<AppServices>>,
    caller: CallerContext,
) -> Response {
    listed(services.store.workouts_for(caller.user_id()))
}

pub async fn get_workout(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<WorkoutId>,
) -> Response {
    found(services.store.workout(id))
}

pub async fn update_workout(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<WorkoutId>,
    Json(body): Json<dto::UpdateWorkoutRequest>,
) -> Response {
    let mut workout = match services.store.workout(id) {
        Ok(Some(w)) => w,
        Ok(None) => return errors::domain_error_to_response(DomainError::not_found()),
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = workout.revise(body.name, body.notes) {
        return errors::domain_error_to_response(e);
    }

    match services.store.upsert_workout(workout.clone()) {
        Ok(()) => found(Ok(Some(workout))),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_workout(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<WorkoutId>,
) -> Response {
    deleted(services.store.delete_workout(id))
}

pub async fn add_exercise(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<WorkoutId>,
    Json(body): Json<dto::AddExerciseRequest>,
) -> Response {
    let position = match body.position {
        Some(p) => p,
        None => match services.store.exercises_for(id) {
            Ok(existing) => existing.len() as u32,
            Err(e) => return errors::domain_error_to_response(e),
        },
    };

    let exercise = match Exercise::new(ExerciseId::new(), id, body.name, position) {
        Ok(e) => e,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store.upsert_exercise(exercise.clone()) {
        Ok(()) => created(exercise),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_exercises(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<WorkoutId>,
) -> Response {
    listed(services.store.exercises_for(id))
}
