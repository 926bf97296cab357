use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use liftlog_auth::ResourceType;
use liftlog_core::UserId;
use liftlog_workouts::User;

use crate::app::routes::{created, found};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz::protect;
use crate::context::CallerContext;

pub fn router() -> Router {
    let owned = protect(Router::new().route("/:id", get(get_user)), ResourceType::User);

    Router::new().route("/", post(register_user)).merge(owned)
}

/// Register the calling identity as a user. The id is the caller's.
pub async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    caller: CallerContext,
    Json(body): Json<dto::RegisterUserRequest>,
) -> Response {
    let user = match User::register(caller.user_id(), body.email, body.display_name, Utc::now()) {
        Ok(u) => u,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store.insert_user(user.clone()) {
        Ok(()) => created(user),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<UserId>,
) -> Response {
    found(services.store.user(id))
}
