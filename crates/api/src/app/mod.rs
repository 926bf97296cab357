//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository and guard wiring
//! - `routes/`: HTTP routes + handlers (one file per resource type)
//! - `dto.rs`: request bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig, services: Arc<AppServices>) -> Router {
    let caller_state = middleware::CallerState {
        header: config.caller_header.clone(),
    };

    // Caller-scoped routes: identity from upstream, ownership per route group.
    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(Extension(services))
            .layer(axum::middleware::from_fn_with_state(
                caller_state,
                middleware::caller_middleware,
            )),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}

pub use services::AppServices;
