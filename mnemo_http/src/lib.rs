#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Axum HTTP surface over the orchestrator and identity/store collaborators
//!.

mod auth;
mod error;
mod routes;
mod state;
mod test_support;

pub use state::AppState;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Assembles the full route table behind the `X-API-Key` gate
///: `/health` is exempt since it predates authentication
/// concerns (liveness probes shouldn't need a key), everything under `/v1`
/// is not.
#[must_use]
pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/v1/chat", post(routes::chat::chat))
        .route("/v1/chat/completions", post(routes::chat::completions))
        .route("/v1/memories", get(routes::memories::list_memories))
        .route("/v1/users", post(routes::users::create_user))
        .route("/v1/users/{id}", get(routes::users::get_user))
        .route("/v1/users/{id}/sessions", get(routes::sessions::list_sessions_for_user))
        .route("/v1/sessions", post(routes::sessions::create_session))
        .route("/v1/sessions/{id}", get(routes::sessions::get_session))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key));

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
