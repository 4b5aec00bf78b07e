use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    status: &'static str,
    version: &'static str,
    embedding_variant: mnemo_core::EmbeddingVariant,
    environment: &'static str,
}

/// `GET /health`: liveness plus the reported config a caller
/// needs to sanity-check it's talking to the instance it expects.
pub async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        embedding_variant: state.config.embedding_model,
        environment: if state.config.auth_required() { "production" } else { "development" },
    })
}
