use std::str::FromStr;

use axum::extract::{Query, State};
use axum::Json;
use mnemo_core::{Fragment, FragmentType, Scope, Speaker};
use mnemo_store::Filters;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

fn default_role() -> String {
    "default".to_string()
}

const fn default_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct MemoriesQuery {
    user_id: String,
    session_id: String,
    #[serde(default = "default_role")]
    role_id: String,
    #[serde(default = "default_limit")]
    limit: usize,
    min_importance: Option<u8>,
    speaker: Option<String>,
    #[serde(rename = "type")]
    fragment_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MemoriesResponse {
    fragments: Vec<Fragment>,
}

/// `GET /v1/memories`: a filtered listing of one scope's
/// fragments, newest-first, via [`mnemo_store::Store::list`].
pub async fn list_memories(
    State(state): State<AppState>,
    Query(query): Query<MemoriesQuery>,
) -> Result<Json<MemoriesResponse>, ApiError> {
    let speaker = query
        .speaker
        .as_deref()
        .map(Speaker::from_str)
        .transpose()
        .map_err(ApiError)?;
    let fragment_type = query
        .fragment_type
        .as_deref()
        .map(FragmentType::from_str)
        .transpose()
        .map_err(ApiError)?;

    let filters = Filters { min_importance: query.min_importance, speaker, fragment_type };
    let scope = Scope::new(query.user_id, query.session_id, query.role_id);

    let fragments = state
        .store
        .list(&scope, query.limit, &filters)
        .await
        .map_err(ApiError)?;

    Ok(Json(MemoriesResponse { fragments }))
}
