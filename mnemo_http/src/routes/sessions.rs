use axum::extract::{Path, State};
use axum::Json;
use mnemo_core::Error;
use mnemo_identity::SessionRecord;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

fn default_role() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    session_id: String,
    user_id: String,
    #[serde(default = "default_role")]
    role_id: String,
}

/// `POST /v1/sessions`: create a session record, idempotent on
/// `session_id`.
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<SessionRecord>, ApiError> {
    let record = state
        .sessions
        .get_or_create(&body.session_id, &body.user_id, &body.role_id)
        .await?;
    Ok(Json(record))
}

/// `GET /v1/sessions/{id}`.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionRecord>, ApiError> {
    state
        .sessions
        .get(&session_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError(Error::UnknownSession(session_id)))
}

#[derive(Debug, Serialize)]
pub struct UserSessionsResponse {
    sessions: Vec<SessionRecord>,
}

/// `GET /v1/users/{id}/sessions`: every session belonging to
/// the user, newest-first.
pub async fn list_sessions_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserSessionsResponse>, ApiError> {
    let sessions = state.sessions.list_for_user(&user_id).await?;
    Ok(Json(UserSessionsResponse { sessions }))
}
