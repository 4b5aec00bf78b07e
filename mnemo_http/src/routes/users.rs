use axum::extract::{Path, State};
use axum::Json;
use mnemo_core::Error;
use mnemo_identity::UserRecord;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    user_id: String,
    username: Option<String>,
}

/// `POST /v1/users`: create a user record, idempotent on
/// `user_id`.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<UserRecord>, ApiError> {
    let record = state.users.get_or_create(&body.user_id, body.username.as_deref()).await?;
    Ok(Json(record))
}

/// `GET /v1/users/{id}`.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    state
        .users
        .get(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError(Error::UnknownUser(user_id)))
}
