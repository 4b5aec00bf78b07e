use axum::extract::State;
use axum::Json;
use mnemo_orchestrator::ConversationOptions;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

fn default_role() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    user_id: String,
    session_id: String,
    #[serde(default = "default_role")]
    role_id: String,
    message: String,
    username: Option<String>,
    #[serde(default)]
    extract_now: bool,
    min_importance_override: Option<u8>,
    max_context_memories_override: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    response: String,
    session_id: String,
    user_id: String,
    memory_extracted: bool,
    message_count: usize,
}

/// `POST /v1/chat`: one turn of conversation through the
/// [`mnemo_orchestrator::Orchestrator`].
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let options = ConversationOptions {
        username: body.username,
        extract_now: body.extract_now,
        min_importance_override: body.min_importance_override,
        max_context_memories_override: body.max_context_memories_override,
    };

    let (response, meta) = state
        .orchestrator
        .chat(&body.user_id, &body.session_id, &body.role_id, &body.message, &options)
        .await?;

    Ok(Json(ChatResponse {
        response,
        session_id: body.session_id,
        user_id: body.user_id,
        memory_extracted: meta.extraction_triggered,
        message_count: meta.message_count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    #[allow(dead_code)]
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    user_id: String,
    session_id: String,
    #[serde(default = "default_role")]
    role_id: String,
    messages: Vec<CompletionMessage>,
}

#[derive(Debug, Serialize)]
pub struct CompletionChoice {
    index: usize,
    message: CompletionResponseMessage,
    finish_reason: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponseMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    object: &'static str,
    model: String,
    choices: Vec<CompletionChoice>,
}

/// `POST /v1/chat/completions`: an OpenAI-compatible shape
/// around the same orchestrator turn, taking the last `user` message in the
/// body as this turn's input and ignoring the rest of the array — the
/// orchestrator's own session buffer is the history of record, not the
/// request body.
pub async fn completions(
    State(state): State<AppState>,
    Json(body): Json<CompletionRequest>,
) -> Result<Json<CompletionResponse>, ApiError> {
    let last_user_message = body
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.clone())
        .ok_or(mnemo_core::Error::EmptyContent)?;

    let role_id = body.role_id.clone();
    let (response, _meta) = state
        .orchestrator
        .chat(
            &body.user_id,
            &body.session_id,
            &body.role_id,
            &last_user_message,
            &ConversationOptions::default(),
        )
        .await?;

    Ok(Json(CompletionResponse {
        object: "chat.completion",
        model: role_id,
        choices: vec![CompletionChoice {
            index: 0,
            message: CompletionResponseMessage { role: "assistant", content: response },
            finish_reason: "stop",
        }],
    }))
}
