//! Career-advice chat endpoint: a thin passthrough to the LLM client.
//! No fallback here — an AI failure surfaces to the caller.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

const CHAT_SYSTEM: &str = "You are a helpful career assistant on a job board. \
    Answer questions about job searching, resumes, interviews, and career \
    growth. Keep replies concise and practical.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let reply = state
        .llm
        .call_text(&request.message, CHAT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("chat reply failed: {e}")))?;

    Ok(Json(ChatResponse { reply }))
}
