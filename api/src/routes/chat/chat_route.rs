//! POST /chat: answers a question within a conversation.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use faq_engine::prompt::EMPTY_QUESTION;
use services::uuid::new_session_id;
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// Handler: POST /chat
///
/// A blank question is answered with a fixed prompt and touches no session.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/chat \
///   -H 'content-type: application/json' \
///   -d '{"question":"What are your hours?"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;

    let question = body.question.trim();
    if question.is_empty() {
        return Ok(Json(ChatResponse {
            answer: EMPTY_QUESTION.to_string(),
            session_id: None,
        }));
    }

    let session_id = body
        .session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(new_session_id);
    debug!(session = %session_id, "chat request");

    let resolution = state.resolver.resolve(question, &session_id).await;

    Ok(Json(ChatResponse {
        answer: resolution.answer,
        session_id: Some(session_id),
    }))
}
