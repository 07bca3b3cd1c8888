//! Chat route handler: the conversational assistant proxy.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::extract::Json;
use crate::middleware::Auth;
use crate::services::assistant::{self, ChatTurn};
use crate::state::AppState;

/// Chat request: the whole history plus the new message. The server keeps no
/// conversation state.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    pub message: String,
}

/// The assistant's reply.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat
///
/// # Errors
///
/// 400 for an empty message, 500 when the model call fails.
#[instrument(skip_all, fields(user = %auth.user.id, history_len = body.history.len()))]
pub async fn chat(
    State(state): State<AppState>,
    auth: Auth,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let reply = assistant::reply(state.gemini(), &body.history, &body.message).await?;
    Ok(Json(ChatResponse { reply }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults_to_empty_history() {
        let body: ChatRequest = serde_json::from_str(r#"{"message": "kya bhav hai?"}"#).unwrap();
        assert!(body.history.is_empty());
        assert_eq!(body.message, "kya bhav hai?");
    }
}
