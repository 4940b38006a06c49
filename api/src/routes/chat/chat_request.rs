use serde::{Deserialize, Serialize};

/// Request payload for /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Natural language question.
    pub question: String,
    /// Conversation to continue; a new id is minted when absent or empty.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response payload for /chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    /// Omitted only when the question was blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}
