use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
///
/// Answer-pipeline failures never surface here; they are rendered into the
/// answer text. Only startup failures and malformed requests do.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Llm(#[from] ai_llm_service::AiLlmError),

    #[error(transparent)]
    Ollama(#[from] ai_llm_service::OllamaError),

    #[error(transparent)]
    Rag(#[from] rag_store::RagError),

    #[error(transparent)]
    Engine(#[from] faq_engine::EngineError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    /// Body rejected by the JSON extractor (status chosen by axum).
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidBody { status, .. } => *status,
            AppError::Llm(_)
            | AppError::Ollama(_)
            | AppError::Rag(_)
            | AppError::Engine(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Llm(_) | AppError::Ollama(_) | AppError::Rag(_) | AppError::Engine(_) => {
                "CONFIG_ERROR"
            }
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::InvalidBody { .. } => "BAD_REQUEST",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: err.status(),
            message: err.body_text(),
        }
    }
}
