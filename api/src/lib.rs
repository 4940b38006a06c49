use std::sync::Arc;

pub mod core {
    pub mod app_state;
}
pub mod error_handler;
pub mod routes {
    pub mod chat {
        pub mod chat_request;
        pub mod chat_route;
    }
}

use ai_llm_service::error_handler::env_or;
use axum::{Router, routing::post};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::core::app_state::AppState;
use crate::error_handler::AppError;
use crate::routes::chat::chat_route::chat;

/// Default bind address when `API_ADDRESS` is unset.
pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

/// Builds state from the environment, binds `API_ADDRESS` and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env_or("API_ADDRESS", DEFAULT_API_ADDRESS);
    let state = Arc::new(AppState::from_env()?);

    let app = build_router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!("FAQ chat API listening on http://{host_url}");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("Server stopped");
    Ok(())
}

/// `POST /chat` with permissive CORS and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
