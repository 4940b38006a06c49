//! One-shot job: embeds every line of the FAQ file into the Qdrant collection.
//!
//! Point ids are line numbers, so re-running over the same file overwrites.

use std::process::ExitCode;

use ai_llm_service::telemetry;
use faq_engine::{faq_path_from_env, ingest_faq_file};
use rag_store::RagStore;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Invalid .env file: {e}");
            return ExitCode::FAILURE;
        }
    }
    if let Err(e) = telemetry::init("info") {
        eprintln!("Failed to install logger: {e}");
    }

    match ingest_faq_file(&faq_path_from_env(), RagStore::ollama_from_env).await {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::from(outcome.exit_status())
        }
        Err(e) => {
            error!("FAQ ingestion failed: {e}");
            eprintln!("FAQ ingestion failed: {e}");
            ExitCode::FAILURE
        }
    }
}
