//! FAQ answering engine.
//!
//! Public API: [`AnswerResolver::resolve`]. The resolver checks the exact FAQ
//! table, handles "summarize" requests from session memory, and otherwise
//! grounds a completion in the closest FAQ document from `rag-store`,
//! escalating when nothing relevant is found.

mod cfg;
mod error;
pub mod faq_table;
mod ingest_job;
pub mod prompt;
mod resolver;
pub mod session_store;

pub use cfg::{EngineConfig, PipelineMode, faq_path_from_env};
pub use error::EngineError;
pub use faq_table::{FaqLine, FaqTable};
pub use ingest_job::{IngestOutcome, ingest_faq_file};
pub use resolver::{AnswerResolver, AnswerSource, Resolution};
pub use session_store::{Exchange, InMemorySessionStore, MAX_EXCHANGES, SessionStore};
