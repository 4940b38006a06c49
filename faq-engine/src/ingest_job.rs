//! FAQ file → vector index job behind the `faq-ingest` binary.

use std::fmt;
use std::path::{Path, PathBuf};

use rag_store::{DocumentIngester, IngestReport, RagError};
use tracing::{info, warn};

use crate::error::EngineError;
use crate::faq_table::{parse_faq_lines, to_documents};

/// How an ingestion run ended. `Display` renders the line shown to the operator.
#[derive(Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    MissingFile(PathBuf),
    NoEntries(PathBuf),
    Ingested {
        collection: String,
        report: IngestReport,
    },
}

impl IngestOutcome {
    /// Process exit status: `1` when the FAQ file does not exist, `0` otherwise.
    pub fn exit_status(&self) -> u8 {
        match self {
            IngestOutcome::MissingFile(_) => 1,
            IngestOutcome::NoEntries(_) | IngestOutcome::Ingested { .. } => 0,
        }
    }
}

impl fmt::Display for IngestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestOutcome::MissingFile(path) => write!(
                f,
                "Create {} with lines 'Question:Answer'",
                path.display()
            ),
            IngestOutcome::NoEntries(path) => write!(f, "No entries found in {}", path.display()),
            IngestOutcome::Ingested { collection, report } => write!(
                f,
                "Ingested {} FAQ entries into '{}'",
                report.upserted, collection
            ),
        }
    }
}

/// Parses `path` and hands its documents to the ingester built by `connect`.
///
/// `connect` runs only when there is something to ingest, so a missing or
/// empty file never touches the embedding model or the index.
///
/// # Errors
/// Unreadable file, ingester construction failure, or ingestion failure.
pub async fn ingest_faq_file<I, F>(path: &Path, connect: F) -> Result<IngestOutcome, EngineError>
where
    I: DocumentIngester,
    F: FnOnce() -> Result<I, RagError>,
{
    if !path.exists() {
        warn!("FAQ file {} does not exist", path.display());
        return Ok(IngestOutcome::MissingFile(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|source| EngineError::FaqRead {
        path: path.to_path_buf(),
        source,
    })?;
    let docs = to_documents(&parse_faq_lines(&text));
    if docs.is_empty() {
        return Ok(IngestOutcome::NoEntries(path.to_path_buf()));
    }

    let ingester = connect()?;
    let report = ingester.ingest_documents(&docs).await?;
    info!(
        documents = report.documents,
        upserted = report.upserted,
        dimension = report.dimension,
        "FAQ ingestion finished"
    );

    Ok(IngestOutcome::Ingested {
        collection: ingester.collection().to_string(),
        report,
    })
}
