//! Answer pipeline.
//!
//! Stateful mode, first match wins:
//! 1. exact / case-insensitive FAQ hit
//! 2. "summarize" → summary of the session's recent exchanges
//! 3. retrieval gated by relevance → grounded completion, else escalation
//!
//! Stateless mode skips session memory and the summary branch, does not gate
//! retrieval, and always ends in a completion call.

use std::sync::Arc;

use ai_llm_service::CompletionClient;
use rag_store::{TopMatch, VectorRetriever};
use tracing::{debug, info, instrument, warn};

use crate::cfg::{EngineConfig, PipelineMode};
use crate::faq_table::FaqTable;
use crate::prompt;
use crate::session_store::{Exchange, SessionStore};

/// Distances within this margin of the limit are accepted (f32 rounding of `1 - threshold`).
const DISTANCE_EPSILON: f32 = 1e-6;

/// Which branch produced an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerSource {
    Faq,
    Summary,
    NoHistory,
    Rag,
    Escalation,
    /// Stateless mode without a retrieved document: the bare question was completed.
    Direct,
}

/// Final answer plus its origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub source: AnswerSource,
}

impl Resolution {
    fn new(answer: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            answer: answer.into(),
            source,
        }
    }
}

/// Resolves questions against the FAQ table, session memory, the vector index
/// and the completion model.
pub struct AnswerResolver {
    faq: FaqTable,
    completion: Arc<dyn CompletionClient>,
    retriever: Arc<dyn VectorRetriever>,
    sessions: Arc<dyn SessionStore>,
    mode: PipelineMode,
    max_distance: f32,
}

impl AnswerResolver {
    pub fn new(
        cfg: &EngineConfig,
        faq: FaqTable,
        completion: Arc<dyn CompletionClient>,
        retriever: Arc<dyn VectorRetriever>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            faq,
            completion,
            retriever,
            sessions,
            mode: cfg.mode,
            max_distance: cfg.max_distance(),
        }
    }

    /// Answers a non-empty, trimmed `question` within `session_id`.
    ///
    /// Never fails: retrieval errors degrade to "no match" and completion
    /// errors become the answer text. In stateful mode the exchange is
    /// recorded in the session afterwards.
    #[instrument(skip(self, question), fields(mode = ?self.mode))]
    pub async fn resolve(&self, question: &str, session_id: &str) -> Resolution {
        let resolution = match self.mode {
            PipelineMode::Stateful => {
                self.sessions.ensure(session_id);
                let r = self.resolve_stateful(question, session_id).await;
                self.sessions.append(
                    session_id,
                    Exchange {
                        user: question.to_string(),
                        bot: r.answer.clone(),
                    },
                );
                r
            }
            PipelineMode::Stateless => self.resolve_stateless(question).await,
        };

        info!(source = ?resolution.source, "question resolved");
        resolution
    }

    async fn resolve_stateful(&self, question: &str, session_id: &str) -> Resolution {
        if let Some(answer) = self.faq.lookup(question) {
            return Resolution::new(answer, AnswerSource::Faq);
        }

        if question.to_lowercase().contains(prompt::SUMMARIZE_KEYWORD) {
            let history = self.sessions.history(session_id);
            if history.is_empty() {
                return Resolution::new(prompt::NO_HISTORY, AnswerSource::NoHistory);
            }
            debug!(turns = history.len(), "summarizing session");
            let answer = self.complete(&prompt::summary_prompt(&history)).await;
            return Resolution::new(answer, AnswerSource::Summary);
        }

        match self.top_match(question).await {
            Some(m) if m.distance <= self.max_distance + DISTANCE_EPSILON => {
                debug!(distance = m.distance, "context accepted");
                let answer = self
                    .complete(&prompt::context_prompt(&m.document, question))
                    .await;
                Resolution::new(answer, AnswerSource::Rag)
            }
            other => {
                debug!(
                    distance = other.as_ref().map(|m| m.distance),
                    max = self.max_distance,
                    "no relevant context; escalating"
                );
                Resolution::new(prompt::ESCALATION, AnswerSource::Escalation)
            }
        }
    }

    async fn resolve_stateless(&self, question: &str) -> Resolution {
        if let Some(answer) = self.faq.lookup(question) {
            return Resolution::new(answer, AnswerSource::Faq);
        }

        match self.top_match(question).await {
            Some(m) => {
                let answer = self
                    .complete(&prompt::context_prompt(&m.document, question))
                    .await;
                Resolution::new(answer, AnswerSource::Rag)
            }
            None => Resolution::new(self.complete(question).await, AnswerSource::Direct),
        }
    }

    async fn top_match(&self, question: &str) -> Option<TopMatch> {
        match self.retriever.query_top_match(question).await {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "retrieval failed; treating as no match");
                None
            }
        }
    }

    async fn complete(&self, prompt_text: &str) -> String {
        match self.completion.complete(prompt_text, None).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "completion failed");
                prompt::completion_error(&e)
            }
        }
    }
}
