//! Exact-match FAQ table loaded from a flat `question:answer` file.
//!
//! The same parsed lines feed two consumers: the in-memory lookup table used
//! while serving, and the document list the ingestion job embeds.

use std::collections::HashMap;
use std::path::Path;

use rag_store::IndexedDocument;
use tracing::{info, warn};

use crate::error::EngineError;

/// One non-empty source line.
///
/// `line_no` is the 0-based physical line number, blank lines included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FaqLine {
    /// `question:answer`, split on the first colon, both halves trimmed.
    Pair {
        line_no: u64,
        question: String,
        answer: String,
    },
    /// Line without a colon; embedded as-is, never looked up exactly.
    Bare { line_no: u64, text: String },
}

/// Parses FAQ source text. Lines are trimmed; empty lines are skipped.
pub fn parse_faq_lines(text: &str) -> Vec<FaqLine> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let line = raw.trim();
            if line.is_empty() {
                return None;
            }
            let line_no = i as u64;
            Some(match line.split_once(':') {
                Some((q, a)) => FaqLine::Pair {
                    line_no,
                    question: q.trim().to_string(),
                    answer: a.trim().to_string(),
                },
                None => FaqLine::Bare {
                    line_no,
                    text: line.to_string(),
                },
            })
        })
        .collect()
}

/// Maps parsed lines to index documents: the answer (or bare line) is the
/// embedded text, the question rides along in the payload.
pub fn to_documents(lines: &[FaqLine]) -> Vec<IndexedDocument> {
    lines
        .iter()
        .map(|line| match line {
            FaqLine::Pair {
                line_no,
                question,
                answer,
            } => IndexedDocument {
                id: *line_no,
                text: answer.clone(),
                question: question.clone(),
            },
            FaqLine::Bare { line_no, text } => IndexedDocument {
                id: *line_no,
                text: text.clone(),
                question: String::new(),
            },
        })
        .collect()
}

/// Question → answer lookup with a case-insensitive fallback.
#[derive(Clone, Debug, Default)]
pub struct FaqTable {
    exact: HashMap<String, String>,
    lowercase: HashMap<String, String>,
}

impl FaqTable {
    /// Builds the table from parsed lines; a later duplicate question wins.
    pub fn from_lines(lines: &[FaqLine]) -> Self {
        let mut table = Self::default();
        for line in lines {
            if let FaqLine::Pair {
                question, answer, ..
            } = line
            {
                table.exact.insert(question.clone(), answer.clone());
                table.lowercase.insert(question.to_lowercase(), answer.clone());
            }
        }
        table
    }

    /// Reads and parses `path`.
    ///
    /// # Errors
    /// [`EngineError::FaqRead`] if the file is missing or unreadable.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::FaqRead {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_lines(&parse_faq_lines(&text));
        info!("Loaded {} FAQ entries from {}", table.len(), path.display());
        Ok(table)
    }

    /// Like [`FaqTable::load`], but a missing or unreadable file yields an empty table.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{e}; serving without exact FAQ answers");
            Self::default()
        })
    }

    /// Exact question first, then the lowercased question. Empty answers count as misses.
    pub fn lookup(&self, question: &str) -> Option<&str> {
        self.exact
            .get(question)
            .map(String::as_str)
            .filter(|a| !a.is_empty())
            .or_else(|| {
                self.lowercase
                    .get(&question.to_lowercase())
                    .map(String::as_str)
                    .filter(|a| !a.is_empty())
            })
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "What are your hours?:We are open 9-5.\n\
                          \n\
                          Where are you?: 12 Main St: Suite 4 \n\
                          We ship worldwide\n";

    #[test]
    fn parses_pairs_and_bare_lines_with_physical_line_numbers() {
        let lines = parse_faq_lines(SAMPLE);
        assert_eq!(
            lines,
            vec![
                FaqLine::Pair {
                    line_no: 0,
                    question: "What are your hours?".into(),
                    answer: "We are open 9-5.".into(),
                },
                FaqLine::Pair {
                    line_no: 2,
                    question: "Where are you?".into(),
                    answer: "12 Main St: Suite 4".into(),
                },
                FaqLine::Bare {
                    line_no: 3,
                    text: "We ship worldwide".into(),
                },
            ]
        );
    }

    #[test]
    fn documents_use_answer_as_text() {
        let docs = to_documents(&parse_faq_lines(SAMPLE));
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].id, 0);
        assert_eq!(docs[0].text, "We are open 9-5.");
        assert_eq!(docs[0].question, "What are your hours?");
        assert_eq!(docs[2].id, 3);
        assert_eq!(docs[2].text, "We ship worldwide");
        assert_eq!(docs[2].question, "");
    }

    #[test]
    fn lookup_is_exact_then_case_insensitive() {
        let table = FaqTable::from_lines(&parse_faq_lines(SAMPLE));
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("What are your hours?"), Some("We are open 9-5."));
        assert_eq!(table.lookup("WHERE ARE YOU?"), Some("12 Main St: Suite 4"));
        assert_eq!(table.lookup("We ship worldwide"), None);
        assert_eq!(table.lookup("What are your hours"), None);
    }

    #[test]
    fn empty_answer_is_a_miss() {
        let table = FaqTable::from_lines(&parse_faq_lines("Blank:\n"));
        assert_eq!(table.lookup("Blank"), None);
    }

    #[test]
    fn missing_file_is_strict_or_empty() {
        let path = Path::new("/definitely/not/here/faq.txt");
        assert!(matches!(FaqTable::load(path), Err(EngineError::FaqRead { .. })));
        assert!(FaqTable::load_or_empty(path).is_empty());
    }
}
