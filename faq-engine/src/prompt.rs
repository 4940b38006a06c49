//! Prompt templates and fixed user-facing replies.

use crate::session_store::Exchange;

/// Reply to a blank question.
pub const EMPTY_QUESTION: &str = "Please ask a question.";

/// Reply to a summarize request on a session without exchanges.
pub const NO_HISTORY: &str = "No conversation history to summarize.";

/// Reply when no sufficiently relevant FAQ document exists.
pub const ESCALATION: &str = "I'm not able to answer this question. Escalating to human support.";

/// Trigger word (case-insensitive) for the summarization branch.
pub const SUMMARIZE_KEYWORD: &str = "summarize";

/// `User:`/`Bot:` transcript of `history`, oldest first, wrapped in the summary prompt.
pub fn summary_prompt(history: &[Exchange]) -> String {
    let convo = history
        .iter()
        .map(|m| format!("User: {}\nBot: {}", m.user, m.bot))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Summarize the following conversation:\n{convo}\nSummary:")
}

/// Grounded-answer prompt for a retrieved document.
pub fn context_prompt(document: &str, question: &str) -> String {
    format!("Use the context below to answer.\n\nContext:\n{document}\n\nQ: {question}\nA:")
}

/// Completion failures are returned to the user as the answer text.
pub fn completion_error(err: &impl std::fmt::Display) -> String {
    format!("Ollama error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_turns_in_order() {
        let history = vec![
            Exchange {
                user: "hi".into(),
                bot: "hello".into(),
            },
            Exchange {
                user: "hours?".into(),
                bot: "9-5".into(),
            },
        ];
        assert_eq!(
            summary_prompt(&history),
            "Summarize the following conversation:\nUser: hi\nBot: hello\nUser: hours?\nBot: 9-5\nSummary:"
        );
    }

    #[test]
    fn context_prompt_layout() {
        assert_eq!(
            context_prompt("We are open 9-5.", "When do you open?"),
            "Use the context below to answer.\n\nContext:\nWe are open 9-5.\n\nQ: When do you open?\nA:"
        );
    }
}
