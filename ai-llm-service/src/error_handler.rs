//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`OllamaError`]). Small helpers for reading/validating environment variables are
//! provided and return the unified [`Result<T>`] alias; sibling crates reuse them
//! for their own env-driven configs.
//!
//! Config messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use std::str::FromStr;

use thiserror::Error;

use crate::services::ollama_service::OllamaError;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Errors raised while talking to Ollama.
    #[error(transparent)]
    Ollama(#[from] OllamaError),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `OLLAMA_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `RELEVANCE_THRESHOLD`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Reads a string variable, falling back to `default` when unset or blank.
pub fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Reads an optional string variable (`None` if unset or blank).
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    env_parse_opt(name, "expected u32")
}

/// Parses an optional value of any `FromStr` type (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] carrying `reason` on parse failure.
pub fn env_parse_opt<T: FromStr>(name: &'static str, reason: &'static str) -> Result<Option<T>> {
    match env_opt(name) {
        Some(v) => v.parse::<T>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber { var: name, reason })
        }),
        None => Ok(None),
    }
}

/// Parses a value of any `FromStr` type, using `default` when unset/empty.
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] carrying `reason` on parse failure.
pub fn env_parse_or<T: FromStr>(name: &'static str, default: T, reason: &'static str) -> Result<T> {
    Ok(env_parse_opt(name, reason)?.unwrap_or(default))
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_scheme_is_checked() {
        assert!(validate_http_endpoint("OLLAMA_URL", "http://localhost:11434").is_ok());
        assert!(validate_http_endpoint("OLLAMA_URL", "https://ollama.internal").is_ok());
        assert!(validate_http_endpoint("OLLAMA_URL", "localhost:11434").is_err());
    }

    #[test]
    fn range_is_inclusive() {
        assert!(validate_range_f32("t", 0.0, 0.0, 1.0).is_ok());
        assert!(validate_range_f32("t", 1.0, 0.0, 1.0).is_ok());
        assert!(validate_range_f32("t", 1.01, 0.0, 1.0).is_err());
        assert!(validate_range_f32("t", f32::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn unset_variables_fall_back() {
        let name = "AI_LLM_SERVICE_TEST_SURELY_UNSET";
        assert_eq!(env_or(name, "dflt"), "dflt");
        assert_eq!(env_opt(name), None);
        assert_eq!(env_parse_or::<u64>(name, 7, "expected u64").unwrap(), 7);
    }
}
