//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ai_llm_service::error_handler::{env_or, env_parse_or, validate_range_f32};
use ai_llm_service::{AiLlmError, ConfigError};

use crate::error::EngineError;

/// Which answer pipeline the resolver runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineMode {
    /// FAQ → summarize → gated RAG → escalation, with session memory.
    #[default]
    Stateful,
    /// FAQ → (ungated) RAG or bare question → always complete; no memory.
    Stateless,
}

impl FromStr for PipelineMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stateful" => Ok(Self::Stateful),
            "stateless" => Ok(Self::Stateless),
            other => Err(EngineError::InvalidMode(other.to_string())),
        }
    }
}

/// Config bag for the engine. All fields have defaults.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// FAQ source file (`question:answer` per line).
    pub faq_path: PathBuf,
    /// Minimum relevance in `[0, 1]`; a match is trusted iff `distance <= 1 - threshold`.
    pub relevance_threshold: f32,
    pub mode: PipelineMode,
    /// Idle time after which a session is forgotten.
    pub session_ttl: Duration,
    /// Maximum number of live sessions; least recently used go first.
    pub session_max_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            faq_path: PathBuf::from("faq.txt"),
            relevance_threshold: 0.6,
            mode: PipelineMode::Stateful,
            session_ttl: Duration::from_secs(3600),
            session_max_count: 10_000,
        }
    }
}

impl EngineConfig {
    /// Build from `FAQ_PATH`, `RELEVANCE_THRESHOLD`, `PIPELINE_MODE`,
    /// `SESSION_TTL_SECS` and `SESSION_MAX_COUNT`.
    ///
    /// # Errors
    /// Unparsable numbers, an unknown pipeline mode, or values rejected by
    /// [`EngineConfig::validate`].
    pub fn from_env() -> Result<Self, EngineError> {
        let cfg = Self {
            faq_path: faq_path_from_env(),
            relevance_threshold: env_parse_or(
                "RELEVANCE_THRESHOLD",
                0.6f32,
                "expected float in [0, 1]",
            )?,
            mode: env_or("PIPELINE_MODE", "stateful").parse()?,
            session_ttl: Duration::from_secs(env_parse_or(
                "SESSION_TTL_SECS",
                3600u64,
                "expected seconds",
            )?),
            session_max_count: env_parse_or(
                "SESSION_MAX_COUNT",
                10_000usize,
                "expected positive integer",
            )?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks ranges: threshold in `[0, 1]`, non-zero session TTL and cap.
    ///
    /// # Errors
    /// [`ConfigError::OutOfRange`] wrapped in [`EngineError::Config`].
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_range_f32("RELEVANCE_THRESHOLD", self.relevance_threshold, 0.0, 1.0)?;
        if self.session_ttl.is_zero() {
            return Err(out_of_range("SESSION_TTL_SECS", "must be > 0"));
        }
        if self.session_max_count == 0 {
            return Err(out_of_range("SESSION_MAX_COUNT", "must be > 0"));
        }
        Ok(())
    }

    /// Largest retrieval distance still considered relevant.
    pub fn max_distance(&self) -> f32 {
        1.0 - self.relevance_threshold
    }
}

/// FAQ source file: `FAQ_PATH`, default `faq.txt`.
pub fn faq_path_from_env() -> PathBuf {
    PathBuf::from(env_or("FAQ_PATH", "faq.txt"))
}

fn out_of_range(field: &'static str, detail: &'static str) -> EngineError {
    AiLlmError::from(ConfigError::OutOfRange { field, detail }).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pipeline_modes() {
        assert_eq!("Stateless".parse::<PipelineMode>().unwrap(), PipelineMode::Stateless);
        assert_eq!(" stateful ".parse::<PipelineMode>().unwrap(), PipelineMode::Stateful);
        assert!(matches!(
            "chatty".parse::<PipelineMode>(),
            Err(EngineError::InvalidMode(m)) if m == "chatty"
        ));
    }

    #[test]
    fn default_threshold_allows_point_four() {
        let cfg = EngineConfig::default();
        assert!((cfg.max_distance() - 0.4).abs() < 1e-6);
        assert_eq!(cfg.mode, PipelineMode::Stateful);
    }

    #[test]
    fn zero_session_ttl_is_rejected() {
        let cfg = EngineConfig {
            session_ttl: Duration::ZERO,
            ..EngineConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("SESSION_TTL_SECS"), "{err}");
    }

    #[test]
    fn validate_checks_threshold_and_cap() {
        assert!(EngineConfig::default().validate().is_ok());

        let threshold = EngineConfig {
            relevance_threshold: 2.0,
            ..EngineConfig::default()
        };
        assert!(threshold.validate().is_err());

        let cap = EngineConfig {
            session_max_count: 0,
            ..EngineConfig::default()
        };
        assert!(cap.validate().unwrap_err().to_string().contains("SESSION_MAX_COUNT"));
    }
}
