//! Periodic cooling/window recommendations
//!
//! latest indoor + outdoor readings → [`build_prompt`] → [`LanguageModel`]
//! → [`parse_recommendation`] → storage

pub mod ollama;
pub mod parser;
pub mod prompt;
pub mod scheduler;

pub use ollama::{LanguageModel, OllamaClient};
pub use parser::{parse_recommendation, RecommendationReply};
pub use prompt::build_prompt;
pub use scheduler::{RecommendationEngine, RecommendationScheduler, SchedulerState};

use std::fmt;
use thiserror::Error;

/// Which configured sensor a reading is looked up for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorRole {
    Indoor,
    Outdoor,
}

impl fmt::Display for SensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorRole::Indoor => write!(f, "indoor"),
            SensorRole::Outdoor => write!(f, "outdoor"),
        }
    }
}

/// Recommendation cycle errors
///
/// None of these are fatal. The cycle is abandoned and the next tick tries again.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("No {role} reading stored for {device_model}")]
    MissingReading {
        role: SensorRole,
        device_model: String,
    },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] owr_common::Error),

    #[error("Language model unreachable: {0}")]
    LlmUnreachable(String),

    #[error("Language model returned status {status}: {body}")]
    LlmBadStatus { status: u16, body: String },

    #[error("Language model response undecodable: {0}")]
    LlmBadBody(String),

    #[error("Unparseable recommendation ({reason}), response was: {text}")]
    UnparseableRecommendation { reason: String, text: String },
}
