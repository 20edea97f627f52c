//! Language-model ranking client.
//!
//! This crate turns a user's matching criteria and a list of candidate
//! activities into scored matches by asking an OpenAI-compatible
//! chat-completions backend. It handles:
//! - Prompt construction from criteria and candidates
//! - The HTTP call to the backend
//! - Lenient parsing of the structured answer
//! - Clamping scores and dropping references to unknown activities
//!
//! Any failure surfaces as a `ScoringError`, so the caller can fall back to
//! the rule engine.

use pipeline::ScoringError;
use thiserror::Error;

pub mod backend;
pub mod prompt;
pub mod response;
pub mod scorer;

pub use backend::{
    LlmConfig, OpenAiChatBackend, RankingBackend, RankingRequest, DEFAULT_BASE_URL, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
pub use prompt::{build_instruction, SYSTEM_PROMPT};
pub use response::{parse_matches, RankedMatch};
pub use scorer::LlmScorer;

/// Errors that can occur when talking to the ranking backend
#[derive(Error, Debug)]
pub enum LlmClientError {
    #[error("Failed to reach ranking backend: {0}")]
    ConnectionError(String),

    #[error("Ranking backend returned status {status}: {body}")]
    BackendError { status: u16, body: String },

    #[error("Invalid response from ranking backend: {0}")]
    InvalidResponse(String),
}

impl From<LlmClientError> for ScoringError {
    fn from(err: LlmClientError) -> Self {
        match err {
            LlmClientError::InvalidResponse(reason) => ScoringError::MalformedResponse(reason),
            other => ScoringError::Unavailable(other.to_string()),
        }
    }
}
