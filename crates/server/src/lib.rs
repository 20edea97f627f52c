//! Server crate for the volunteer matching engine.
//!
//! This crate contains the orchestrator that coordinates profile lookup,
//! candidate filtering and the scorer fallback chain, plus the
//! configuration and HTTP routes of the `matching-server` binary.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod routes;

pub use config::{load_env_file, EngineConfig};
pub use error::RecommendationError;
pub use orchestrator::{RecommendationOrchestrator, DEFAULT_LIMIT};
pub use routes::{router, AppState};
