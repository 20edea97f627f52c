//! Candidate filtering and rule-based scoring for volunteering activities.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - ActivityScorer, the contract shared by the model-backed and
//!   rule-based scorers
//! - RuleBasedScorer, an ordered list of ScoringRules on top of a base score
//!
//! ## Architecture
//! The pipeline processes candidates in stages:
//! 1. Filters remove activities the user can't be recommended
//! 2. A scorer turns the remaining activities into scored matches
//! 3. The orchestrator ranks and truncates the matches
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, RuleBasedScorer};
//! use pipeline::filters::AlreadyParticipatedFilter;
//!
//! let pipeline = FilterPipeline::new().add_filter(AlreadyParticipatedFilter);
//! let candidates = pipeline.apply(activities, &criteria)?;
//!
//! let matches = RuleBasedScorer::default().score_all(&criteria, &candidates);
//! ```

pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod rule_scorer;
pub mod rules;
pub mod traits;

// Re-export main types
pub use error::ScoringError;
pub use filter_pipeline::FilterPipeline;
pub use rule_scorer::{RuleBasedScorer, BASE_SCORE};
pub use traits::{ActivityScorer, Filter, RuleMatch, ScoringRule};
