//! Filter implementations for the candidate pipeline.
//!
//! This module contains the concrete filters that can be composed into a
//! FilterPipeline.

pub mod already_participated;

// Re-export for convenience
pub use already_participated::AlreadyParticipatedFilter;
