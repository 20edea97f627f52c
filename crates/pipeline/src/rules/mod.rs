//! Scoring rules for the rule-based scorer.
//!
//! Each rule looks at one aspect of the fit between a user and an activity.
//! `RuleBasedScorer::default()` runs them in the order listed here.

pub mod duration;
pub mod interest_overlap;
pub mod modality;

// Re-export for convenience
pub use duration::ShortDurationRule;
pub use interest_overlap::InterestOverlapRule;
pub use modality::ModalityRule;
