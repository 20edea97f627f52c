//! Core traits for the candidate pipeline.
//!
//! - `Filter` removes candidates before scoring
//! - `ScoringRule` is one heuristic of the rule-based scorer
//! - `ActivityScorer` is the contract both scorers implement, so the
//!   orchestrator can chain them without knowing which one it holds

use anyhow::Result;
use async_trait::async_trait;
use catalog::Activity;
use matching::{ActivityMatchScore, MatchingCriteria};

use crate::error::ScoringError;

/// Core trait for filtering candidates.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across concurrent requests
/// - Filters take ownership of the Vec<Activity> and return a filtered Vec
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `criteria` - Matching criteria of the requesting user
    fn apply(
        &self,
        candidates: Vec<Activity>,
        criteria: &MatchingCriteria,
    ) -> Result<Vec<Activity>>;
}

/// Points and explanation contributed by a rule that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub points: i32,
    pub reason: &'static str,
}

/// One independent heuristic of the rule-based scorer.
///
/// Rules never see each other's output; the scorer adds up whatever fires.
pub trait ScoringRule: Send + Sync {
    fn name(&self) -> &str;

    /// `Some` when the rule applies to this activity
    fn evaluate(&self, activity: &Activity, criteria: &MatchingCriteria) -> Option<RuleMatch>;
}

/// Turns criteria and candidates into scored matches.
///
/// Implementations may fail (a remote backend can be down); the caller
/// decides what to fall back to.
#[async_trait]
pub trait ActivityScorer: Send + Sync {
    fn name(&self) -> &str;

    async fn score(
        &self,
        criteria: &MatchingCriteria,
        candidates: &[Activity],
    ) -> Result<Vec<ActivityMatchScore>, ScoringError>;
}
