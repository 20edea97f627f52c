//! Rule rewarding activities whose description mentions one of the user's interests.

use crate::traits::{RuleMatch, ScoringRule};
use catalog::Activity;
use matching::MatchingCriteria;

pub const INTEREST_POINTS: i32 = 20;
pub const INTEREST_REASON: &str = "Matches your stated interests.";

/// Fires when an interest label appears in the activity description.
///
/// ## Algorithm
/// Only activities tagged with at least one SDG goal are considered. The
/// match is a case-insensitive substring test of each interest against
/// the description.
pub struct InterestOverlapRule {
    points: i32,
}

impl InterestOverlapRule {
    pub fn new(points: i32) -> Self {
        Self { points }
    }
}

impl Default for InterestOverlapRule {
    fn default() -> Self {
        Self::new(INTEREST_POINTS)
    }
}

impl ScoringRule for InterestOverlapRule {
    fn name(&self) -> &str {
        "InterestOverlapRule"
    }

    fn evaluate(&self, activity: &Activity, criteria: &MatchingCriteria) -> Option<RuleMatch> {
        if criteria.interests.is_empty() || !activity.has_sdg_goals() {
            return None;
        }

        let description = activity.description.to_lowercase();
        let matched = criteria
            .interests
            .iter()
            .any(|interest| description.contains(&interest.to_lowercase()));

        matched.then_some(RuleMatch {
            points: self.points,
            reason: INTEREST_REASON,
        })
    }
}
