//! Rule rewarding short time commitments.

use crate::traits::{RuleMatch, ScoringRule};
use catalog::Activity;
use matching::MatchingCriteria;

pub const SHORT_DURATION_MAX_HOURS: u32 = 3;
pub const SHORT_DURATION_POINTS: i32 = 10;
pub const SHORT_DURATION_REASON: &str = "Short time commitment.";

/// Fires for activities lasting at most `max_hours`.
///
/// An activity without a duration (or with a duration of zero, which the
/// catalog uses for "not set") never fires.
pub struct ShortDurationRule {
    max_hours: u32,
    points: i32,
}

impl ShortDurationRule {
    pub fn new(max_hours: u32, points: i32) -> Self {
        Self { max_hours, points }
    }
}

impl Default for ShortDurationRule {
    fn default() -> Self {
        Self::new(SHORT_DURATION_MAX_HOURS, SHORT_DURATION_POINTS)
    }
}

impl ScoringRule for ShortDurationRule {
    fn name(&self) -> &str {
        "ShortDurationRule"
    }

    fn evaluate(&self, activity: &Activity, _criteria: &MatchingCriteria) -> Option<RuleMatch> {
        match activity.duration_hours {
            Some(hours) if hours > 0 && hours <= self.max_hours => Some(RuleMatch {
                points: self.points,
                reason: SHORT_DURATION_REASON,
            }),
            _ => None,
        }
    }
}
