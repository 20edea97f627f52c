//! Types shared by every stage of the matching engine.

use catalog::{Activity, ActivityId, Availability, UserId};
use serde::Serialize;
use std::collections::HashSet;

/// Lowest score a match can carry
pub const MIN_SCORE: u8 = 1;

/// Highest score a match can carry
pub const MAX_SCORE: u8 = 100;

/// Reason attached to a match that has nothing more specific to say
pub const GENERIC_REASON: &str = "General volunteer opportunity.";

/// Clamp a raw score into [MIN_SCORE, MAX_SCORE], rounding to the nearest integer.
///
/// NaN maps to MIN_SCORE.
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u8
}

/// Per-request snapshot of a user's profile, used only for scoring.
///
/// Built fresh for every recommendation request and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingCriteria {
    pub user_id: UserId,
    /// Strength labels (the scores behind them are not used)
    pub strengths: Vec<String>,
    pub personality_type: String,
    pub interests: Vec<String>,
    pub availability: Availability,
    pub office: String,
    pub department: String,
    /// Activities the user already has a participation record for.
    /// Used for exclusion only.
    pub prior_activity_ids: HashSet<ActivityId>,
}

impl MatchingCriteria {
    /// Criteria with neutral defaults for every profile field
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            strengths: Vec::new(),
            personality_type: String::new(),
            interests: Vec::new(),
            availability: Availability::default(),
            office: String::new(),
            department: String::new(),
            prior_activity_ids: HashSet::new(),
        }
    }

    pub fn has_participated_in(&self, activity_id: ActivityId) -> bool {
        self.prior_activity_ids.contains(&activity_id)
    }
}

/// Which scorer produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrigin {
    /// Ranked by the language-model backend
    Model,
    /// Ranked by the in-process rule engine
    Rules,
}

/// A scored, explained recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMatchScore {
    pub activity_id: ActivityId,
    /// Always within [MIN_SCORE, MAX_SCORE]
    pub score: u8,
    pub reasons: Vec<String>,
    pub activity: Activity,
    pub scored_by: ScoreOrigin,
}

impl ActivityMatchScore {
    /// Build a match for `activity`, clamping `raw_score`
    pub fn new(
        activity: Activity,
        raw_score: f64,
        reasons: Vec<String>,
        scored_by: ScoreOrigin,
    ) -> Self {
        Self {
            activity_id: activity.id,
            score: clamp_score(raw_score),
            reasons,
            activity,
            scored_by,
        }
    }
}
