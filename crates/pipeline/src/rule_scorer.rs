//! Deterministic, in-process scorer used when the model backend can't answer.
//!
//! Every activity starts at a base score and collects points from each rule
//! that fires. No I/O happens here, so this scorer always produces a result.

use async_trait::async_trait;
use catalog::Activity;
use matching::{ActivityMatchScore, MatchingCriteria, ScoreOrigin, GENERIC_REASON};
use tracing::debug;

use crate::error::ScoringError;
use crate::rules::{InterestOverlapRule, ModalityRule, ShortDurationRule};
use crate::traits::{ActivityScorer, ScoringRule};

/// Score every activity starts from
pub const BASE_SCORE: i32 = 50;

/// Ordered list of scoring rules applied on top of a base score.
///
/// ## Usage
/// ```ignore
/// let scorer = RuleBasedScorer::new(BASE_SCORE)
///     .add_rule(InterestOverlapRule::default())
///     .add_rule(ModalityRule::default());
///
/// let matches = scorer.score_all(&criteria, &candidates);
/// ```
pub struct RuleBasedScorer {
    base_score: i32,
    rules: Vec<Box<dyn ScoringRule>>,
}

impl RuleBasedScorer {
    /// Create a scorer with no rules
    pub fn new(base_score: i32) -> Self {
        Self {
            base_score,
            rules: Vec::new(),
        }
    }

    /// Add a rule (builder pattern). Rules run in insertion order, which
    /// is also the order of the reasons they produce.
    pub fn add_rule(mut self, rule: impl ScoringRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Score a single activity
    pub fn score_activity(
        &self,
        activity: &Activity,
        criteria: &MatchingCriteria,
    ) -> ActivityMatchScore {
        let mut score = self.base_score;
        let mut reasons = Vec::new();

        for rule in &self.rules {
            if let Some(hit) = rule.evaluate(activity, criteria) {
                debug!(
                    "Rule {} fired for activity {}: +{}",
                    rule.name(),
                    activity.id,
                    hit.points
                );
                score += hit.points;
                reasons.push(hit.reason.to_string());
            }
        }

        if reasons.is_empty() {
            reasons.push(GENERIC_REASON.to_string());
        }

        ActivityMatchScore::new(activity.clone(), score as f64, reasons, ScoreOrigin::Rules)
    }

    /// Score every candidate, one result per candidate, in candidate order
    pub fn score_all(
        &self,
        criteria: &MatchingCriteria,
        candidates: &[Activity],
    ) -> Vec<ActivityMatchScore> {
        candidates
            .iter()
            .map(|activity| self.score_activity(activity, criteria))
            .collect()
    }
}

impl Default for RuleBasedScorer {
    /// Base score 50 with the interest, modality and duration rules
    fn default() -> Self {
        Self::new(BASE_SCORE)
            .add_rule(InterestOverlapRule::default())
            .add_rule(ModalityRule::default())
            .add_rule(ShortDurationRule::default())
    }
}

#[async_trait]
impl ActivityScorer for RuleBasedScorer {
    fn name(&self) -> &str {
        "RuleBasedScorer"
    }

    async fn score(
        &self,
        criteria: &MatchingCriteria,
        candidates: &[Activity],
    ) -> Result<Vec<ActivityMatchScore>, ScoringError> {
        Ok(self.score_all(criteria, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{duration, interest_overlap, modality};
    use crate::traits::RuleMatch;
    use catalog::ActivityCategory;

    fn scenario_a() -> (MatchingCriteria, Activity) {
        let mut criteria = MatchingCriteria::new(1);
        criteria.interests = vec!["Educación".to_string()];
        criteria.availability.weekdays = true;
        criteria.office = "Lima".to_string();

        let mut activity = Activity::new(
            1,
            "Clases virtuales",
            "Refuerzo escolar en educación primaria",
            ActivityCategory::OngVolunteering,
        );
        activity.is_virtual = true;
        activity.sdg_goals = Some(vec![4]);
        activity.duration_hours = Some(2);

        (criteria, activity)
    }

    fn scenario_b() -> (MatchingCriteria, Activity) {
        let mut criteria = MatchingCriteria::new(2);
        criteria.office = "Lima".to_string();

        let mut activity = Activity::new(
            2,
            "Construcción de viviendas",
            "Jornada de construcción",
            ActivityCategory::OngVolunteering,
        );
        activity.location = Some("Cusco".to_string());
        activity.duration_hours = Some(5);

        (criteria, activity)
    }

    #[test]
    fn test_every_rule_fires() {
        let (criteria, activity) = scenario_a();
        let result = RuleBasedScorer::default().score_activity(&activity, &criteria);

        assert_eq!(result.score, 95);
        assert_eq!(
            result.reasons,
            vec![
                interest_overlap::INTEREST_REASON.to_string(),
                modality::VIRTUAL_REASON.to_string(),
                duration::SHORT_DURATION_REASON.to_string(),
            ]
        );
        assert_eq!(result.activity_id, 1);
        assert_eq!(result.scored_by, ScoreOrigin::Rules);
    }

    #[test]
    fn test_no_rule_fires_gets_generic_reason() {
        let (criteria, activity) = scenario_b();
        let result = RuleBasedScorer::default().score_activity(&activity, &criteria);

        assert_eq!(result.score, 50);
        assert_eq!(result.reasons, vec![GENERIC_REASON.to_string()]);
    }

    #[test]
    fn test_location_and_duration() {
        let mut criteria = MatchingCriteria::new(3);
        criteria.office = "Arequipa".to_string();

        let mut activity =
            Activity::new(3, "Feria", "Feria de salud", ActivityCategory::OngVolunteering);
        activity.location = Some("Arequipa centro".to_string());
        activity.duration_hours = Some(3);

        let result = RuleBasedScorer::default().score_activity(&activity, &criteria);
        assert_eq!(result.score, 85);
        assert_eq!(
            result.reasons,
            vec![
                modality::NEAR_OFFICE_REASON.to_string(),
                duration::SHORT_DURATION_REASON.to_string(),
            ]
        );
    }

    #[test]
    fn test_one_result_per_candidate_in_order() {
        let (criteria, a) = scenario_a();
        let (_, b) = scenario_b();

        let results = RuleBasedScorer::default().score_all(&criteria, &[b.clone(), a.clone(), b]);
        let ids: Vec<_> = results.iter().map(|r| r.activity_id).collect();
        assert_eq!(ids, vec![2, 1, 2]);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let (criteria, a) = scenario_a();
        let (_, b) = scenario_b();
        let candidates = vec![a, b];
        let scorer = RuleBasedScorer::default();

        let first = scorer.score_all(&criteria, &candidates);
        let second = scorer.score_all(&criteria, &candidates);
        assert_eq!(first, second);
    }

    struct Penalty;

    impl ScoringRule for Penalty {
        fn name(&self) -> &str {
            "Penalty"
        }

        fn evaluate(
            &self,
            _activity: &Activity,
            _criteria: &MatchingCriteria,
        ) -> Option<RuleMatch> {
            Some(RuleMatch {
                points: -500,
                reason: "Penalized.",
            })
        }
    }

    struct Bonus;

    impl ScoringRule for Bonus {
        fn name(&self) -> &str {
            "Bonus"
        }

        fn evaluate(
            &self,
            _activity: &Activity,
            _criteria: &MatchingCriteria,
        ) -> Option<RuleMatch> {
            Some(RuleMatch {
                points: 500,
                reason: "Boosted.",
            })
        }
    }

    #[test]
    fn test_custom_rules_are_clamped() {
        let (criteria, activity) = scenario_b();

        let low = RuleBasedScorer::new(BASE_SCORE).add_rule(Penalty);
        assert_eq!(low.score_activity(&activity, &criteria).score, 1);

        let high = RuleBasedScorer::new(BASE_SCORE).add_rule(Bonus);
        let result = high.score_activity(&activity, &criteria);
        assert_eq!(result.score, 100);
        assert_eq!(result.reasons, vec!["Boosted.".to_string()]);
    }

    #[test]
    fn test_default_rule_order() {
        assert_eq!(
            RuleBasedScorer::default().rule_names(),
            vec!["InterestOverlapRule", "ModalityRule", "ShortDurationRule"]
        );
    }

    #[tokio::test]
    async fn test_scorer_trait_never_fails() {
        let (criteria, activity) = scenario_a();
        let scorer = RuleBasedScorer::default();

        let results = ActivityScorer::score(&scorer, &criteria, &[activity]).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 95);
    }
}
