//! Model-backed `ActivityScorer`.

use async_trait::async_trait;
use catalog::{Activity, ActivityId};
use matching::{ActivityMatchScore, MatchingCriteria, ScoreOrigin};
use pipeline::{ActivityScorer, ScoringError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::backend::{LlmConfig, OpenAiChatBackend, RankingBackend, RankingRequest};
use crate::prompt::{build_instruction, SYSTEM_PROMPT};
use crate::response::parse_matches;

/// Scores candidates by asking a ranking backend.
///
/// Scores are clamped into [1, 100]. Entries referencing an activity that
/// was not among the candidates are dropped, as are repeats of an id
/// already seen. The result may therefore hold fewer entries than there
/// were candidates, or none at all.
#[derive(Clone)]
pub struct LlmScorer {
    backend: Arc<dyn RankingBackend>,
    temperature: f32,
}

impl LlmScorer {
    pub fn new(backend: Arc<dyn RankingBackend>, temperature: f32) -> Self {
        Self {
            backend,
            temperature,
        }
    }

    /// Scorer talking to a chat-completions backend
    pub fn from_config(config: LlmConfig) -> Self {
        let temperature = config.temperature;
        Self::new(Arc::new(OpenAiChatBackend::new(config)), temperature)
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

#[async_trait]
impl ActivityScorer for LlmScorer {
    fn name(&self) -> &str {
        "LlmScorer"
    }

    async fn score(
        &self,
        criteria: &MatchingCriteria,
        candidates: &[Activity],
    ) -> Result<Vec<ActivityMatchScore>, ScoringError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let request = RankingRequest {
            system: SYSTEM_PROMPT.to_string(),
            instruction: build_instruction(criteria, candidates),
            json_output: true,
            temperature: self.temperature,
        };

        let text = self.backend.generate(&request).await?;
        let ranked = parse_matches(&text)?;

        let by_id: HashMap<ActivityId, &Activity> = candidates.iter().map(|a| (a.id, a)).collect();
        let mut seen = HashSet::new();
        let mut scores = Vec::with_capacity(ranked.len());

        for entry in ranked {
            let Some(activity) = by_id.get(&entry.activity_id) else {
                warn!(
                    "Dropping ranking for unknown activity {} (user {})",
                    entry.activity_id, criteria.user_id
                );
                continue;
            };
            if !seen.insert(entry.activity_id) {
                debug!("Ignoring repeated ranking for activity {}", entry.activity_id);
                continue;
            }
            scores.push(ActivityMatchScore::new(
                (*activity).clone(),
                entry.score,
                entry.reasons,
                ScoreOrigin::Model,
            ));
        }

        info!(
            "{} ranked {} of {} candidates for user {} in {:?}",
            self.backend.name(),
            scores.len(),
            candidates.len(),
            criteria.user_id,
            start.elapsed()
        );

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LlmClientError;
    use catalog::ActivityCategory;
    use std::sync::Mutex;

    /// Returns a canned answer and records every request
    struct FakeBackend {
        answer: Result<String, u16>,
        requests: Mutex<Vec<RankingRequest>>,
    }

    impl FakeBackend {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                answer: Err(status),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl RankingBackend for FakeBackend {
        fn name(&self) -> &str {
            "FakeBackend"
        }

        async fn generate(&self, request: &RankingRequest) -> Result<String, LlmClientError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmClientError::BackendError {
                    status: *status,
                    body: "error".to_string(),
                }),
            }
        }
    }

    fn candidates() -> Vec<Activity> {
        vec![
            Activity::new(1, "Huerto", "Huerto comunitario", ActivityCategory::OngVolunteering),
            Activity::new(2, "Lectura", "Lectura en hospitales", ActivityCategory::OngVolunteering),
            Activity::new(3, "Playa", "Limpieza de playa", ActivityCategory::OngVolunteering),
        ]
    }

    #[tokio::test]
    async fn test_scores_are_clamped_and_attached() {
        let backend = FakeBackend::answering(
            r#"{"matches": [
                {"activityId": 1, "score": 150, "reasons": ["a"]},
                {"activityId": 2, "score": -4, "reasons": ["b"]},
                {"activityId": 3, "score": 67.6}
            ]}"#,
        );
        let scorer = LlmScorer::new(backend.clone(), 0.3);

        let scores = scorer.score(&MatchingCriteria::new(1), &candidates()).await.unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0].score, 100);
        assert_eq!(scores[1].score, 1);
        assert_eq!(scores[2].score, 68);
        assert!(scores[2].reasons.is_empty());
        for score in &scores {
            assert_eq!(score.activity.id, score.activity_id);
            assert_eq!(score.scored_by, ScoreOrigin::Model);
        }

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].json_output);
        assert_eq!(requests[0].system, SYSTEM_PROMPT);
        assert!(requests[0].instruction.contains("Activity ID: 3"));
    }

    #[tokio::test]
    async fn test_unknown_and_repeated_ids_are_dropped() {
        let backend = FakeBackend::answering(
            r#"{"matches": [
                {"activityId": 99, "score": 90, "reasons": ["ghost"]},
                {"activityId": 2, "score": 80, "reasons": ["first"]},
                {"activityId": 2, "score": 10, "reasons": ["second"]}
            ]}"#,
        );
        let scorer = LlmScorer::new(backend, 0.3);

        let scores = scorer.score(&MatchingCriteria::new(1), &candidates()).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].activity_id, 2);
        assert_eq!(scores[0].score, 80);
        assert_eq!(scores[0].reasons, vec!["first".to_string()]);
    }

    #[tokio::test]
    async fn test_soft_empty_answer() {
        let scorer = LlmScorer::new(FakeBackend::answering(r#"{"matches": []}"#), 0.3);
        let scores = scorer.score(&MatchingCriteria::new(1), &candidates()).await.unwrap();
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_answer_is_malformed() {
        let scorer = LlmScorer::new(FakeBackend::answering("Sorry, I can't help."), 0.3);
        let result = scorer.score(&MatchingCriteria::new(1), &candidates()).await;
        assert!(matches!(result, Err(ScoringError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_backend_failure_is_unavailable() {
        let scorer = LlmScorer::new(FakeBackend::failing(500), 0.3);
        let result = scorer.score(&MatchingCriteria::new(1), &candidates()).await;
        assert!(matches!(result, Err(ScoringError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_no_candidates_skips_backend() {
        let backend = FakeBackend::answering(r#"{"matches": []}"#);
        let scorer = LlmScorer::new(backend.clone(), 0.3);

        let scores = scorer.score(&MatchingCriteria::new(1), &[]).await.unwrap();
        assert!(scores.is_empty());
        assert!(backend.requests.lock().unwrap().is_empty());
    }
}
