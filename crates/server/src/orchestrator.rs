//! # Recommendation Orchestrator
//!
//! This module coordinates the recommendation pipeline:
//! 1. Resolve the user profile
//! 2. Fetch published volunteering activities
//! 3. Exclude activities the user already participated in
//! 4. Build matching criteria
//! 5. Score with the model backend, falling back to the rule engine
//! 6. Rank and keep the top N
//!
//! `generate_recommendations` never fails: any error along the way is
//! logged and becomes an empty list.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use serde_json::Value;
use tracing::{error, info, warn};

use catalog::{
    unix_now, Activity, ActivityCatalog, ActivityCategory, CatalogError, CatalogIndex,
    MatchingData, MatchingDataStore, ProfileStore, UserId,
};
use llm_client::LlmScorer;
use matching::{build_matching_criteria, ActivityMatchScore, MatchingCriteria, GENERIC_REASON};
use pipeline::filters::AlreadyParticipatedFilter;
use pipeline::{ActivityScorer, FilterPipeline, RuleBasedScorer};

use crate::config::EngineConfig;
use crate::error::RecommendationError;

/// Recommendations returned per request unless configured otherwise
pub const DEFAULT_LIMIT: usize = 5;

/// The only category that goes through matching
const MATCHED_CATEGORY: ActivityCategory = ActivityCategory::OngVolunteering;

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    profiles: Arc<dyn ProfileStore>,
    catalog: Arc<dyn ActivityCatalog>,
    matching_data: Option<Arc<dyn MatchingDataStore>>,
    filter_pipeline: Arc<FilterPipeline>,
    primary: Option<Arc<dyn ActivityScorer>>,
    fallback: Arc<RuleBasedScorer>,
    limit: usize,
}

impl RecommendationOrchestrator {
    /// Orchestrator with the rule engine as its only scorer
    pub fn new(profiles: Arc<dyn ProfileStore>, catalog: Arc<dyn ActivityCatalog>) -> Self {
        Self {
            profiles,
            catalog,
            matching_data: None,
            filter_pipeline: Arc::new(FilterPipeline::new().add_filter(AlreadyParticipatedFilter)),
            primary: None,
            fallback: Arc::new(RuleBasedScorer::default()),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Orchestrator backed entirely by one in-memory index
    pub fn from_index(index: Arc<CatalogIndex>) -> Self {
        Self::new(index.clone(), index.clone()).with_matching_data_store(index)
    }

    /// Orchestrator over `index`, wired up as `config` describes
    pub fn from_config(index: Arc<CatalogIndex>, config: &EngineConfig) -> Self {
        let orchestrator = Self::from_index(index).with_limit(config.limit);
        match &config.llm {
            Some(llm) => {
                info!("Model scoring enabled ({} at {})", llm.model, llm.base_url);
                orchestrator.with_primary_scorer(Arc::new(LlmScorer::from_config(llm.clone())))
            }
            None => {
                info!("No API key configured, scoring with rules only");
                orchestrator
            }
        }
    }

    pub fn with_primary_scorer(mut self, scorer: Arc<dyn ActivityScorer>) -> Self {
        self.primary = Some(scorer);
        self
    }

    pub fn with_matching_data_store(mut self, store: Arc<dyn MatchingDataStore>) -> Self {
        self.matching_data = Some(store);
        self
    }

    /// Zero is treated as one
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn has_primary_scorer(&self) -> bool {
        self.primary.is_some()
    }

    /// Main entry point: ranked, explained matches for a user.
    ///
    /// # Returns
    /// At most `limit` matches sorted by score (highest first). Empty when
    /// the user is unknown, nothing is left to recommend, or anything fails.
    pub async fn generate_recommendations(&self, user_id: UserId) -> Vec<ActivityMatchScore> {
        match self.try_generate(user_id).await {
            Ok(recommendations) => recommendations,
            Err(RecommendationError::NotFound(id)) => {
                warn!("User {} not found, returning no recommendations", id);
                Vec::new()
            }
            Err(e) => {
                error!("Recommendations for user {} failed: {}", user_id, e);
                Vec::new()
            }
        }
    }

    /// Same pipeline as `generate_recommendations`, with errors surfaced
    pub async fn try_generate(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ActivityMatchScore>, RecommendationError> {
        let start_time = Instant::now();

        let profile = self
            .profiles
            .fetch_profile(user_id)
            .await?
            .ok_or(RecommendationError::NotFound(user_id))?;

        let activities = self.catalog.fetch_activities(MATCHED_CATEGORY).await?;
        if activities.is_empty() {
            info!("No published activities, nothing to recommend for user {}", user_id);
            return Ok(Vec::new());
        }

        let participations = self.profiles.fetch_participations(user_id).await?;
        let criteria = build_matching_criteria(&profile, &participations);
        info!("Built matching criteria for user {}", user_id);

        let candidates = self.apply_filters(activities, &criteria)?;
        if candidates.is_empty() {
            info!("User {} already participated in every activity", user_id);
            return Ok(Vec::new());
        }

        let scores = self.score_candidates(&criteria, &candidates).await;
        let recommendations = self.rank_and_select(scores);

        info!(
            "Selected top {} recommendations for user {} in {:.2?}",
            recommendations.len(),
            user_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Apply the filter pipeline to candidates
    fn apply_filters(
        &self,
        candidates: Vec<Activity>,
        criteria: &MatchingCriteria,
    ) -> Result<Vec<Activity>, RecommendationError> {
        let total = candidates.len();
        let filtered = self
            .filter_pipeline
            .apply(candidates, criteria)
            .context("Failed to apply filters")?;
        info!(
            "Filtering complete, {} of {} candidates remain",
            filtered.len(),
            total
        );
        Ok(filtered)
    }

    /// Score with the primary scorer if there is one, with the rule engine
    /// otherwise or when the primary fails.
    async fn score_candidates(
        &self,
        criteria: &MatchingCriteria,
        candidates: &[Activity],
    ) -> Vec<ActivityMatchScore> {
        if let Some(primary) = &self.primary {
            match primary.score(criteria, candidates).await {
                Ok(scores) => {
                    info!("{} scored {} candidates", primary.name(), scores.len());
                    return scores;
                }
                Err(e) => {
                    warn!(
                        "{} failed for user {}: {}. Falling back to rule scoring",
                        primary.name(),
                        criteria.user_id,
                        e
                    );
                }
            }
        }

        let scores = self.fallback.score_all(criteria, candidates);
        info!("Rule engine scored {} candidates", scores.len());
        scores
    }

    /// Sort by score (stable, highest first), keep the top `limit` and make
    /// sure every match carries at least one reason
    fn rank_and_select(&self, mut scores: Vec<ActivityMatchScore>) -> Vec<ActivityMatchScore> {
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(self.limit);

        for score in &mut scores {
            if score.reasons.is_empty() {
                score.reasons.push(GENERIC_REASON.to_string());
            }
        }
        scores
    }

    /// Store a user's matching preferences.
    ///
    /// `scores` (label -> number) and `history` (list) are lifted out of the
    /// update; the whole update is kept as the preferences. Store failures
    /// are returned to the caller.
    pub async fn update_user_preferences(
        &self,
        user_id: UserId,
        update: Value,
    ) -> Result<MatchingData, RecommendationError> {
        let store = self.matching_data.as_ref().ok_or_else(|| {
            RecommendationError::Store(CatalogError::Unavailable(
                "no matching data store configured".to_string(),
            ))
        })?;

        let matching_score: BTreeMap<String, f64> = update
            .get("scores")
            .and_then(Value::as_object)
            .map(|scores| {
                scores
                    .iter()
                    .filter_map(|(label, value)| value.as_f64().map(|n| (label.clone(), n)))
                    .collect()
            })
            .unwrap_or_default();
        let recommendation_history = update
            .get("history")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let data = MatchingData {
            user_id,
            matching_score,
            preferences: update,
            recommendation_history,
            updated_at: unix_now(),
        };

        store.save_matching_data(data.clone()).await.map_err(|e| {
            error!("Failed to save matching preferences for user {}: {}", user_id, e);
            RecommendationError::from(e)
        })?;
        info!("Saved matching preferences for user {}", user_id);
        Ok(data)
    }

    /// Published activities of any category, unscored
    pub async fn list_activities(
        &self,
        category: ActivityCategory,
    ) -> Result<Vec<Activity>, RecommendationError> {
        let activities = self.catalog.fetch_activities(category).await?;
        info!("Listing {} {} activities", activities.len(), category);
        Ok(activities)
    }
}
