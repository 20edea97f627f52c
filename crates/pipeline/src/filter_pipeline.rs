//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::Filter;
use anyhow::Result;
use catalog::Activity;
use matching::MatchingCriteria;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyParticipatedFilter);
///
/// let candidates = pipeline.apply(activities, &criteria)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Number of filters in the pipeline
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// # Returns
    /// * `Ok(Vec<Activity>)` - The candidates left after every filter
    /// * `Err` - If any filter fails
    pub fn apply(
        &self,
        candidates: Vec<Activity>,
        criteria: &MatchingCriteria,
    ) -> Result<Vec<Activity>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, criteria)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::AlreadyParticipatedFilter;
    use catalog::ActivityCategory;

    fn activity(id: u32) -> Activity {
        Activity::new(
            id,
            format!("Activity {id}"),
            "description",
            ActivityCategory::OngVolunteering,
        )
    }

    /// Drops every activity without a location
    struct RequiresLocation;

    impl Filter for RequiresLocation {
        fn name(&self) -> &str {
            "RequiresLocation"
        }

        fn apply(
            &self,
            candidates: Vec<Activity>,
            _criteria: &MatchingCriteria,
        ) -> Result<Vec<Activity>> {
            Ok(candidates.into_iter().filter(|a| a.location.is_some()).collect())
        }
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let criteria = MatchingCriteria::new(1);

        let filtered = pipeline.apply(vec![activity(1), activity(2)], &criteria).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_single_filter() {
        let mut criteria = MatchingCriteria::new(1);
        criteria.prior_activity_ids.insert(1);

        let pipeline = FilterPipeline::new().add_filter(AlreadyParticipatedFilter);

        let filtered = pipeline.apply(vec![activity(1), activity(2)], &criteria).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn test_filters_run_in_order() {
        let mut criteria = MatchingCriteria::new(1);
        criteria.prior_activity_ids.insert(2);

        let mut located = activity(2);
        located.location = Some("Lima".to_string());
        let mut also_located = activity(3);
        also_located.location = Some("Cusco".to_string());

        let pipeline = FilterPipeline::new()
            .add_filter(AlreadyParticipatedFilter)
            .add_filter(RequiresLocation);
        assert_eq!(pipeline.len(), 2);

        let filtered = pipeline
            .apply(vec![activity(1), located, also_located], &criteria)
            .unwrap();
        let ids: Vec<_> = filtered.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3]);
    }
}
