//! Filter to remove activities the user already has a participation record for.
//!
//! This runs before either scorer sees the candidates, so neither the model
//! nor the rule engine can recommend something the user already applied to.

use crate::traits::Filter;
use anyhow::Result;
use catalog::Activity;
use matching::MatchingCriteria;

/// Removes candidates listed in `MatchingCriteria::prior_activity_ids`.
///
/// ## Algorithm
/// Uses the HashSet in the criteria for O(1) lookups. Candidate order is
/// preserved.
pub struct AlreadyParticipatedFilter;

impl Filter for AlreadyParticipatedFilter {
    fn name(&self) -> &str {
        "AlreadyParticipatedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Activity>,
        criteria: &MatchingCriteria,
    ) -> Result<Vec<Activity>> {
        let filtered: Vec<Activity> = candidates
            .into_iter()
            .filter(|activity| !criteria.has_participated_in(activity.id))
            .collect();
        Ok(filtered)
    }
}
