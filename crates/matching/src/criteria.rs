//! Build MatchingCriteria from a profile and its participation history.
//!
//! Gather everything the scorers need once, up front, so neither scorer
//! has to go back to the store.

use crate::types::MatchingCriteria;
use catalog::{ActivityId, Participation, Profile};
use std::collections::HashSet;
use tracing::debug;

/// Build the criteria for one recommendation request.
///
/// Missing optional profile fields fall back to neutral defaults; this
/// never fails.
pub fn build_matching_criteria(
    profile: &Profile,
    participations: &[Participation],
) -> MatchingCriteria {
    let mut criteria = MatchingCriteria::new(profile.id);

    if let Some(strengths) = &profile.strengths {
        criteria.strengths = strengths.keys().cloned().collect();
    }
    if let Some(personality) = &profile.personality_type {
        criteria.personality_type = personality.clone();
    }
    if let Some(interests) = &profile.interests {
        criteria.interests = interests.clone();
    }
    if let Some(availability) = &profile.availability {
        criteria.availability = availability.clone();
    }
    if let Some(office) = &profile.office {
        criteria.office = office.clone();
    }
    if let Some(department) = &profile.department {
        criteria.department = department.clone();
    }

    criteria.prior_activity_ids = prior_activity_ids(participations);

    debug!(
        "Built criteria for user {}: {} interests, {} strengths, {} prior activities",
        criteria.user_id,
        criteria.interests.len(),
        criteria.strengths.len(),
        criteria.prior_activity_ids.len()
    );

    criteria
}

/// Ids of every activity the user has a participation record for.
///
/// Status is ignored: a cancelled application still excludes the activity.
pub fn prior_activity_ids(participations: &[Participation]) -> HashSet<ActivityId> {
    participations.iter().map(|p| p.activity_id).collect()
}
