//! Rule rewarding activities the user can easily attend.

use crate::traits::{RuleMatch, ScoringRule};
use catalog::Activity;
use matching::MatchingCriteria;

pub const VIRTUAL_POINTS: i32 = 15;
pub const VIRTUAL_REASON: &str = "Virtual format fits your schedule.";
pub const NEAR_OFFICE_POINTS: i32 = 25;
pub const NEAR_OFFICE_REASON: &str = "Located near your office.";

/// Scores the format/location fit of an activity.
///
/// ## Algorithm
/// 1. Virtual activity and the user is available on weekdays: virtual bonus
/// 2. Otherwise, the activity location contains the user's office: location bonus
///
/// The branches are exclusive. A virtual activity held at the user's office
/// only gets the virtual bonus, and only when the user is available on
/// weekdays. An empty office is contained in every location, so a user
/// without an office gets the location bonus for any located activity.
pub struct ModalityRule {
    virtual_points: i32,
    near_office_points: i32,
}

impl ModalityRule {
    pub fn new(virtual_points: i32, near_office_points: i32) -> Self {
        Self {
            virtual_points,
            near_office_points,
        }
    }
}

impl Default for ModalityRule {
    fn default() -> Self {
        Self::new(VIRTUAL_POINTS, NEAR_OFFICE_POINTS)
    }
}

impl ScoringRule for ModalityRule {
    fn name(&self) -> &str {
        "ModalityRule"
    }

    fn evaluate(&self, activity: &Activity, criteria: &MatchingCriteria) -> Option<RuleMatch> {
        if activity.is_virtual && criteria.availability.weekdays {
            return Some(RuleMatch {
                points: self.virtual_points,
                reason: VIRTUAL_REASON,
            });
        }

        let location = activity.location.as_deref().unwrap_or("");
        if !location.is_empty() && location.contains(&criteria.office) {
            return Some(RuleMatch {
                points: self.near_office_points,
                reason: NEAR_OFFICE_REASON,
            });
        }

        None
    }
}
