//! Core domain types for the volunteering catalog.
//!
//! Profiles, activities and participations are owned by the catalog and
//! handed out read-only to the matching engine. Field names follow the
//! camelCase JSON used by the data files and the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user profile
pub type UserId = u32;

/// Unique identifier for an activity
pub type ActivityId = u32;

/// Highest SDG (impact-goal) number
pub const MAX_SDG_GOAL: u8 = 17;

// =============================================================================
// Profile-related Types
// =============================================================================

/// Weekly availability declared by a volunteer during onboarding.
///
/// A profile without availability is treated as weekday-only with no
/// preferred time slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    pub weekdays: bool,
    pub weekends: bool,
    pub time_slots: Vec<String>,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            weekdays: true,
            weekends: false,
            time_slots: Vec::new(),
        }
    }
}

/// A volunteer profile.
///
/// Everything gathered during onboarding is optional: a freshly imported
/// user has only an id, an email and a name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub office: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub is_onboarded: bool,
    /// Strength test results, label -> score
    #[serde(default, alias = "gallupStrengths")]
    pub strengths: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub personality_type: Option<String>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
    #[serde(default)]
    pub availability: Option<Availability>,
}

// =============================================================================
// Activity-related Types
// =============================================================================

/// Kinds of activity offered on the platform.
///
/// Only `OngVolunteering` goes through AI matching; the other categories
/// are browsed without scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    OngVolunteering,
    Lab,
    MicroMission,
    Training,
}

impl ActivityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::OngVolunteering => "ong_volunteering",
            ActivityCategory::Lab => "lab",
            ActivityCategory::MicroMission => "micro_mission",
            ActivityCategory::Training => "training",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ong_volunteering" => Ok(ActivityCategory::OngVolunteering),
            "lab" => Ok(ActivityCategory::Lab),
            "micro_mission" => Ok(ActivityCategory::MicroMission),
            "training" => Ok(ActivityCategory::Training),
            _ => Err(CatalogError::InvalidValue {
                field: "category".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Publication state of an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Draft,
    Published,
    Completed,
    Cancelled,
}

/// A volunteering opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category: ActivityCategory,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(default)]
    pub organization_id: Option<u32>,
    /// SDG numbers (1-17) this activity contributes to
    #[serde(default)]
    pub sdg_goals: Option<Vec<u8>>,
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub max_participants: Option<u32>,
    /// Expected time commitment, in hours
    #[serde(default, rename = "duration")]
    pub duration_hours: Option<u32>,
    #[serde(default)]
    pub points_reward: u32,
}

impl Activity {
    /// Create a published activity with only the required fields set.
    pub fn new(
        id: ActivityId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: ActivityCategory,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            category,
            status: ActivityStatus::Published,
            organization_id: None,
            sdg_goals: None,
            required_skills: None,
            location: None,
            is_virtual: false,
            max_participants: None,
            duration_hours: None,
            points_reward: 0,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == ActivityStatus::Published
    }

    /// True when at least one SDG goal is attached
    pub fn has_sdg_goals(&self) -> bool {
        self.sdg_goals.as_ref().is_some_and(|goals| !goals.is_empty())
    }
}

// =============================================================================
// Participation Types
// =============================================================================

/// Lifecycle of a user's participation in an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    #[default]
    Registered,
    Confirmed,
    Completed,
    Cancelled,
}

/// A user's application to (or completion of) an activity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub id: u32,
    pub user_id: UserId,
    pub activity_id: ActivityId,
    #[serde(default)]
    pub status: ParticipationStatus,
    #[serde(default)]
    pub hours_logged: Option<f32>,
}

// =============================================================================
// Matching history
// =============================================================================

/// Per-user matching preferences and recommendation history.
///
/// The engine never reads this back; it is stored for callers that want to
/// keep a trail of what was recommended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingData {
    pub user_id: UserId,
    #[serde(default)]
    pub matching_score: BTreeMap<String, f64>,
    #[serde(default)]
    pub preferences: Value,
    #[serde(default)]
    pub recommendation_history: Vec<Value>,
    /// Unix timestamp of the last update
    pub updated_at: i64,
}

// =============================================================================
// CatalogIndex - The In-Memory Store
// =============================================================================

/// In-memory store holding profiles, activities and participations.
///
/// Lookups are O(1) through HashMap indices. Profiles, activities and
/// participations are immutable once loaded; only the matching-data table
/// is written at runtime and it sits behind a lock.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    // Primary data stores
    pub(crate) users: HashMap<UserId, Profile>,
    pub(crate) activities: HashMap<ActivityId, Activity>,

    /// All participations of each user, in insertion order
    pub(crate) user_participations: HashMap<UserId, Vec<Participation>>,

    /// Activities grouped by category, in insertion order
    pub(crate) category_index: HashMap<ActivityCategory, Vec<ActivityId>>,

    pub(crate) matching_data: std::sync::RwLock<HashMap<UserId, MatchingData>>,
}

impl CatalogIndex {
    /// Creates a new, empty CatalogIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a profile by ID
    pub fn get_user(&self, id: UserId) -> Option<&Profile> {
        self.users.get(&id)
    }

    /// Get an activity by ID
    pub fn get_activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.get(&id)
    }

    /// Get all participations of a user
    ///
    /// Returns an empty slice if the user never applied to anything
    pub fn get_user_participations(&self, user_id: UserId) -> &[Participation] {
        self.user_participations
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get the ids of all activities in a category, whatever their status
    pub fn get_activity_ids_by_category(&self, category: ActivityCategory) -> &[ActivityId] {
        self.category_index
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Published activities of a category, in insertion order
    pub fn published_activities(&self, category: ActivityCategory) -> Vec<Activity> {
        self.get_activity_ids_by_category(category)
            .iter()
            .filter_map(|id| self.activities.get(id))
            .filter(|activity| activity.category == category && activity.is_published())
            .cloned()
            .collect()
    }

    /// All user ids, sorted
    pub fn get_all_user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Insert a profile into the index
    pub fn insert_user(&mut self, user: Profile) {
        self.users.insert(user.id, user);
    }

    /// Insert an activity and update the category index
    pub fn insert_activity(&mut self, activity: Activity) {
        let ids = self.category_index.entry(activity.category).or_default();
        if !ids.contains(&activity.id) {
            ids.push(activity.id);
        }
        self.activities.insert(activity.id, activity);
    }

    /// Insert a participation
    pub fn insert_participation(&mut self, participation: Participation) {
        self.user_participations
            .entry(participation.user_id)
            .or_default()
            .push(participation);
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_participations = self.user_participations.values().map(|v| v.len()).sum();
        (self.users.len(), self.activities.len(), total_participations)
    }
}
