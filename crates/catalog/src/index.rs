//! Loading and validating a CatalogIndex from a data directory.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::info;

impl CatalogIndex {
    /// Load users, activities and participations from a directory.
    ///
    /// Steps:
    /// 1. Parse all three files
    /// 2. Build the index
    /// 3. Validate data integrity
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading catalog from {:?}", data_dir);

        let users_path = data_dir.join("users.json");
        let activities_path = data_dir.join("activities.json");
        let participations_path = data_dir.join("participations.json");

        // Parse the three files in parallel
        let ((users, activities), participations) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_users(&users_path),
                    || parser::parse_activities(&activities_path),
                )
            },
            || parser::parse_participations(&participations_path),
        );

        let users = users?;
        let activities = activities?;
        let participations = participations?;

        info!(
            "Loaded {} users, {} activities, {} participations",
            users.len(),
            activities.len(),
            participations.len()
        );

        let mut index = CatalogIndex::new();
        for user in users {
            index.insert_user(user);
        }
        for activity in activities {
            index.insert_activity(activity);
        }
        for participation in participations {
            index.insert_participation(participation);
        }

        index.validate()?;

        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - All participation.user_id references exist in users
    /// - All participation.activity_id references exist in activities
    /// - SDG goals are in 1..=17
    pub fn validate(&self) -> Result<()> {
        for participations in self.user_participations.values() {
            for participation in participations {
                if !self.users.contains_key(&participation.user_id) {
                    return Err(CatalogError::MissingReference {
                        entity: "User".to_string(),
                        id: participation.user_id,
                    });
                }
                if !self.activities.contains_key(&participation.activity_id) {
                    return Err(CatalogError::MissingReference {
                        entity: "Activity".to_string(),
                        id: participation.activity_id,
                    });
                }
            }
        }

        for activity in self.activities.values() {
            let goals = activity.sdg_goals.as_deref().unwrap_or(&[]);
            if let Some(goal) = goals.iter().find(|g| **g == 0 || **g > MAX_SDG_GOAL) {
                return Err(CatalogError::InvalidValue {
                    field: format!("sdgGoals of activity {}", activity.id),
                    value: goal.to_string(),
                });
            }
        }
        Ok(())
    }
}
