//! Store traits consumed by the matching engine.
//!
//! The engine only needs a handful of lookups, so each collaborator is a
//! narrow async trait. `CatalogIndex` implements all of them in memory; a
//! database-backed store would implement the same traits.

use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CatalogError, Result};
use crate::types::*;

/// Source of user profiles and participation history
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when the user doesn't exist
    async fn fetch_profile(&self, user_id: UserId) -> Result<Option<Profile>>;

    /// Every participation of the user, whatever its status
    async fn fetch_participations(&self, user_id: UserId) -> Result<Vec<Participation>>;
}

/// Source of candidate activities
#[async_trait]
pub trait ActivityCatalog: Send + Sync {
    /// Published activities of one category
    async fn fetch_activities(&self, category: ActivityCategory) -> Result<Vec<Activity>>;
}

/// Sink for per-user matching preferences
#[async_trait]
pub trait MatchingDataStore: Send + Sync {
    /// Insert or replace the record for `data.user_id`
    async fn save_matching_data(&self, data: MatchingData) -> Result<()>;

    async fn fetch_matching_data(&self, user_id: UserId) -> Result<Option<MatchingData>>;
}

/// Current time as a unix timestamp
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[async_trait]
impl ProfileStore for CatalogIndex {
    async fn fetch_profile(&self, user_id: UserId) -> Result<Option<Profile>> {
        Ok(self.get_user(user_id).cloned())
    }

    async fn fetch_participations(&self, user_id: UserId) -> Result<Vec<Participation>> {
        Ok(self.get_user_participations(user_id).to_vec())
    }
}

#[async_trait]
impl ActivityCatalog for CatalogIndex {
    async fn fetch_activities(&self, category: ActivityCategory) -> Result<Vec<Activity>> {
        Ok(self.published_activities(category))
    }
}

#[async_trait]
impl MatchingDataStore for CatalogIndex {
    async fn save_matching_data(&self, data: MatchingData) -> Result<()> {
        let mut table = self
            .matching_data
            .write()
            .map_err(|_| CatalogError::Unavailable("matching data lock poisoned".to_string()))?;
        table.insert(data.user_id, data);
        Ok(())
    }

    async fn fetch_matching_data(&self, user_id: UserId) -> Result<Option<MatchingData>> {
        let table = self
            .matching_data
            .read()
            .map_err(|_| CatalogError::Unavailable("matching data lock poisoned".to_string()))?;
        Ok(table.get(&user_id).cloned())
    }
}
