//! # Catalog Crate
//!
//! Domain data for the volunteering platform and the store interfaces the
//! matching engine reads it through.
//!
//! ## Main Components
//!
//! - **types**: Profile, Activity, Participation, MatchingData, CatalogIndex
//! - **parser**: Parse the JSON data files into Rust structs
//! - **index**: Load and validate a CatalogIndex from a data directory
//! - **store**: `ProfileStore`, `ActivityCatalog` and `MatchingDataStore` traits
//! - **error**: Error types for loading and lookups
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{ActivityCatalog, ActivityCategory, CatalogIndex};
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_dir(Path::new("data"))?;
//! let ong = index.fetch_activities(ActivityCategory::OngVolunteering).await?;
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod store;
pub mod types;

pub use error::{CatalogError, Result};
pub use store::{unix_now, ActivityCatalog, MatchingDataStore, ProfileStore};
pub use types::{
    Activity, ActivityCategory, ActivityId, ActivityStatus, Availability, CatalogIndex,
    MatchingData, Participation, ParticipationStatus, Profile, UserId, MAX_SDG_GOAL,
};
