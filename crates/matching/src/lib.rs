//! # Matching Crate
//!
//! The per-request vocabulary of the recommendation engine:
//!
//! - `MatchingCriteria`: what the scorers know about the user
//! - `ActivityMatchScore`: what the engine returns
//! - `build_matching_criteria`: turns a profile plus participation history
//!   into criteria
//!
//! ## Example Usage
//!
//! ```ignore
//! use matching::build_matching_criteria;
//!
//! let profile = store.fetch_profile(user_id).await?.unwrap_or_default();
//! let participations = store.fetch_participations(user_id).await?;
//! let criteria = build_matching_criteria(&profile, &participations);
//! ```

pub mod criteria;
pub mod types;

pub use criteria::{build_matching_criteria, prior_activity_ids};
pub use types::{
    clamp_score, ActivityMatchScore, MatchingCriteria, ScoreOrigin, GENERIC_REASON, MAX_SCORE,
    MIN_SCORE,
};
