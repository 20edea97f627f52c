use catalog::{CatalogError, UserId};
use thiserror::Error;

/// Errors inside a recommendation request.
///
/// `generate_recommendations` turns every one of these into an empty
/// result; `try_generate` and the preference operations return them.
#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("User {0} not found")]
    NotFound(UserId),

    #[error("Store error: {0}")]
    Store(#[from] CatalogError),

    #[error("Filtering failed: {0}")]
    Filter(#[from] anyhow::Error),
}
