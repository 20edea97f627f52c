use thiserror::Error;

/// Errors a scorer can report instead of a result.
///
/// Both variants mean "no usable scores from this scorer"; the orchestrator
/// reacts to either by falling back to the rule engine.
#[derive(Error, Debug)]
pub enum ScoringError {
    /// The backend couldn't be reached or answered with an error status
    #[error("Scoring backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered, but not with parseable structured data
    #[error("Malformed scoring response: {0}")]
    MalformedResponse(String),
}
