use thiserror::Error;

/// Errors produced while turning a raw date expression into a sort key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateKeyError {
    /// The expression matched none of the known date shapes
    #[error("Unrecognized date expression: '{0}'")]
    Unrecognized(String),

    /// The expression looked like a calendar date but does not exist
    #[error("Invalid calendar date: '{0}'")]
    InvalidDate(String),
}
