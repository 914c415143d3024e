/// Errors that can occur while merging records.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The conflict resolver could not produce a decision
    #[error("Conflict resolution failed: {0}")]
    Resolution(#[from] std::io::Error),
}
