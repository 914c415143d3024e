use thiserror::Error;

use almanac_fetch::FetchError;
use almanac_lib::{PublishError, SettingsError, StoreError};
use almanac_merge::MergeError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad command-line input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
