use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing dataset files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file or its temporary sibling could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A directory expected to hold dataset files is missing
    #[error("Directory not found: {}", .0.display())]
    MissingDir(PathBuf),
}

impl StoreError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Errors loading the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A required value is set nowhere
    #[error("Missing {what}. Set ${env} or `{key}` in {}", .path.display())]
    Missing {
        what: &'static str,
        env: &'static str,
        key: &'static str,
        path: PathBuf,
    },
}

/// Errors running the build script or version-control commands.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Build script not found: {}", .0.display())]
    MissingScript(PathBuf),
}
