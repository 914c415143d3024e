//! Reading and writing the JSON array files of the dataset.
//!
//! Reads are lenient: a missing or malformed file counts as an empty
//! collection, but [`LoadOutcome`] keeps the distinction so callers can warn
//! about corruption. Writes go to a temporary sibling first and are renamed
//! into place, so a crash never leaves a half-written file behind.

use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Result of reading a JSON array file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded(Vec<T>),
    /// The file does not exist yet.
    Missing,
    /// The file exists but is not a valid array of the expected records.
    Corrupt(String),
}

impl<T> LoadOutcome<T> {
    /// The loaded records, or an empty collection.
    pub fn into_records(self) -> Vec<T> {
        match self {
            Self::Loaded(records) => records,
            Self::Missing | Self::Corrupt(_) => Vec::new(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }
}

/// Read a JSON array of records.
///
/// Only a failed read of an existing file is an error.
pub fn load_json_array<T: DeserializeOwned>(path: &Path) -> Result<LoadOutcome<T>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LoadOutcome::Missing),
        Err(e) => return Err(StoreError::read(path, e)),
    };
    match serde_json::from_str::<Vec<T>>(&content) {
        Ok(records) => Ok(LoadOutcome::Loaded(records)),
        Err(e) => Ok(LoadOutcome::Corrupt(e.to_string())),
    }
}

/// Like [`load_json_array`], but logs a warning for a corrupt file and
/// returns its records (possibly none) directly.
pub fn load_or_empty<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let outcome = load_json_array(path)?;
    if let LoadOutcome::Corrupt(reason) = &outcome {
        warn!(
            "{} is not valid JSON ({}); treating it as empty",
            path.display(),
            reason
        );
    }
    Ok(outcome.into_records())
}

/// Serialize with 2-space indentation, literal non-ASCII text and a
/// trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Write `value` as pretty JSON, replacing `path` atomically.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let text = to_pretty_json(value).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    write_text_atomic(path, &text)
}

/// Write text to `path` through a temporary sibling and a rename.
pub fn write_text_atomic(path: &Path, text: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, text).map_err(|e| StoreError::write(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        StoreError::write(path, e)
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_core::TranslationEntry;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let outcome: LoadOutcome<TranslationEntry> =
            load_json_array(&dir.path().join("nope.json")).unwrap();
        assert_eq!(outcome, LoadOutcome::Missing);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"zh\": ").unwrap();

        let outcome: LoadOutcome<TranslationEntry> = load_json_array(&path).unwrap();
        assert!(outcome.is_corrupt());
        assert!(outcome.into_records().is_empty());
        assert!(load_or_empty::<TranslationEntry>(&path).unwrap().is_empty());
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object.json");
        std::fs::write(&path, "{\"zh\": \"x\"}").unwrap();
        let outcome: LoadOutcome<TranslationEntry> = load_json_array(&path).unwrap();
        assert!(outcome.is_corrupt());
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        let result = load_json_array::<TranslationEntry>(dir.path());
        assert!(matches!(result, Err(StoreError::Read { .. })));
    }

    #[test]
    fn atomic_write_formats_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("trans.json");
        let rows = vec![TranslationEntry::new("艾尔登法环", "Elden Ring", "")];

        write_json_atomic(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"zh\": \"艾尔登法环\",\n    \"en\": \"Elden Ring\",\n    \"jp\": \"\"\n  }\n]\n"
        );
        assert!(!dir.path().join("sub").join("trans.json.tmp").exists());

        let back: Vec<TranslationEntry> = load_or_empty(&path).unwrap();
        assert_eq!(back, rows);
    }
}
