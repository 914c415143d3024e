use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;

use log::warn;

use crate::error::StoreError;
use crate::store::{LoadOutcome, load_json_array, write_json_atomic};

/// Name of the file listing a dataset directory's data files.
pub const INDEX_FILE: &str = "index.json";

/// Order year files (`2026.json`) numerically first, everything else after
/// them lexically.
pub fn compare_index_names(a: &str, b: &str) -> Ordering {
    match (year_file(a), year_file(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn year_file(name: &str) -> Option<u32> {
    let stem = name.strip_suffix(".json")?;
    if stem.len() == 4 && stem.bytes().all(|b| b.is_ascii_digit()) {
        stem.parse().ok()
    } else {
        None
    }
}

/// Read the string entries of a directory's index. Non-string entries are
/// dropped; a missing or corrupt index has no entries.
pub fn read_index(dir: &Path) -> Result<Vec<String>, StoreError> {
    let path = dir.join(INDEX_FILE);
    let values: Vec<serde_json::Value> = match load_json_array(&path)? {
        LoadOutcome::Loaded(values) => values,
        LoadOutcome::Missing => Vec::new(),
        LoadOutcome::Corrupt(reason) => {
            warn!("{} is not valid JSON ({}); rebuilding it", path.display(), reason);
            Vec::new()
        }
    };
    Ok(values
        .into_iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect())
}

/// Add `names` to the directory's index and rewrite it sorted and unique.
/// Returns the new index contents.
pub fn update_index<I, S>(dir: &Path, names: I) -> Result<Vec<String>, StoreError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut merged: BTreeSet<String> = read_index(dir)?.into_iter().collect();
    merged.extend(names.into_iter().map(Into::into));

    let mut entries: Vec<String> = merged.into_iter().collect();
    entries.sort_by(|a, b| compare_index_names(a, b));
    write_json_atomic(&dir.join(INDEX_FILE), &entries)?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn year_files_sort_before_other_names() {
        let mut names = vec!["notes.json", "2027.json", "2025.json", "archive.json", "20260.json"];
        names.sort_by(|a, b| compare_index_names(a, b));
        assert_eq!(
            names,
            vec!["2025.json", "2027.json", "20260.json", "archive.json", "notes.json"]
        );
    }

    #[test]
    fn update_unions_and_drops_non_strings() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(INDEX_FILE),
            r#"["2027.json", 5, null, "extra.json", "2025.json"]"#,
        )
        .unwrap();

        let entries = update_index(dir.path(), ["2026.json", "2025.json"]).unwrap();
        assert_eq!(entries, vec!["2025.json", "2026.json", "2027.json", "extra.json"]);

        let on_disk = std::fs::read_to_string(dir.path().join(INDEX_FILE)).unwrap();
        assert!(on_disk.ends_with("]\n"));
        assert_eq!(read_index(dir.path()).unwrap(), entries);
    }

    #[test]
    fn corrupt_index_is_rebuilt() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE), "not json").unwrap();
        let entries = update_index(dir.path(), ["2026.json"]).unwrap();
        assert_eq!(entries, vec!["2026.json"]);
    }
}
