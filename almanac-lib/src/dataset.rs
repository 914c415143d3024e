//! Layout of the dataset directory and typed access to its files.
//!
//! ```text
//! <root>/
//!   game-release/<year>.json   release entries, plus index.json
//!   showcase/<year>.json       showcase days, plus index.json
//!   game-trans.json            translation table
//!   trans-result.txt           title lookup results, one `zh|-|en|-|jp` per line
//!   un-trans-game.json         titles still to look up, one per line
//! ```

use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use almanac_core::{DateEntry, ShowcaseDay, TranslationEntry};
use almanac_merge::AliasIndex;
use almanac_merge::translation::{RESULT_SEPARATOR, format_result_line};
use log::debug;

use crate::error::StoreError;
use crate::index::{INDEX_FILE, read_index, update_index};
use crate::store::{load_or_empty, write_json_atomic};

pub const RELEASE_DIR: &str = "game-release";
pub const SHOWCASE_DIR: &str = "showcase";
pub const TRANSLATION_FILE: &str = "game-trans.json";
pub const RESULTS_FILE: &str = "trans-result.txt";
pub const PENDING_FILE: &str = "un-trans-game.json";

/// The dataset rooted at one directory.
#[derive(Debug, Clone)]
pub struct Dataset {
    root: PathBuf,
}

impl Dataset {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn release_dir(&self) -> PathBuf {
        self.root.join(RELEASE_DIR)
    }

    pub fn showcase_dir(&self) -> PathBuf {
        self.root.join(SHOWCASE_DIR)
    }

    pub fn translation_path(&self) -> PathBuf {
        self.root.join(TRANSLATION_FILE)
    }

    pub fn results_path(&self) -> PathBuf {
        self.root.join(RESULTS_FILE)
    }

    pub fn pending_path(&self) -> PathBuf {
        self.root.join(PENDING_FILE)
    }

    pub fn release_file(&self, year: &str) -> PathBuf {
        year_path(&self.release_dir(), year)
    }

    pub fn showcase_file(&self, year: &str) -> PathBuf {
        year_path(&self.showcase_dir(), year)
    }

    pub fn load_releases(&self, year: &str) -> Result<Vec<DateEntry>, StoreError> {
        load_or_empty(&self.release_file(year))
    }

    /// Rewrite one year's release file and register it in the index.
    pub fn save_releases(&self, year: &str, entries: &[DateEntry]) -> Result<PathBuf, StoreError> {
        save_year(&self.release_dir(), year, entries)
    }

    pub fn load_showcases(&self, year: &str) -> Result<Vec<ShowcaseDay>, StoreError> {
        load_or_empty(&self.showcase_file(year))
    }

    pub fn save_showcases(&self, year: &str, days: &[ShowcaseDay]) -> Result<PathBuf, StoreError> {
        save_year(&self.showcase_dir(), year, days)
    }

    pub fn load_translations(&self) -> Result<Vec<TranslationEntry>, StoreError> {
        load_or_empty(&self.translation_path())
    }

    /// Build the alias index from the translation table. A missing or
    /// corrupt table gives an empty index.
    pub fn load_alias_index(&self) -> Result<AliasIndex, StoreError> {
        let rows = self.load_translations()?;
        let index = AliasIndex::from_entries(&rows);
        debug!(
            "loaded {} title spellings from {}",
            index.len(),
            self.translation_path().display()
        );
        Ok(index)
    }
}

fn year_path(dir: &Path, year: &str) -> PathBuf {
    dir.join(format!("{year}.json"))
}

fn save_year<T: serde::Serialize>(dir: &Path, year: &str, records: &[T]) -> Result<PathBuf, StoreError> {
    let path = year_path(dir, year);
    write_json_atomic(&path, records)?;
    update_index(dir, [format!("{year}.json")])?;
    Ok(path)
}

/// Data files of a dataset directory: the ones its index lists, or every
/// `*.json` except the index, sorted by name.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::MissingDir(dir.to_path_buf()));
    }

    if dir.join(INDEX_FILE).is_file() {
        let listed: Vec<PathBuf> = read_index(dir)?
            .into_iter()
            .filter(|name| name.ends_with(".json"))
            .map(|name| dir.join(name))
            .collect();
        if !listed.is_empty() {
            return Ok(listed);
        }
    }

    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map_err(|e| StoreError::read(dir, e))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json") && name != INDEX_FILE)
        .collect();
    names.sort();
    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}

/// Titles already present in a lookup results file.
///
/// A missing file has none. Lines that do not split into exactly three fields
/// are ignored, so a half-written last line is simply looked up again.
pub fn load_completed(path: &Path) -> Result<HashSet<String>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(StoreError::read(path, e)),
    };
    Ok(content
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(RESULT_SEPARATOR).collect();
            (parts.len() == 3).then(|| parts[0].to_string())
        })
        .collect())
}

/// Appends lookup results one line at a time, flushing after each.
pub struct ResultsWriter {
    path: PathBuf,
    file: std::fs::File,
}

impl ResultsWriter {
    /// Open for appending, or truncate first when `restart` is set.
    ///
    /// A torn last line left by an interrupted run is terminated first so the
    /// next result starts on its own line.
    pub fn open(path: &Path, restart: bool) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(!restart)
            .write(true)
            .truncate(restart)
            .open(path)
            .map_err(|e| StoreError::write(path, e))?;
        let mut writer = Self {
            path: path.to_path_buf(),
            file,
        };
        if !restart && ends_mid_line(path).map_err(|e| StoreError::read(path, e))? {
            debug!("{}: terminating torn last line", path.display());
            writeln!(writer.file)
                .and_then(|_| writer.file.flush())
                .map_err(|e| StoreError::write(path, e))?;
        }
        Ok(writer)
    }

    pub fn append(&mut self, zh: &str, en: &str, jp: &str) -> Result<(), StoreError> {
        let line = format_result_line(zh, en, jp);
        writeln!(self.file, "{line}")
            .and_then(|_| self.file.flush())
            .map_err(|e| StoreError::write(&self.path, e))
    }
}

/// Whether a non-empty file lacks a trailing newline.
fn ends_mid_line(path: &Path) -> std::io::Result<bool> {
    let mut file = std::fs::File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Titles waiting for lookup: one per line, blank lines ignored.
pub fn load_pending_titles(path: &Path) -> Result<Vec<String>, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::read(path, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
