//! Maintenance of the `{zh, en, jp}` translation table.
//!
//! Filling from a lookup results file matches rows by exact `zh` title only.
//! The alias index plays no part here.

use std::collections::{HashMap, HashSet};
use std::io;

use almanac_core::text::{contains_cjk, is_mostly_latin, normalize_title};
use almanac_core::{DateEntry, TranslationEntry};
use log::warn;

/// Field separator in the lookup results file.
pub const RESULT_SEPARATOR: &str = "|-|";

/// Render one lookup result as a results file line (without newline).
pub fn format_result_line(zh: &str, en: &str, jp: &str) -> String {
    format!("{zh}{RESULT_SEPARATOR}{en}{RESULT_SEPARATOR}{jp}")
}

/// Parsed lookup results, keyed by Chinese title.
#[derive(Debug, Default)]
pub struct TransResults {
    pub by_zh: HashMap<String, (String, String)>,
    /// 1-based line numbers that did not have exactly three fields.
    pub malformed: Vec<usize>,
}

impl TransResults {
    pub fn len(&self) -> usize {
        self.by_zh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zh.is_empty()
    }
}

/// Parse `zh|-|en|-|jp` lines. Blank lines are ignored, malformed ones are
/// reported and skipped, and a later line for the same title wins.
pub fn parse_trans_results(text: &str) -> TransResults {
    let mut results = TransResults::default();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(RESULT_SEPARATOR).collect();
        let [zh, en, jp] = parts.as_slice() else {
            let preview: String = line.chars().take(50).collect();
            warn!("line {} is malformed, skipping: {}", i + 1, preview);
            results.malformed.push(i + 1);
            continue;
        };
        results
            .by_zh
            .insert(zh.to_string(), (en.to_string(), jp.to_string()));
    }
    results
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    pub updated: usize,
    pub skipped: usize,
}

/// Copy lookup results into the table.
///
/// A row changes only when its `en` or `jp` differs from the result. A row
/// that already carries a translation (either field differs from `zh`) is
/// overwritten only when `force` is set or `confirm(row, new_en, new_jp)`
/// agrees.
pub fn fill_translations<F>(
    table: &mut [TranslationEntry],
    results: &TransResults,
    force: bool,
    mut confirm: F,
) -> io::Result<FillStats>
where
    F: FnMut(&TranslationEntry, &str, &str) -> io::Result<bool>,
{
    let mut stats = FillStats::default();
    for row in table.iter_mut() {
        let Some((new_en, new_jp)) = results.by_zh.get(&row.zh) else {
            continue;
        };
        if row.en == *new_en && row.jp == *new_jp {
            continue;
        }
        let translated = row.zh != row.en || row.zh != row.jp;
        if translated && !force && !confirm(row, new_en, new_jp)? {
            stats.skipped += 1;
            continue;
        }
        row.en = new_en.clone();
        row.jp = new_jp.clone();
        stats.updated += 1;
    }
    Ok(stats)
}

/// Unique, whitespace-collapsed game titles in first-seen order.
#[derive(Debug, Default)]
pub struct TitleCollector {
    seen: HashSet<String>,
    titles: Vec<String>,
}

impl TitleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entries(&mut self, entries: &[DateEntry]) {
        for game in entries.iter().flat_map(|e| &e.games) {
            let title = normalize_title(&game.title);
            if !title.is_empty() && self.seen.insert(title.clone()) {
                self.titles.push(title);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn into_titles(self) -> Vec<String> {
        self.titles
    }
}

/// Append `{zh: title, en: "", jp: ""}` rows for titles not yet in the table.
/// Returns how many rows were added.
pub fn extend_template(table: &mut Vec<TranslationEntry>, titles: Vec<String>) -> usize {
    let mut known: HashSet<String> = table.iter().map(|row| row.zh.clone()).collect();
    let before = table.len();
    for title in titles {
        if known.insert(title.clone()) {
            table.push(TranslationEntry::new(title, "", ""));
        }
    }
    table.len() - before
}

/// Rows without an English name whose Chinese title is already mostly Latin
/// get that title as both English and Japanese name.
pub fn autofill_latin(table: &mut [TranslationEntry]) -> usize {
    let mut filled = 0;
    for row in table.iter_mut() {
        if row.en.is_empty() && is_mostly_latin(&row.zh) {
            row.en = row.zh.clone();
            row.jp = row.zh.clone();
            filled += 1;
        }
    }
    filled
}

/// Rows still missing an English name, with their 1-based row numbers.
pub fn pending_rows(table: &[TranslationEntry]) -> impl Iterator<Item = (usize, &TranslationEntry)> {
    table
        .iter()
        .enumerate()
        .filter(|(_, row)| row.en.is_empty())
        .map(|(i, row)| (i + 1, row))
}

/// Rows whose English name just repeats a Chinese title, i.e. the lookup
/// found nothing better.
pub fn same_name_rows(table: &[TranslationEntry]) -> Vec<&str> {
    table
        .iter()
        .filter(|row| !row.en.is_empty() && row.en == row.zh && contains_cjk(&row.zh))
        .map(|row| row.en.as_str())
        .collect()
}

/// Titles containing Chinese characters, limited to a month range.
///
/// Only exact dates carry a month. Entries with a vague date are included
/// only when the range covers the whole year.
pub fn chinese_titles(entries: &[DateEntry], start_month: u32, end_month: u32) -> Vec<&str> {
    let whole_year = start_month <= 1 && end_month >= 12;
    entries
        .iter()
        .filter(|entry| match exact_month(&entry.date) {
            Some(month) => (start_month..=end_month).contains(&month),
            None => whole_year,
        })
        .flat_map(|entry| &entry.games)
        .map(|game| game.title.as_str())
        .filter(|title| contains_cjk(title))
        .collect()
}

fn exact_month(date: &str) -> Option<u32> {
    let mut parts = date.split('-');
    let _year = parts.next()?;
    let month = parts.next()?.parse().ok()?;
    parts.next()?.parse::<u32>().ok()?;
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_month_only_for_calendar_dates() {
        assert_eq!(exact_month("2026-03-15"), Some(3));
        assert_eq!(exact_month("2026-Q1"), None);
        assert_eq!(exact_month("2026-TBD"), None);
    }

    #[test]
    fn result_line_format() {
        assert_eq!(format_result_line("艾尔登法环", "Elden Ring", "エルデンリング"), "艾尔登法环|-|Elden Ring|-|エルデンリング");
    }
}
