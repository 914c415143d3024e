//! Record types as they appear in the persisted JSON files.
//!
//! Field names follow the website's data format, so a few of them are
//! camel-cased on the wire (`displayDate`).

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;

/// Genre tag carried by every showcase record.
pub const SHOWCASE_GENRE: &str = "showcase";

static GENRE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/、，,]\s*").expect("static pattern"));

/// One game's entry under a release date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub title: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl ReleaseRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            genre: Vec::new(),
            style: String::new(),
            platforms: Vec::new(),
        }
    }

    pub fn with_genre<I, S>(mut self, genre: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genre = genre.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    /// Lower-cased title used for identity comparisons.
    pub fn title_key(&self) -> String {
        crate::text::title_key(&self.title)
    }

    /// Sort and dedupe the set-valued fields for display.
    pub fn normalized(mut self) -> Self {
        self.genre = sorted_unique(self.genre);
        self.platforms = sorted_unique(self.platforms);
        self
    }
}

fn sorted_unique(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// All games released on one exact date or fuzzy date code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateEntry {
    /// Sort key (`YYYY-MM-DD`, `YYYY-Q1`, `YYYY-H2`, `YYYY-TBD`, ...).
    pub date: String,
    #[serde(rename = "displayDate", default)]
    pub display_date: String,
    #[serde(default)]
    pub games: Vec<ReleaseRecord>,
}

impl DateEntry {
    pub fn new(key: &DateKey, games: Vec<ReleaseRecord>) -> Self {
        Self {
            date: key.sort_key.clone(),
            display_date: key.display.clone(),
            games,
        }
    }

    /// Calendar year this entry belongs to, if the key starts with one.
    pub fn year(&self) -> Option<&str> {
        year_of(&self.date)
    }
}

/// One showcase / presentation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseRecord {
    pub title: String,
    #[serde(default)]
    pub title_en: String,
    /// `YYYY-MM-DD HH:mm`
    #[serde(rename = "displayDate", default)]
    pub display_date: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub style_en: String,
}

impl ShowcaseRecord {
    /// Calendar date part of the display date-time.
    pub fn calendar_date(&self) -> &str {
        calendar_part(&self.display_date)
    }
}

/// Showcases grouped under one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseDay {
    pub date: String,
    #[serde(default)]
    pub showcases: Vec<ShowcaseRecord>,
}

impl ShowcaseDay {
    pub fn calendar_date(&self) -> &str {
        calendar_part(&self.date)
    }
}

fn calendar_part(s: &str) -> &str {
    s.split(' ').next().unwrap_or(s)
}

/// Title spellings of one game in Chinese, English and Japanese.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    #[serde(default)]
    pub zh: String,
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub jp: String,
}

impl TranslationEntry {
    pub fn new(zh: impl Into<String>, en: impl Into<String>, jp: impl Into<String>) -> Self {
        Self {
            zh: zh.into(),
            en: en.into(),
            jp: jp.into(),
        }
    }

    /// All non-empty spellings, trimmed, in `zh`, `en`, `jp` order.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        [self.zh.as_str(), self.en.as_str(), self.jp.as_str()]
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Split a scraped genre string such as `"动作/冒险、角色扮演"` into tags.
pub fn split_genres(text: &str) -> Vec<String> {
    GENRE_SEPARATOR
        .split(text.trim())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading four-digit year of a date key or date-time string.
pub fn year_of(date: &str) -> Option<&str> {
    let year = date.get(..4)?;
    year.chars().all(|c| c.is_ascii_digit()).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_entry_uses_website_field_names() {
        let json = r#"{"date":"2026-03-15","displayDate":"2026-03-15","games":[{"title":"Game X","genre":["动作"],"style":"","platforms":["PC"]}]}"#;
        let entry: DateEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.display_date, "2026-03-15");
        assert_eq!(entry.games[0].platforms, vec!["PC"]);

        let back = serde_json::to_string(&entry).unwrap();
        assert!(back.contains("\"displayDate\""));
    }

    #[test]
    fn missing_optional_fields_default() {
        let entry: DateEntry = serde_json::from_str(r#"{"date":"2026-Q1"}"#).unwrap();
        assert!(entry.display_date.is_empty());
        assert!(entry.games.is_empty());
    }

    #[test]
    fn split_genres_handles_mixed_separators() {
        assert_eq!(
            split_genres("动作/冒险、角色扮演，射击, 策略"),
            vec!["动作", "冒险", "角色扮演", "射击", "策略"]
        );
        assert!(split_genres("  ").is_empty());
    }

    #[test]
    fn normalized_sorts_and_dedupes() {
        let record = ReleaseRecord::new("Game")
            .with_genre(["冒险", "动作", "冒险"])
            .with_platforms(["PS5", "PC", " PC "])
            .normalized();
        assert_eq!(record.genre, vec!["冒险", "动作"]);
        assert_eq!(record.platforms, vec!["PC", "PS5"]);
    }

    #[test]
    fn year_of_requires_digits() {
        assert_eq!(year_of("2026-Q1"), Some("2026"));
        assert_eq!(year_of("2026-03-15 20:00"), Some("2026"));
        assert_eq!(year_of("TBD"), None);
        assert_eq!(year_of("20"), None);
    }

    #[test]
    fn showcase_calendar_date_drops_time() {
        let record = ShowcaseRecord {
            title: "Direct".into(),
            title_en: "Direct".into(),
            display_date: "2026-02-20 22:00".into(),
            genre: vec![SHOWCASE_GENRE.into()],
            style: String::new(),
            style_en: String::new(),
        };
        assert_eq!(record.calendar_date(), "2026-02-20");
    }
}
