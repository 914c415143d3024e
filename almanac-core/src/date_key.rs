//! Sortable date keys for exact and vague release dates.
//!
//! Exact dates are stored as `YYYY-MM-DD`. Vague dates use a code after the
//! year whose alphabet was chosen so that plain string comparison gives the
//! intended order within a year:
//!
//! ```text
//! 2026-01-01 < 2026-12-31 < 2026-H1 < 2026-H2 < 2026-Q1 < ... < 2026-Q4 < 2026-TBD
//! ```
//!
//! Seasons map onto quarters (spring is `Q1`).

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::DateKeyError;

static EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\s*[-/.年]\s*(\d{1,2})\s*[-/.月]\s*(\d{1,2})\s*日?$").expect("static pattern")
});

static MONTH_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\s*[-/.年]\s*(\d{1,2})\s*月?$").expect("static pattern")
});

static YEAR_QUALIFIED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})\s*年?\s*[-/ ]?\s*(.*)$").expect("static pattern"));

/// Vague release timing within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FuzzyCode {
    H1,
    H2,
    Q1,
    Q2,
    Q3,
    Q4,
    Tbd,
}

impl FuzzyCode {
    /// Suffix used in the sort key.
    pub fn code(&self) -> &'static str {
        match self {
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
            Self::Tbd => "TBD",
        }
    }

    /// Label shown on the website after the year.
    pub fn label(&self) -> &'static str {
        match self {
            Self::H1 => "上半年",
            Self::H2 => "下半年",
            Self::Q1 => "春季",
            Self::Q2 => "夏季",
            Self::Q3 => "秋季",
            Self::Q4 => "冬季",
            Self::Tbd => "待定",
        }
    }

    fn quarter(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::Q1),
            2 => Some(Self::Q2),
            3 => Some(Self::Q3),
            4 => Some(Self::Q4),
            _ => None,
        }
    }
}

/// A parsed release date: the key it sorts by and how it is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateKey {
    pub sort_key: String,
    pub display: String,
}

impl DateKey {
    pub fn exact(date: NaiveDate) -> Self {
        let key = date.format("%Y-%m-%d").to_string();
        Self {
            sort_key: key.clone(),
            display: key,
        }
    }

    pub fn fuzzy(year: &str, code: FuzzyCode) -> Self {
        Self {
            sort_key: format!("{}-{}", year, code.code()),
            display: format!("{} {}", year, code.label()),
        }
    }

    pub fn year(&self) -> &str {
        &self.sort_key[..4]
    }

    pub fn is_exact(&self) -> bool {
        NaiveDate::parse_from_str(&self.sort_key, "%Y-%m-%d").is_ok()
    }
}

/// Parse a raw date expression into a [`DateKey`].
///
/// Accepts exact dates (`2026-03-15`, `2026/3/15`, `2026年3月15日`),
/// month-only dates (first of the month), and a year followed by a season,
/// quarter, half-year or "undetermined" qualifier (`2026-春季`, `2026 Q3`,
/// `2026年下半年`, `2026`, `2026年内`).
pub fn parse_date_key(raw: &str) -> Result<DateKey, DateKeyError> {
    let text = raw.trim();

    if let Some(caps) = EXACT.captures(text) {
        return calendar_date(text, &caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = MONTH_ONLY.captures(text) {
        return calendar_date(text, &caps[1], &caps[2], "1");
    }
    if let Some(caps) = YEAR_QUALIFIED.captures(text) {
        let year = &caps[1];
        let code = classify_qualifier(&caps[2])
            .ok_or_else(|| DateKeyError::Unrecognized(text.to_string()))?;
        return Ok(DateKey::fuzzy(year, code));
    }

    Err(DateKeyError::Unrecognized(text.to_string()))
}

fn calendar_date(text: &str, y: &str, m: &str, d: &str) -> Result<DateKey, DateKeyError> {
    let invalid = || DateKeyError::InvalidDate(text.to_string());
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    let day: u32 = d.parse().map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    Ok(DateKey::exact(date))
}

fn classify_qualifier(rest: &str) -> Option<FuzzyCode> {
    let q = rest.trim().to_lowercase();
    let q = q.trim_end_matches('内').trim_start_matches('第');

    match q {
        "" | "年" | "tbd" | "tba" | "待定" | "未定" | "年待定" => return Some(FuzzyCode::Tbd),
        "h1" | "上半年" => return Some(FuzzyCode::H1),
        "h2" | "下半年" => return Some(FuzzyCode::H2),
        _ => {}
    }

    if let Some(n) = q.strip_prefix('q') {
        return n.parse().ok().and_then(FuzzyCode::quarter);
    }
    if let Some(n) = q.strip_suffix("季度") {
        let n = n.trim_start_matches('第');
        return quarter_number(n).and_then(FuzzyCode::quarter);
    }

    let season = q.trim_end_matches('季').trim_end_matches('天');
    match season {
        "春" | "spring" => Some(FuzzyCode::Q1),
        "夏" | "summer" => Some(FuzzyCode::Q2),
        "秋" | "autumn" | "fall" => Some(FuzzyCode::Q3),
        "冬" | "winter" => Some(FuzzyCode::Q4),
        _ => None,
    }
}

fn quarter_number(s: &str) -> Option<u32> {
    match s {
        "一" | "1" => Some(1),
        "二" | "2" => Some(2),
        "三" | "3" => Some(3),
        "四" | "4" => Some(4),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/date_key_tests.rs"]
mod tests;
