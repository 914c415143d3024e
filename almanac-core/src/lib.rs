//! Shared data model for the release almanac.
//!
//! Record types persisted in the per-year JSON files, the fuzzy date key
//! scheme used to order them, and the canonical platform labels.

pub mod date_key;
pub mod error;
pub mod platform;
pub mod records;
pub mod text;

pub use date_key::{DateKey, FuzzyCode, parse_date_key};
pub use error::DateKeyError;
pub use platform::{Platform, PlatformParseError, normalize_platform};
pub use records::{
    DateEntry, ReleaseRecord, SHOWCASE_GENRE, ShowcaseDay, ShowcaseRecord, TranslationEntry,
    split_genres, year_of,
};
