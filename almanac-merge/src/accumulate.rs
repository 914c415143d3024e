use std::collections::{BTreeMap, BTreeSet};

use almanac_core::text::title_key;
use almanac_core::{DateEntry, ReleaseRecord, split_genres, year_of};

#[derive(Debug, Default)]
struct Sighting {
    title: String,
    genre: BTreeSet<String>,
    style: String,
    platforms: BTreeSet<String>,
}

/// Collects scraped listing items before they are written out.
///
/// Items are keyed by date and lower-cased title. Seeing the same game again
/// on another platform's listing adds that platform and its genres, and
/// fills the summary if none was recorded yet.
#[derive(Debug, Default)]
pub struct ReleaseAccumulator {
    by_date: BTreeMap<String, BTreeMap<String, Sighting>>,
    order: BTreeMap<String, Vec<String>>,
}

impl ReleaseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one listing item. Items without a date or title are ignored.
    pub fn add_game(&mut self, date: &str, title: &str, genre: &str, summary: &str, platform: &str) {
        let date = date.trim();
        let title = title.trim();
        if date.is_empty() || title.is_empty() {
            return;
        }
        let key = title_key(title);
        let summary = summary.trim();

        let games = self.by_date.entry(date.to_string()).or_default();
        let sighting = games.entry(key.clone()).or_insert_with(|| {
            self.order.entry(date.to_string()).or_default().push(key);
            Sighting {
                title: title.to_string(),
                ..Sighting::default()
            }
        });

        sighting.platforms.insert(platform.to_string());
        if sighting.style.is_empty() && !summary.is_empty() {
            sighting.style = summary.to_string();
        }
        sighting.genre.extend(split_genres(genre));
    }

    pub fn len(&self) -> usize {
        self.by_date.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Group everything by year, dates ascending, games in first-seen order.
    /// Dates not starting with a year are dropped.
    pub fn into_years(self) -> BTreeMap<String, Vec<DateEntry>> {
        let Self { by_date, mut order } = self;
        let mut years: BTreeMap<String, Vec<DateEntry>> = BTreeMap::new();

        for (date, mut games) in by_date {
            let Some(year) = year_of(&date).map(str::to_string) else {
                continue;
            };
            let keys = order.remove(&date).unwrap_or_default();
            let records = keys
                .iter()
                .filter_map(|key| games.remove(key))
                .map(|s| {
                    ReleaseRecord::new(s.title)
                        .with_genre(s.genre)
                        .with_style(s.style)
                        .with_platforms(s.platforms)
                })
                .collect();
            years.entry(year).or_default().push(DateEntry {
                display_date: date.clone(),
                date,
                games: records,
            });
        }
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_sightings_are_unioned() {
        let mut acc = ReleaseAccumulator::new();
        acc.add_game("2026-03-15", "Game X", "动作/冒险", "", "PC");
        acc.add_game("2026-03-15", "game x ", "角色扮演", "A summary", "PS5");
        acc.add_game("2026-03-15", "Game X", "", "Another summary", "PS5");

        assert_eq!(acc.len(), 1);
        let years = acc.into_years();
        let game = &years["2026"][0].games[0];
        assert_eq!(game.title, "Game X");
        assert_eq!(game.platforms, vec!["PC", "PS5"]);
        assert_eq!(game.genre, vec!["冒险", "动作", "角色扮演"]);
        assert_eq!(game.style, "A summary");
    }

    #[test]
    fn groups_by_year_in_date_order() {
        let mut acc = ReleaseAccumulator::new();
        acc.add_game("2027-01-02", "B", "", "", "NS");
        acc.add_game("2026-12-01", "A", "", "", "NS");
        acc.add_game("2026-01-05", "C", "", "", "NS");
        acc.add_game("", "No date", "", "", "NS");
        acc.add_game("2026-01-05", "  ", "", "", "NS");

        let years = acc.into_years();
        let dates: Vec<_> = years["2026"].iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-01-05", "2026-12-01"]);
        assert_eq!(years["2027"][0].display_date, "2027-01-02");
        assert_eq!(years.len(), 2);
    }

    #[test]
    fn first_seen_order_within_a_date() {
        let mut acc = ReleaseAccumulator::new();
        acc.add_game("2026-05-01", "Zeta", "", "", "PC");
        acc.add_game("2026-05-01", "Alpha", "", "", "PC");
        let years = acc.into_years();
        let titles: Vec<_> = years["2026"][0].games.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Zeta", "Alpha"]);
    }
}
