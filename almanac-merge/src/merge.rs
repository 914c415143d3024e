//! Date-keyed merge of release entries.

use std::collections::HashMap;

use almanac_core::text::title_key;
use almanac_core::{DateEntry, ReleaseRecord};
use log::debug;

use crate::alias::AliasIndex;
use crate::conflict::{Conflict, ConflictPolicy, ConflictResolver};
use crate::error::MergeError;

/// Counters describing what a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Incoming dates that had no existing entry.
    pub dates_added: usize,
    /// Incoming dates merged into an existing entry.
    pub dates_merged: usize,
    pub games_added: usize,
    pub conflicts: usize,
    pub kept_incoming: usize,
    pub kept_existing: usize,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub entries: Vec<DateEntry>,
    pub stats: MergeStats,
}

/// Merge `incoming` into `existing` and return the date-sorted result.
///
/// Every incoming entry is merged game by game into the entry for its date.
/// Conflicting games (same title, or titles the alias index links) are
/// decided by `resolver` through a fresh [`ConflictPolicy`]. Existing
/// entries no incoming entry touches are carried through unchanged.
///
/// If `existing` already holds several entries for one date, they are folded
/// into the first of them before anything is merged (see [`fold_duplicates`]).
pub fn merge_entries(
    existing: Vec<DateEntry>,
    incoming: Vec<DateEntry>,
    aliases: &AliasIndex,
    resolver: &mut dyn ConflictResolver,
) -> Result<MergeOutcome, MergeError> {
    let mut entries = fold_duplicates(existing, aliases);
    let mut by_date: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        by_date.insert(entry.date.clone(), i);
    }

    let mut policy = ConflictPolicy::new();
    let mut stats = MergeStats::default();

    for entry in incoming {
        let idx = match by_date.get(&entry.date) {
            Some(&idx) => {
                stats.dates_merged += 1;
                idx
            }
            None => {
                stats.dates_added += 1;
                let idx = entries.len();
                by_date.insert(entry.date.clone(), idx);
                entries.push(DateEntry {
                    date: entry.date.clone(),
                    display_date: String::new(),
                    games: Vec::new(),
                });
                idx
            }
        };
        merge_into(
            &mut entries[idx],
            entry,
            aliases,
            &mut policy,
            resolver,
            &mut stats,
        )?;
    }

    entries.sort_by(|a, b| a.date.cmp(&b.date));
    debug!("merge finished: {:?}", stats);
    Ok(MergeOutcome { entries, stats })
}

/// Collapse entries sharing a date into the first one, in file order.
///
/// Games of a later duplicate that match a game already kept (by title or
/// alias) are dropped; the rest are appended. No resolver is consulted since
/// both sides come from the same file.
pub fn fold_duplicates(entries: Vec<DateEntry>, aliases: &AliasIndex) -> Vec<DateEntry> {
    let mut folded: Vec<DateEntry> = Vec::with_capacity(entries.len());
    let mut by_date: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some(&idx) = by_date.get(&entry.date) else {
            by_date.insert(entry.date.clone(), folded.len());
            folded.push(entry);
            continue;
        };
        let target = &mut folded[idx];
        debug!("folding duplicate entry for {}", target.date);
        if target.display_date.is_empty() {
            target.display_date = entry.display_date;
        }
        for game in entry.games {
            if find_match(&target.games, &game.title, aliases).is_some() {
                debug!("[{}] dropping duplicate '{}'", target.date, game.title);
            } else {
                target.games.push(game);
            }
        }
    }
    folded
}

fn merge_into(
    target: &mut DateEntry,
    incoming: DateEntry,
    aliases: &AliasIndex,
    policy: &mut ConflictPolicy,
    resolver: &mut dyn ConflictResolver,
    stats: &mut MergeStats,
) -> Result<(), MergeError> {
    if target.display_date.is_empty() {
        target.display_date = if incoming.display_date.is_empty() {
            incoming.date.clone()
        } else {
            incoming.display_date
        };
    }

    // Slots start as the existing games; new games are appended behind them
    // so later incoming games can match them too.
    let mut slots: Vec<ReleaseRecord> = std::mem::take(&mut target.games);
    let existing_len = slots.len();
    let mut touched = vec![false; existing_len];
    let mut order: Vec<usize> = Vec::new();

    for game in incoming.games {
        let Some((idx, by_alias)) = find_match(&slots, &game.title, aliases) else {
            order.push(slots.len());
            slots.push(game);
            stats.games_added += 1;
            continue;
        };

        stats.conflicts += 1;
        let conflict = Conflict {
            date: &target.date,
            existing: &slots[idx],
            incoming: &game,
            by_alias,
        };
        if policy.decide(&conflict, resolver)? {
            debug!("[{}] keeping incoming '{}'", target.date, game.title);
            stats.kept_incoming += 1;
            slots[idx] = game;
        } else {
            debug!("[{}] keeping existing '{}'", target.date, slots[idx].title);
            stats.kept_existing += 1;
        }

        if idx < existing_len && !touched[idx] {
            touched[idx] = true;
            order.push(idx);
        }
    }

    let mut taken: Vec<Option<ReleaseRecord>> = slots.into_iter().map(Some).collect();
    let mut games = Vec::with_capacity(taken.len());
    for idx in order {
        if let Some(game) = taken[idx].take() {
            games.push(game);
        }
    }
    for (idx, was_touched) in touched.iter().enumerate() {
        if !was_touched {
            if let Some(game) = taken[idx].take() {
                games.push(game);
            }
        }
    }
    target.games = games;
    Ok(())
}

/// First game matching `title`: exact lower-case match first, then an alias
/// match, each scanning in list order. The flag is set for alias matches.
fn find_match(games: &[ReleaseRecord], title: &str, aliases: &AliasIndex) -> Option<(usize, bool)> {
    let key = title_key(title);
    if let Some(idx) = games.iter().position(|g| g.title_key() == key) {
        return Some((idx, false));
    }
    games
        .iter()
        .position(|g| aliases.same_game(title, &g.title))
        .map(|idx| (idx, true))
}
