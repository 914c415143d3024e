use std::collections::{BTreeSet, HashMap};

use almanac_core::TranslationEntry;
use almanac_core::text::title_key;

/// Maps every known title spelling to all spellings of the same game.
///
/// Built once from the translation table and then only read. When two rows
/// share a spelling, the row loaded last owns it.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    aliases: HashMap<String, BTreeSet<String>>,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[TranslationEntry]) -> Self {
        let mut aliases = HashMap::new();
        for entry in entries {
            let spellings: BTreeSet<String> = entry.spellings().map(title_key).collect();
            for spelling in &spellings {
                aliases.insert(spelling.clone(), spellings.clone());
            }
        }
        Self { aliases }
    }

    /// Number of distinct spellings known to the index.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// All lower-cased spellings equivalent to `title`, itself included.
    pub fn resolve_aliases(&self, title: &str) -> BTreeSet<String> {
        let key = title_key(title);
        match self.aliases.get(&key) {
            Some(set) => set.clone(),
            None => BTreeSet::from([key]),
        }
    }

    /// Whether two titles name the same game.
    pub fn same_game(&self, a: &str, b: &str) -> bool {
        let a_key = title_key(a);
        let b_key = title_key(b);
        if a_key == b_key {
            return true;
        }
        self.aliases
            .get(&a_key)
            .is_some_and(|set| set.contains(&b_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AliasIndex {
        AliasIndex::from_entries(&[
            TranslationEntry::new("艾尔登法环", "Elden Ring", "エルデンリング"),
            TranslationEntry::new("空洞骑士：丝之歌", "Hollow Knight: Silksong", ""),
        ])
    }

    #[test]
    fn unknown_title_is_its_own_alias() {
        let index = sample();
        assert_eq!(
            index.resolve_aliases("Game X"),
            BTreeSet::from(["game x".to_string()])
        );
    }

    #[test]
    fn empty_spellings_are_not_indexed() {
        let index = sample();
        assert_eq!(index.len(), 5);
        assert!(!index.same_game("", "空洞骑士：丝之歌"));
    }

    #[test]
    fn case_is_ignored() {
        let index = sample();
        assert!(index.same_game("ELDEN RING", "艾尔登法环"));
        assert!(index.same_game("Game X", "game x"));
        assert!(!index.same_game("Elden Ring", "Hollow Knight: Silksong"));
    }

    #[test]
    fn last_row_wins_shared_spelling() {
        let index = AliasIndex::from_entries(&[
            TranslationEntry::new("旧译名", "Shared", ""),
            TranslationEntry::new("新译名", "Shared", ""),
        ]);
        assert!(index.same_game("Shared", "新译名"));
        assert!(!index.same_game("Shared", "旧译名"));
        // The first row's own Chinese spelling still points at its row.
        assert!(index.same_game("旧译名", "shared"));
    }
}
