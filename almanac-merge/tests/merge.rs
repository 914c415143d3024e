use almanac_core::{DateEntry, ReleaseRecord, TranslationEntry};
use almanac_merge::{
    AliasIndex, FixedResolver, MergeOutcome, Resolution, ScriptedResolver, merge_entries,
};

fn entry(date: &str, games: Vec<ReleaseRecord>) -> DateEntry {
    DateEntry {
        date: date.to_string(),
        display_date: date.to_string(),
        games,
    }
}

fn game(title: &str, platforms: &[&str]) -> ReleaseRecord {
    ReleaseRecord::new(title).with_platforms(platforms.iter().copied())
}

fn merge(
    existing: Vec<DateEntry>,
    incoming: Vec<DateEntry>,
    aliases: &AliasIndex,
    resolver: &mut ScriptedResolver,
) -> MergeOutcome {
    merge_entries(existing, incoming, aliases, resolver).unwrap()
}

fn sample_existing() -> Vec<DateEntry> {
    vec![
        entry("2026-01-20", vec![game("Alpha", &["PC"])]),
        entry("2026-03-15", vec![game("Game X", &["PC"]), game("Beta", &["NS"])]),
        entry("2026-Q2", vec![game("Gamma", &["PS5"])]),
        entry("2026-TBD", vec![game("Delta", &["PC"])]),
    ]
}

#[test]
fn merging_nothing_changes_nothing() {
    let existing = sample_existing();
    let mut resolver = ScriptedResolver::default();
    let out = merge(existing.clone(), vec![], &AliasIndex::new(), &mut resolver);
    assert_eq!(out.entries, existing);
    assert!(resolver.asked.is_empty());
}

#[test]
fn keep_incoming_replaces_conflicting_game() {
    let incoming = vec![entry("2026-03-15", vec![game("Game X", &["PS5"])])];
    let mut resolver = ScriptedResolver::new([Resolution::KeepIncoming]);
    let out = merge(sample_existing(), incoming, &AliasIndex::new(), &mut resolver);

    let at_date: Vec<_> = out
        .entries
        .iter()
        .filter(|e| e.date == "2026-03-15")
        .collect();
    assert_eq!(at_date.len(), 1);
    assert_eq!(out.entries.len(), 4);
    let games = &at_date[0].games;
    assert_eq!(games[0], game("Game X", &["PS5"]));
    assert_eq!(games[1].title, "Beta");
    assert_eq!(resolver.asked, vec![("Game X".to_string(), "Game X".to_string())]);
    assert_eq!(out.stats.conflicts, 1);
    assert_eq!(out.stats.kept_incoming, 1);
}

#[test]
fn keep_existing_leaves_record_untouched() {
    let incoming = vec![entry("2026-03-15", vec![game("game x", &["PS5"])])];
    let mut resolver = ScriptedResolver::new([Resolution::KeepExisting]);
    let out = merge(sample_existing(), incoming, &AliasIndex::new(), &mut resolver);
    assert_eq!(out.entries, sample_existing());
}

#[test]
fn new_date_is_inserted_in_sorted_position() {
    let existing = vec![
        entry("2026-03-15", vec![game("A", &["PC"])]),
        entry("2026-TBD", vec![game("B", &["PC"])]),
    ];
    let incoming = vec![
        entry("2027-01-01", vec![game("C", &["PC"])]),
        entry("2026-06-01", vec![game("D", &["PC"])]),
    ];
    let mut resolver = ScriptedResolver::default();
    let out = merge(existing, incoming, &AliasIndex::new(), &mut resolver);

    let dates: Vec<_> = out.entries.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2026-03-15", "2026-06-01", "2026-TBD", "2027-01-01"]);
    assert_eq!(out.stats.dates_added, 2);
    assert_eq!(out.stats.games_added, 2);
}

#[test]
fn output_is_sorted_even_for_unsorted_input() {
    let existing = vec![
        entry("2026-Q4", vec![]),
        entry("2026-02-01", vec![]),
        entry("2026-H1", vec![]),
    ];
    let incoming = vec![entry("2026-01-01", vec![]), entry("2026-TBD", vec![])];
    let mut resolver = ScriptedResolver::default();
    let out = merge(existing, incoming, &AliasIndex::new(), &mut resolver);
    assert!(out.entries.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn alias_match_is_a_conflict() {
    let aliases = AliasIndex::from_entries(&[TranslationEntry::new(
        "艾尔登法环",
        "Elden Ring",
        "エルデンリング",
    )]);
    let existing = vec![entry("2026-03-15", vec![game("艾尔登法环", &["PC"])])];
    let incoming = vec![entry("2026-03-15", vec![game("Elden Ring", &["PS5"])])];
    let mut resolver = ScriptedResolver::new([Resolution::KeepIncoming]);
    let out = merge(existing, incoming, &aliases, &mut resolver);

    assert_eq!(out.entries[0].games, vec![game("Elden Ring", &["PS5"])]);
    assert_eq!(
        resolver.asked,
        vec![("艾尔登法环".to_string(), "Elden Ring".to_string())]
    );
}

#[test]
fn no_same_game_duplicates_after_merge() {
    let aliases = AliasIndex::from_entries(&[
        TranslationEntry::new("艾尔登法环", "Elden Ring", "エルデンリング"),
        TranslationEntry::new("空洞骑士", "Hollow Knight", ""),
    ]);
    let existing = vec![entry(
        "2026-03-15",
        vec![game("艾尔登法环", &["PC"]), game("Other", &["NS"])],
    )];
    let incoming = vec![
        entry(
            "2026-03-15",
            vec![
                game("エルデンリング", &["PS5"]),
                game("Hollow Knight", &["NS"]),
                game("空洞骑士", &["PC"]),
                game("OTHER", &["PC"]),
            ],
        ),
        entry("2026-03-15", vec![game("Elden Ring", &["XSX"])]),
    ];
    let mut resolver = FixedResolver(Resolution::KeepIncoming);
    let out = merge_entries(existing, incoming, &aliases, &mut resolver).unwrap();

    assert_eq!(out.entries.len(), 1);
    let games = &out.entries[0].games;
    for (i, a) in games.iter().enumerate() {
        for b in &games[i + 1..] {
            assert!(
                !aliases.same_game(&a.title, &b.title),
                "'{}' and '{}' should not both survive",
                a.title,
                b.title
            );
        }
    }
    let titles: Vec<_> = games.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["Elden Ring", "空洞骑士", "OTHER"]);
}

#[test]
fn force_all_existing_skips_later_questions() {
    let existing = vec![
        entry("2026-01-01", vec![game("A", &["PC"])]),
        entry("2026-02-01", vec![game("B", &["PC"])]),
        entry("2026-03-01", vec![game("C", &["PC"])]),
    ];
    let incoming = vec![
        entry("2026-01-01", vec![game("A", &["NS"])]),
        entry("2026-02-01", vec![game("B", &["NS"])]),
        entry("2026-03-01", vec![game("C", &["NS"])]),
    ];
    let mut resolver =
        ScriptedResolver::new([Resolution::KeepIncoming, Resolution::KeepExistingForAll]);
    let out = merge(existing, incoming, &AliasIndex::new(), &mut resolver);

    assert_eq!(resolver.asked.len(), 2);
    let platforms: Vec<_> = out
        .entries
        .iter()
        .map(|e| e.games[0].platforms[0].as_str())
        .collect();
    assert_eq!(platforms, vec!["NS", "PC", "PC"]);
    assert_eq!(out.stats.kept_existing, 2);
}

#[test]
fn force_state_does_not_leak_into_next_merge() {
    let existing = vec![entry("2026-01-01", vec![game("A", &["PC"])])];
    let incoming = vec![entry("2026-01-01", vec![game("A", &["NS"])])];

    let mut first = ScriptedResolver::new([Resolution::KeepIncomingForAll]);
    merge(existing.clone(), incoming.clone(), &AliasIndex::new(), &mut first);

    let mut second = ScriptedResolver::new([Resolution::KeepExisting]);
    let out = merge(existing.clone(), incoming, &AliasIndex::new(), &mut second);
    assert_eq!(second.asked.len(), 1);
    assert_eq!(out.entries, existing);
}

#[test]
fn duplicate_existing_dates_collapse_into_one() {
    let existing = vec![
        entry("2026-05-01", vec![game("A", &["PC"])]),
        entry("2026-05-01", vec![game("B", &["PC"])]),
    ];
    let incoming = vec![entry("2026-05-01", vec![game("C", &["PC"])])];
    let mut resolver = ScriptedResolver::default();
    let out = merge(existing, incoming, &AliasIndex::new(), &mut resolver);

    assert_eq!(out.entries.len(), 1);
    let titles: Vec<_> = out.entries[0].games.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
    assert!(resolver.asked.is_empty());
}

#[test]
fn duplicate_existing_dates_collapse_without_incoming() {
    let aliases = AliasIndex::from_entries(&[TranslationEntry::new("艾尔登法环", "Elden Ring", "")]);
    let existing = vec![
        entry("2026-05-01", vec![game("Elden Ring", &["PC"])]),
        entry("2026-06-01", vec![game("Other", &["PC"])]),
        entry("2026-05-01", vec![game("艾尔登法环", &["NS"]), game("B", &["PC"])]),
    ];
    let mut resolver = ScriptedResolver::default();
    let out = merge(existing, vec![], &aliases, &mut resolver);

    let dates: Vec<_> = out.entries.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2026-05-01", "2026-06-01"]);
    let first = &out.entries[0];
    let titles: Vec<_> = first.games.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["Elden Ring", "B"]);
    assert_eq!(first.games[0].platforms, game("Elden Ring", &["PC"]).platforms);
}

#[test]
fn padded_titles_still_match() {
    let existing = vec![entry("2026-01-01", vec![game("Hades II", &["PC"])])];
    let incoming = vec![entry("2026-01-01", vec![game("  hades ii ", &["NS"])])];
    let mut resolver = ScriptedResolver::new([Resolution::KeepExisting]);
    let out = merge(existing.clone(), incoming, &AliasIndex::new(), &mut resolver);

    assert_eq!(resolver.asked.len(), 1);
    assert_eq!(out.entries, existing);
}

#[test]
fn resolver_failure_is_reported() {
    let existing = vec![entry("2026-01-01", vec![game("A", &["PC"])])];
    let incoming = vec![entry("2026-01-01", vec![game("A", &["NS"])])];
    let mut resolver = ScriptedResolver::default();
    let result = merge_entries(existing, incoming, &AliasIndex::new(), &mut resolver);
    assert!(result.is_err());
}
