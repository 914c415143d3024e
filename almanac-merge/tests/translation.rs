use almanac_core::{DateEntry, ReleaseRecord, TranslationEntry};
use almanac_merge::AliasIndex;
use almanac_merge::translation::{
    TitleCollector, autofill_latin, chinese_titles, extend_template, fill_translations,
    parse_trans_results, pending_rows, same_name_rows,
};

#[test]
fn every_spelling_of_a_row_names_the_same_game() {
    let rows = [
        TranslationEntry::new("艾尔登法环", "Elden Ring", "エルデンリング"),
        TranslationEntry::new("塞尔达传说", "The Legend of Zelda", "ゼルダの伝説"),
    ];
    let index = AliasIndex::from_entries(&rows);
    for row in &rows {
        let spellings: Vec<_> = row.spellings().collect();
        for a in &spellings {
            for b in &spellings {
                assert!(index.same_game(a, b), "{a} / {b}");
            }
        }
    }
}

#[test]
fn parse_results_skips_malformed_and_keeps_last() {
    let text = "艾尔登法环|-|Elden Ring|-|エルデンリング\n\nbroken line\n艾尔登法环|-|ELDEN RING|-|エルデンリング\n";
    let results = parse_trans_results(text);
    assert_eq!(results.len(), 1);
    assert_eq!(results.malformed, vec![3]);
    assert_eq!(results.by_zh["艾尔登法环"].0, "ELDEN RING");
}

#[test]
fn fill_asks_before_overwriting_existing_translation() {
    let mut table = vec![
        TranslationEntry::new("新游戏", "新游戏", "新游戏"),
        TranslationEntry::new("老游戏", "Old Game", "Old Game"),
        TranslationEntry::new("没结果", "", ""),
        TranslationEntry::new("已一致", "Same", "Same"),
    ];
    let results = parse_trans_results(
        "新游戏|-|New Game|-|新ゲーム\n老游戏|-|Old Game 2|-|Old Game 2\n已一致|-|Same|-|Same",
    );

    let mut asked = Vec::new();
    let stats = fill_translations(&mut table, &results, false, |row, _, _| {
        asked.push(row.zh.clone());
        Ok(false)
    })
    .unwrap();

    assert_eq!(asked, vec!["老游戏"]);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(table[0].en, "New Game");
    assert_eq!(table[0].jp, "新ゲーム");
    assert_eq!(table[1].en, "Old Game");
}

#[test]
fn forced_fill_never_asks() {
    let mut table = vec![TranslationEntry::new("老游戏", "Old Game", "Old Game")];
    let results = parse_trans_results("老游戏|-|Old Game 2|-|オールド");
    let stats = fill_translations(&mut table, &results, true, |_, _, _| {
        panic!("forced fill must not ask")
    })
    .unwrap();
    assert_eq!(stats.updated, 1);
    assert_eq!(table[0].jp, "オールド");
}

fn release(date: &str, titles: &[&str]) -> DateEntry {
    DateEntry {
        date: date.into(),
        display_date: date.into(),
        games: titles.iter().map(|t| ReleaseRecord::new(*t)).collect(),
    }
}

#[test]
fn template_keeps_rows_and_appends_new_titles() {
    let mut collector = TitleCollector::new();
    collector.add_entries(&[
        release("2026-01-01", &["Elden  Ring", "艾尔登法环"]),
        release("2026-02-01", &["Elden Ring", " 新作 "]),
    ]);
    assert_eq!(collector.len(), 3);

    let mut table = vec![TranslationEntry::new("艾尔登法环", "Elden Ring", "エルデンリング")];
    let added = extend_template(&mut table, collector.into_titles());
    assert_eq!(added, 2);
    let zh: Vec<_> = table.iter().map(|r| r.zh.as_str()).collect();
    assert_eq!(zh, vec!["艾尔登法环", "Elden Ring", "新作"]);
    assert_eq!(table[0].en, "Elden Ring");
    assert!(table[2].en.is_empty());
}

#[test]
fn autofill_copies_latin_titles() {
    let mut table = vec![
        TranslationEntry::new("Hades II", "", ""),
        TranslationEntry::new("黑神话：悟空", "", ""),
        TranslationEntry::new("Celeste", "Celeste", "セレステ"),
    ];
    assert_eq!(autofill_latin(&mut table), 1);
    assert_eq!(table[0].jp, "Hades II");
    let pending: Vec<_> = pending_rows(&table).map(|(n, r)| (n, r.zh.as_str())).collect();
    assert_eq!(pending, vec![(2, "黑神话：悟空")]);
}

#[test]
fn same_name_rows_need_cjk() {
    let table = vec![
        TranslationEntry::new("黑神话", "黑神话", "黑神话"),
        TranslationEntry::new("Hades", "Hades", "Hades"),
        TranslationEntry::new("悟空", "Wukong", ""),
    ];
    assert_eq!(same_name_rows(&table), vec!["黑神话"]);
}

#[test]
fn chinese_titles_by_month_range() {
    let entries = vec![
        release("2026-01-10", &["一月游戏", "January Game"]),
        release("2026-03-05", &["三月游戏"]),
        release("2026-Q3", &["秋季游戏"]),
    ];
    assert_eq!(
        chinese_titles(&entries, 1, 12),
        vec!["一月游戏", "三月游戏", "秋季游戏"]
    );
    assert_eq!(chinese_titles(&entries, 2, 6), vec!["三月游戏"]);
}
