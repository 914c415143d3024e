use almanac_core::{DateEntry, ReleaseRecord, TranslationEntry};
use almanac_lib::{
    Dataset, INDEX_FILE, ResultsWriter, list_source_files, load_completed, load_pending_titles,
    write_json_atomic,
};
use almanac_merge::{FixedResolver, Resolution, merge_entries};
use tempfile::TempDir;

fn entry(date: &str, title: &str, platform: &str) -> DateEntry {
    DateEntry {
        date: date.into(),
        display_date: date.into(),
        games: vec![ReleaseRecord::new(title).with_platforms([platform])],
    }
}

#[test]
fn save_then_merge_year_file() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::new(dir.path());

    let path = dataset
        .save_releases("2026", &[entry("2026-03-15", "Game X", "PC")])
        .unwrap();
    assert!(path.ends_with("game-release/2026.json"));

    let existing = dataset.load_releases("2026").unwrap();
    let incoming = vec![
        entry("2026-03-15", "Game X", "PS5"),
        entry("2026-01-01", "Early", "NS"),
    ];
    let aliases = dataset.load_alias_index().unwrap();
    let mut resolver = FixedResolver(Resolution::KeepIncoming);
    let merged = merge_entries(existing, incoming, &aliases, &mut resolver).unwrap();
    dataset.save_releases("2026", &merged.entries).unwrap();

    let reloaded = dataset.load_releases("2026").unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded[0].date, "2026-01-01");
    assert_eq!(reloaded[1].games[0].platforms, vec!["PS5"]);

    let index = std::fs::read_to_string(dataset.release_dir().join(INDEX_FILE)).unwrap();
    assert_eq!(index, "[\n  \"2026.json\"\n]\n");
}

#[test]
fn corrupt_year_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::new(dir.path());
    std::fs::create_dir_all(dataset.release_dir()).unwrap();
    std::fs::write(dataset.release_file("2025"), "{oops").unwrap();
    assert!(dataset.load_releases("2025").unwrap().is_empty());
}

#[test]
fn alias_index_from_translation_table() {
    let dir = TempDir::new().unwrap();
    let dataset = Dataset::new(dir.path());
    assert!(dataset.load_alias_index().unwrap().is_empty());

    write_json_atomic(
        &dataset.translation_path(),
        &[TranslationEntry::new("艾尔登法环", "Elden Ring", "")],
    )
    .unwrap();
    let aliases = dataset.load_alias_index().unwrap();
    assert!(aliases.same_game("elden ring", "艾尔登法环"));
}

#[test]
fn source_files_follow_index_or_directory() {
    let dir = TempDir::new().unwrap();
    let release = dir.path().join("game-release");
    std::fs::create_dir_all(&release).unwrap();
    for name in ["2026.json", "2025.json", "notes.txt"] {
        std::fs::write(release.join(name), "[]").unwrap();
    }

    let files = list_source_files(&release).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["2025.json", "2026.json"]);

    std::fs::write(release.join(INDEX_FILE), r#"["2026.json", 1]"#).unwrap();
    let files = list_source_files(&release).unwrap();
    assert_eq!(files, vec![release.join("2026.json")]);

    assert!(list_source_files(&dir.path().join("missing")).is_err());
}

#[test]
fn results_file_resumes_and_restarts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trans-result.txt");
    assert!(load_completed(&path).unwrap().is_empty());

    {
        let mut writer = ResultsWriter::open(&path, false).unwrap();
        writer.append("艾尔登法环", "Elden Ring", "エルデンリング").unwrap();
    }
    {
        let mut writer = ResultsWriter::open(&path, false).unwrap();
        writer.append("新作", "新作", "新作").unwrap();
    }
    std::fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, "半行|-|".as_bytes()))
        .unwrap();

    let done = load_completed(&path).unwrap();
    assert_eq!(done.len(), 2);
    assert!(done.contains("艾尔登法环"));
    assert!(!done.contains("半行"));

    ResultsWriter::open(&path, true).unwrap();
    assert!(load_completed(&path).unwrap().is_empty());
}

#[test]
fn append_after_torn_line_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trans-result.txt");
    std::fs::write(&path, "甲|-|A|-|A\n乙|-|B").unwrap();

    {
        let mut writer = ResultsWriter::open(&path, false).unwrap();
        writer.append("丙", "C", "C").unwrap();
    }
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "甲|-|A|-|A\n乙|-|B\n丙|-|C|-|C\n");

    let done = load_completed(&path).unwrap();
    assert!(done.contains("甲"));
    assert!(done.contains("丙"));
    assert!(!done.contains("乙"));

    // A clean tail gets no extra blank line.
    ResultsWriter::open(&path, false).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn pending_titles_skip_blank_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("un-trans-game.json");
    std::fs::write(&path, "艾尔登法环\n\n  新作  \n").unwrap();
    assert_eq!(load_pending_titles(&path).unwrap(), vec!["艾尔登法环", "新作"]);
}
