//! `almanac trans`: translation table maintenance.

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use almanac_core::{DateEntry, TranslationEntry};
use almanac_lib::store::load_or_empty;
use almanac_lib::{list_source_files, write_json_atomic};
use almanac_merge::translation::{
    TitleCollector, autofill_latin, chinese_titles, extend_template, fill_translations,
    parse_trans_results, pending_rows, same_name_rows,
};

use crate::prompt::confirm_stdio;
use crate::{AppContext, CliError};

/// How many rows still needing manual work `autofill` lists.
const PENDING_PREVIEW: usize = 20;

fn table_path(ctx: &AppContext, table: Option<PathBuf>) -> PathBuf {
    table.unwrap_or_else(|| ctx.dataset().translation_path())
}

pub(crate) fn run_fill(
    ctx: &AppContext,
    input: Option<PathBuf>,
    table: Option<PathBuf>,
    output: Option<PathBuf>,
    dry_run: bool,
    force: bool,
) -> Result<(), CliError> {
    let input = input.unwrap_or_else(|| ctx.dataset().results_path());
    let table_path = table_path(ctx, table);
    let output = output.unwrap_or_else(|| table_path.clone());

    let text = std::fs::read_to_string(&input)
        .map_err(|e| almanac_lib::StoreError::read(&input, e))?;
    let results = parse_trans_results(&text);
    log::info!("{} results read from {}", results.len(), input.display());

    let mut rows: Vec<TranslationEntry> = load_or_empty(&table_path)?;
    let stats = fill_translations(&mut rows, &results, force, |row, en, jp| {
        log::info!("{} already translated", row.zh.if_supports_color(Stdout, |t| t.bold()));
        log::info!("  current: {} / {}", row.en, row.jp);
        log::info!("  new:     {} / {}", en, jp);
        confirm_stdio("Overwrite?")
    })?;

    log::info!("{} rows updated, {} skipped", stats.updated, stats.skipped);
    if dry_run {
        log::info!("(dry run, nothing written)");
        return Ok(());
    }
    if stats.updated > 0 {
        write_json_atomic(&output, &rows)?;
        log::info!("Saved {}", output.display());
    }
    Ok(())
}

pub(crate) fn run_extract(
    ctx: &AppContext,
    input_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let input_dir = input_dir.unwrap_or_else(|| ctx.dataset().release_dir());
    let output = table_path(ctx, output);

    let mut collector = TitleCollector::new();
    for file in list_source_files(&input_dir)? {
        let entries: Vec<DateEntry> = load_or_empty(&file)?;
        log::debug!("{}: {} dates", file.display(), entries.len());
        collector.add_entries(&entries);
    }
    let found = collector.len();

    let mut rows: Vec<TranslationEntry> = load_or_empty(&output)?;
    let added = extend_template(&mut rows, collector.into_titles());
    write_json_atomic(&output, &rows)?;
    log::info!(
        "{} unique titles, {} new rows, {} rows in {}",
        found,
        added,
        rows.len(),
        output.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

pub(crate) fn run_autofill(
    ctx: &AppContext,
    table: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let table = table_path(ctx, table);
    let output = output.unwrap_or_else(|| table.clone());

    let mut rows: Vec<TranslationEntry> = load_or_empty(&table)?;
    let filled = autofill_latin(&mut rows);
    if filled > 0 {
        write_json_atomic(&output, &rows)?;
    }
    log::info!("Filled {} rows with Latin titles", filled);

    let pending: Vec<_> = pending_rows(&rows).collect();
    if pending.is_empty() {
        log::info!("Every row has an English name");
        return Ok(());
    }
    log::info!("{} rows still need a translation:", pending.len());
    for (line, row) in pending.iter().take(PENDING_PREVIEW) {
        log::info!("  {:>5}  {}", line, row.zh);
    }
    if pending.len() > PENDING_PREVIEW {
        log::info!("  ... and {} more", pending.len() - PENDING_PREVIEW);
    }
    Ok(())
}

pub(crate) fn run_same_name(ctx: &AppContext, table: Option<PathBuf>) -> Result<(), CliError> {
    let rows: Vec<TranslationEntry> = load_or_empty(&table_path(ctx, table))?;
    let same = same_name_rows(&rows);
    for title in &same {
        log::info!("{}", title);
    }
    log::info!("{} rows", same.len());
    Ok(())
}

pub(crate) fn run_chinese_titles(
    ctx: &AppContext,
    year: &str,
    start: u32,
    end: u32,
) -> Result<(), CliError> {
    if start > end {
        return Err(CliError::invalid_argument(format!(
            "start month {start} is after end month {end}"
        )));
    }
    let dataset = ctx.dataset();
    let path = dataset.release_file(year);
    if !path.is_file() {
        return Err(CliError::invalid_argument(format!(
            "no release file for {year}: {}",
            path.display()
        )));
    }
    let entries = dataset.load_releases(year)?;
    for title in chinese_titles(&entries, start, end) {
        log::info!("{}", title);
    }
    Ok(())
}
