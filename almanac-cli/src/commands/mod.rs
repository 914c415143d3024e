pub(crate) mod add_game;
pub(crate) mod add_showcase;
pub(crate) mod config;
pub(crate) mod crawl;
pub(crate) mod igdb;
pub(crate) mod steam_names;
pub(crate) mod trans;

use std::io::Read;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use almanac_core::DateEntry;
use almanac_lib::publish::{PushOutcome, commit_and_push, run_build};
use almanac_lib::{load_or_empty, update_index, write_json_atomic};
use almanac_merge::{AliasIndex, ConflictResolver, MergeStats, merge_entries};

use crate::{AppContext, CliError};

/// The announcement text: the argument itself, or standard input for `-`.
pub(crate) fn read_message(message: &str) -> Result<String, CliError> {
    let text = if message == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        message.to_string()
    };
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(CliError::invalid_argument("announcement text is empty"));
    }
    Ok(text)
}

/// Merge `incoming` into `<dir>/<year>.json`, write it and list it in the
/// directory index.
pub(crate) fn merge_year_file(
    dir: &Path,
    year: &str,
    incoming: Vec<DateEntry>,
    aliases: &AliasIndex,
    resolver: &mut dyn ConflictResolver,
) -> Result<(PathBuf, MergeStats), CliError> {
    let path = dir.join(format!("{year}.json"));
    let existing: Vec<DateEntry> = load_or_empty(&path)?;
    if existing.is_empty() {
        log::debug!("{} is new or empty", path.display());
    }
    let outcome = merge_entries(existing, incoming, aliases, resolver)?;
    write_json_atomic(&path, &outcome.entries)?;
    update_index(dir, [format!("{year}.json")])?;
    Ok((path, outcome.stats))
}

pub(crate) fn log_merge_stats(path: &Path, stats: &MergeStats) {
    log::info!(
        "{} {}: {} new dates, {} dates merged, {} games added, {} conflicts ({} replaced, {} kept)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        stats.dates_added,
        stats.dates_merged,
        stats.games_added,
        stats.conflicts,
        stats.kept_incoming,
        stats.kept_existing,
    );
}

/// Progress bar for a batch of lookups, drawn through the shared
/// `MultiProgress` and hidden with `--quiet`.
pub(crate) fn batch_progress(ctx: &AppContext, len: u64) -> ProgressBar {
    if ctx.quiet {
        return ProgressBar::hidden();
    }
    let pb = ctx.multi.add(ProgressBar::new(len));
    pb.set_style(
        ProgressStyle::with_template("  [{bar:30.cyan/dim}] {pos}/{len} {msg}")
            .expect("static pattern")
            .progress_chars("=> "),
    );
    pb
}

/// Optionally run the build script, then commit and push.
pub(crate) fn publish(ctx: &AppContext, message: &str, build_first: bool) -> Result<(), CliError> {
    let repo_root = &ctx.settings.repo_root.value;
    if build_first {
        let script = ctx.settings.build_script_path();
        log::info!("Running build script {}", script.display());
        let output = run_build(repo_root, &script)?;
        for line in output.lines() {
            log::debug!("  {}", line);
        }
    }

    match commit_and_push(repo_root, message)? {
        PushOutcome::Pushed => log::info!(
            "{} Pushed: {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            message,
        ),
        PushOutcome::NothingToCommit => log::warn!("Nothing to commit, skipped push"),
    }
    Ok(())
}
