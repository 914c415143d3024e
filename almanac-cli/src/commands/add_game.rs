use std::collections::BTreeMap;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use almanac_core::DateEntry;
use almanac_fetch::{ExtractedGame, LlmClient, Rejection, extract_games};
use almanac_lib::publish::games_commit_message;
use almanac_merge::{ConflictResolver, FixedResolver, Resolution};

use crate::cli_types::AddArgs;
use crate::prompt::{TerminalResolver, confirm_stdio};
use crate::{AppContext, CliError};

use super::{log_merge_stats, merge_year_file, publish, read_message};

pub(crate) fn llm_client(ctx: &AppContext) -> Result<LlmClient, CliError> {
    let key = ctx.settings.require_llm_key()?;
    Ok(LlmClient::new(
        ctx.settings.llm_base_url.value.clone(),
        ctx.settings.llm_model.value.clone(),
        key,
    )?)
}

/// Spinner shown while waiting on the model.
pub(crate) fn waiting_spinner(ctx: &AppContext, msg: &'static str) -> ProgressBar {
    if ctx.quiet {
        return ProgressBar::hidden();
    }
    let pb = ctx.multi.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|"),
    );
    pb.set_message(msg);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

pub(crate) fn log_rejections(rejected: &[Rejection]) {
    for rejection in rejected {
        log::warn!("Skipped {}", rejection);
    }
}

fn log_game(game: &ExtractedGame) {
    log::info!(
        "  {} {}",
        game.record.title.if_supports_color(Stdout, |t| t.bold()),
        format!("({})", game.date.display).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("    Genre:     {}", game.record.genre.join(", "));
    log::info!("    Platforms: {}", game.record.platforms.join(", "));
    log::info!("    Summary:   {}", game.record.style);
}

/// Group extracted games into per-year incoming entries, one entry per game.
fn group_by_year(games: &[ExtractedGame]) -> BTreeMap<String, Vec<DateEntry>> {
    let mut years: BTreeMap<String, Vec<DateEntry>> = BTreeMap::new();
    for game in games {
        years
            .entry(game.date.year().to_string())
            .or_default()
            .push(DateEntry::new(&game.date, vec![game.record.clone()]));
    }
    years
}

pub(crate) fn run_add_game(ctx: &AppContext, args: &AddArgs) -> Result<(), CliError> {
    let text = read_message(&args.message)?;
    let client = llm_client(ctx)?;

    let pb = waiting_spinner(ctx, "Extracting games...");
    let extraction = extract_games(&client, &text);
    pb.finish_and_clear();
    let extraction = extraction?;

    log_rejections(&extraction.rejected);
    if extraction.accepted.is_empty() {
        return Err(CliError::other("No complete game found in the text"));
    }

    log::info!(
        "{}",
        format!("Extracted {} game(s):", extraction.accepted.len())
            .if_supports_color(Stdout, |t| t.bold()),
    );
    for game in &extraction.accepted {
        log_game(game);
    }
    crate::log_blank();

    let years = group_by_year(&extraction.accepted);

    if args.dry_run {
        log::info!("(dry run, nothing written)");
        for entries in years.values() {
            log::info!("{}", serde_json::to_string_pretty(entries)?);
        }
        return Ok(());
    }

    if !args.yes && !confirm_stdio("Write these games?")? {
        log::info!("Cancelled");
        return Ok(());
    }

    let dataset = ctx.dataset();
    let aliases = dataset.load_alias_index()?;
    let mut resolver: Box<dyn ConflictResolver> = if args.yes {
        Box::new(FixedResolver(Resolution::KeepIncoming))
    } else {
        Box::new(TerminalResolver::stdio())
    };

    let release_dir = dataset.release_dir();
    for (year, incoming) in years {
        let (path, stats) = merge_year_file(&release_dir, &year, incoming, &aliases, resolver.as_mut())?;
        log_merge_stats(&path, &stats);
    }

    if args.publish {
        let titles: Vec<String> = extraction
            .accepted
            .iter()
            .map(|g| g.record.title.clone())
            .collect();
        publish(ctx, &games_commit_message(&titles), false)?;
    }
    Ok(())
}
