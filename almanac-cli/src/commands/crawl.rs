use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use almanac_fetch::{DEFAULT_PLATFORMS, GamerskyClient, build_urls};
use almanac_lib::{update_index, write_json_atomic};
use almanac_merge::ReleaseAccumulator;

use crate::prompt::TerminalResolver;
use crate::{AppContext, CliError};

use super::{batch_progress, log_merge_stats, merge_year_file};

pub(crate) struct CrawlOptions {
    pub platforms: Option<Vec<String>>,
    pub start_ym: String,
    pub end_ym: String,
    pub output_dir: Option<PathBuf>,
    pub force_cover: bool,
    pub rate: f64,
}

fn platform_slugs(requested: Option<Vec<String>>) -> Vec<String> {
    match requested {
        Some(list) => list
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect(),
        None => DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect(),
    }
}

pub(crate) fn run_crawl(ctx: &AppContext, options: CrawlOptions) -> Result<(), CliError> {
    let slugs = platform_slugs(options.platforms);
    if slugs.is_empty() {
        return Err(CliError::invalid_argument("no platforms given"));
    }
    let pages = build_urls(&slugs, &options.start_ym, &options.end_ym)?;
    log::info!(
        "Crawling {} listing pages ({} platforms, {} to {})",
        pages.len(),
        slugs.len(),
        options.start_ym,
        options.end_ym,
    );

    let mut client = GamerskyClient::new(options.rate)?;
    let mut accumulator = ReleaseAccumulator::new();
    let mut failed: Vec<(String, String)> = Vec::new();

    let pb = batch_progress(ctx, pages.len() as u64);
    for page in &pages {
        pb.set_message(page.url.clone());
        match client.fetch_listing(&page.url) {
            Ok(items) => {
                log::debug!("{}: {} items", page.url, items.len());
                for item in items {
                    accumulator.add_game(
                        item.date.as_deref().unwrap_or_default(),
                        &item.title,
                        &item.genre,
                        &item.summary,
                        &page.platform,
                    );
                }
            }
            Err(e) => {
                log::debug!("{} failed: {}", page.url, e);
                failed.push((page.url.clone(), e.to_string()));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    log::info!("Collected {} games", accumulator.len());
    let out_dir = options
        .output_dir
        .unwrap_or_else(|| ctx.dataset().release_dir());
    let years = accumulator.into_years();

    if options.force_cover {
        for (year, entries) in &years {
            let path = out_dir.join(format!("{year}.json"));
            write_json_atomic(&path, entries)?;
            log::info!(
                "{} Wrote {} dates to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                entries.len(),
                path.display().if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        update_index(&out_dir, years.keys().map(|year| format!("{year}.json")))?;
    } else {
        let aliases = ctx.dataset().load_alias_index()?;
        let mut resolver = TerminalResolver::stdio();
        for (year, entries) in years {
            let (path, stats) = merge_year_file(&out_dir, &year, entries, &aliases, &mut resolver)?;
            log_merge_stats(&path, &stats);
        }
    }

    if !failed.is_empty() {
        let lines: Vec<String> = failed
            .iter()
            .map(|(url, reason)| format!("  {url} ({reason})"))
            .collect();
        log::warn!("{} pages failed:\n{}", failed.len(), lines.join("\n"));
    }
    Ok(())
}
