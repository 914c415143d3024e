use std::path::PathBuf;

use almanac_fetch::{IgdbClient, TitleNames};
use almanac_lib::load_pending_titles;
use almanac_lib::store::write_text_atomic;

use crate::{AppContext, CliError};

use super::add_game::waiting_spinner;
use super::batch_progress;

fn collect_names(name: Option<String>, file: Option<PathBuf>) -> Result<Vec<String>, CliError> {
    let mut names: Vec<String> = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .into_iter()
        .collect();
    if let Some(file) = file {
        names.extend(load_pending_titles(&file)?);
    }
    if names.is_empty() {
        return Err(CliError::invalid_argument("give a game name or --file"));
    }
    Ok(names)
}

/// One object for a single name, an array otherwise.
fn render_json(results: &[TitleNames], pretty: bool) -> serde_json::Result<String> {
    match (results, pretty) {
        ([single], true) => serde_json::to_string_pretty(single),
        ([single], false) => serde_json::to_string(single),
        (_, true) => serde_json::to_string_pretty(results),
        (_, false) => serde_json::to_string(results),
    }
}

fn render_listing(results: &[TitleNames]) -> String {
    let mut out = String::new();
    for names in results {
        if names.found {
            out.push_str(&format!("{}\n", names.query));
            out.push_str(&format!("  en: {}\n", names.en));
            out.push_str(&format!("  zh: {}\n", names.zh));
            out.push_str(&format!("  jp: {}\n", names.jp));
        } else {
            out.push_str(&format!("{}\n  not found\n", names.query));
        }
    }
    out
}

pub(crate) fn run_igdb(
    ctx: &AppContext,
    name: Option<String>,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
    pretty: bool,
) -> Result<(), CliError> {
    let names = collect_names(name, file)?;
    let (client_id, client_secret) = ctx.settings.require_igdb()?;

    let pb = waiting_spinner(ctx, "Authenticating with Twitch...");
    let client = IgdbClient::authenticate(&client_id, &client_secret);
    pb.finish_and_clear();
    let mut client = client?;

    let pb = if names.len() > 1 {
        batch_progress(ctx, names.len() as u64)
    } else {
        indicatif::ProgressBar::hidden()
    };
    let mut results = Vec::with_capacity(names.len());
    for name in &names {
        pb.set_message(name.clone());
        let found = client.lookup_names(name).unwrap_or_else(|e| {
            log::warn!("IGDB lookup failed for {}: {}", name, e);
            TitleNames::not_found(name)
        });
        results.push(found);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let text = if json || pretty {
        let mut text = render_json(&results, pretty)?;
        text.push('\n');
        text
    } else {
        render_listing(&results)
    };

    match output {
        Some(path) => {
            write_text_atomic(&path, &text)?;
            log::info!("Wrote {} results to {}", results.len(), path.display());
        }
        None => {
            for line in text.lines() {
                log::info!("{}", line);
            }
        }
    }
    Ok(())
}
