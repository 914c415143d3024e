use std::collections::HashSet;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use almanac_fetch::SteamClient;
use almanac_lib::{ResultsWriter, load_completed, load_pending_titles};

use crate::{AppContext, CliError};

use super::batch_progress;

/// Titles still to look up, in input order.
fn remaining<'a>(titles: &'a [String], completed: &HashSet<String>) -> Vec<&'a String> {
    titles.iter().filter(|t| !completed.contains(*t)).collect()
}

pub(crate) fn run_steam_names(
    ctx: &AppContext,
    rate: f64,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    restart: bool,
) -> Result<(), CliError> {
    let dataset = ctx.dataset();
    let input = input.unwrap_or_else(|| dataset.pending_path());
    let output = output.unwrap_or_else(|| dataset.results_path());

    let titles = load_pending_titles(&input)?;
    let completed = if restart {
        log::info!("Ignoring earlier results, starting over");
        HashSet::new()
    } else {
        load_completed(&output)?
    };
    let mut writer = ResultsWriter::open(&output, restart)?;
    let pending = remaining(&titles, &completed);

    log::info!(
        "{} titles, {} done, {} to look up ({}/s)",
        titles.len(),
        titles.len() - pending.len(),
        pending.len(),
        rate,
    );
    log::info!("Results: {}", output.display().if_supports_color(Stdout, |t| t.cyan()));
    if pending.is_empty() {
        log::info!("Nothing left to look up");
        return Ok(());
    }

    let mut client = SteamClient::new(rate)?;
    let pb = batch_progress(ctx, pending.len() as u64);
    for zh in pending {
        pb.set_message(zh.clone());
        let names = client.lookup(zh);
        log::debug!("{} -> {} / {}", names.zh, names.en, names.jp);
        writer.append(&names.zh, &names.en, &names.jp)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    log::info!(
        "{} Done, results in {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        output.display(),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_titles_are_skipped() {
        let titles = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let completed: HashSet<String> = ["B".to_string()].into_iter().collect();
        assert_eq!(remaining(&titles, &completed), vec!["A", "C"]);
    }
}
