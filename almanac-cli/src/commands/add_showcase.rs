use chrono::Datelike;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use almanac_core::{ShowcaseRecord, year_of};
use almanac_fetch::extract_showcases;
use almanac_lib::publish::showcases_commit_message;
use almanac_merge::{ShowcaseInsert, insert_showcase};

use crate::cli_types::AddArgs;
use crate::prompt::confirm_stdio;
use crate::{AppContext, CliError};

use super::add_game::{llm_client, log_rejections, waiting_spinner};
use super::{publish, read_message};

fn log_showcase(showcase: &ShowcaseRecord) {
    log::info!(
        "  {} / {} {}",
        showcase.title.if_supports_color(Stdout, |t| t.bold()),
        showcase.title_en,
        format!("({})", showcase.display_date).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("    {}", showcase.style);
    log::info!("    {}", showcase.style_en);
}

pub(crate) fn run_add_showcase(ctx: &AppContext, args: &AddArgs) -> Result<(), CliError> {
    let text = read_message(&args.message)?;
    let client = llm_client(ctx)?;
    let current_year = chrono::Local::now().year();

    let pb = waiting_spinner(ctx, "Extracting showcases...");
    let extraction = extract_showcases(&client, &text, current_year);
    pb.finish_and_clear();
    let extraction = extraction?;

    log_rejections(&extraction.rejected);
    if extraction.accepted.is_empty() {
        return Err(CliError::other("No complete showcase found in the text"));
    }

    log::info!(
        "{}",
        format!("Extracted {} showcase(s):", extraction.accepted.len())
            .if_supports_color(Stdout, |t| t.bold()),
    );
    for showcase in &extraction.accepted {
        log_showcase(showcase);
    }
    crate::log_blank();

    if args.dry_run {
        log::info!("(dry run, nothing written)");
        log::info!("{}", serde_json::to_string_pretty(&extraction.accepted)?);
        return Ok(());
    }

    if !args.yes && !confirm_stdio("Write these showcases?")? {
        log::info!("Cancelled");
        return Ok(());
    }

    let dataset = ctx.dataset();
    let mut added = Vec::new();
    for showcase in extraction.accepted {
        let Some(year) = year_of(&showcase.display_date).map(str::to_string) else {
            log::warn!("Skipped {}: no year in '{}'", showcase.title, showcase.display_date);
            continue;
        };
        let title = showcase.title.clone();
        let mut days = dataset.load_showcases(&year)?;
        match insert_showcase(&mut days, showcase) {
            ShowcaseInsert::Duplicate { date } => {
                log::warn!("Conflict: {} is already listed on {}, skipped", title, date);
            }
            ShowcaseInsert::AddedToDay { date } | ShowcaseInsert::NewDay { date } => {
                let path = dataset.save_showcases(&year, &days)?;
                log::info!(
                    "{} Added {} on {} to {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    title,
                    date,
                    path.display(),
                );
                added.push(title);
            }
        }
    }

    if added.is_empty() {
        log::warn!("No showcase was added");
        return Ok(());
    }
    if args.publish {
        publish(ctx, &showcases_commit_message(&added), true)?;
    }
    Ok(())
}
