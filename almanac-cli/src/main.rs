//! almanac CLI
//!
//! Command-line tools for curating the game release and showcase datasets.

mod cli_types;
mod commands;
mod error;
mod logging;
mod prompt;

use clap::Parser;
use indicatif::MultiProgress;

use almanac_lib::{Dataset, Overrides, Settings};

use cli_types::{Cli, Commands, ConfigAction, TransAction};
pub(crate) use error::CliError;

/// Everything a command needs besides its own arguments.
pub(crate) struct AppContext {
    pub settings: Settings,
    pub multi: MultiProgress,
    pub quiet: bool,
}

impl AppContext {
    pub(crate) fn dataset(&self) -> Dataset {
        Dataset::new(&self.settings.data_root.value)
    }
}

/// Print an empty info line.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();

    let multi = match logging::init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        Ok(multi) => multi,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, multi) {
        log::error!("{}", e);
        log::logger().flush();
        std::process::exit(1);
    }
    log::logger().flush();
}

fn run(cli: Cli, multi: MultiProgress) -> Result<(), CliError> {
    // Works even when the settings file does not parse.
    if let Commands::Config {
        action: ConfigAction::Path,
    } = cli.command
    {
        return commands::config::run_config_path();
    }

    let overrides = Overrides {
        data_root: cli.data_root,
    };
    let settings = Settings::load(&overrides)?;
    let ctx = AppContext {
        settings,
        multi,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::AddGame { args } => commands::add_game::run_add_game(&ctx, &args),
        Commands::AddShowcase { args } => commands::add_showcase::run_add_showcase(&ctx, &args),
        Commands::Crawl {
            platforms,
            start_ym,
            end_ym,
            output_dir,
            force_cover,
            rate,
        } => commands::crawl::run_crawl(
            &ctx,
            commands::crawl::CrawlOptions {
                platforms,
                start_ym,
                end_ym,
                output_dir,
                force_cover,
                rate,
            },
        ),
        Commands::Igdb {
            name,
            file,
            output,
            json,
            pretty,
        } => commands::igdb::run_igdb(&ctx, name, file, output, json, pretty),
        Commands::SteamNames {
            rate,
            input,
            output,
            restart,
        } => commands::steam_names::run_steam_names(&ctx, rate, input, output, restart),
        Commands::Trans { action } => match action {
            TransAction::Fill {
                input,
                table,
                output,
                dry_run,
                force,
            } => commands::trans::run_fill(&ctx, input, table, output, dry_run, force),
            TransAction::Extract { input_dir, output } => {
                commands::trans::run_extract(&ctx, input_dir, output)
            }
            TransAction::Autofill { table, output } => {
                commands::trans::run_autofill(&ctx, table, output)
            }
            TransAction::SameName { table } => commands::trans::run_same_name(&ctx, table),
            TransAction::ChineseTitles { year, start, end } => {
                commands::trans::run_chinese_titles(&ctx, &year, start, end)
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&ctx),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}
