//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "Curate the game release and showcase datasets", long_about = None)]
pub(crate) struct Cli {
    /// Dataset root holding game-release/, showcase/ and game-trans.json
    #[arg(short = 'd', long, global = true)]
    pub data_root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by the commands that add records from announcement text.
#[derive(Args, Clone)]
pub(crate) struct AddArgs {
    /// Announcement text to extract from ("-" reads standard input)
    #[arg(short = 'm', long = "message")]
    pub message: String,

    /// Skip confirmation and keep incoming records on conflict
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print the extracted records without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Commit and push the dataset after writing
    #[arg(short = 'b', long)]
    pub publish: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Extract games from announcement text and merge them into the release files
    AddGame {
        #[command(flatten)]
        args: AddArgs,
    },

    /// Extract showcases from announcement text and add them to the showcase files
    AddShowcase {
        #[command(flatten)]
        args: AddArgs,
    },

    /// Crawl Gamersky monthly release listings into the release files
    Crawl {
        /// Listing slugs (pc,ps5,xsx,ps4,switch,switch2,xboxone)
        #[arg(long, value_delimiter = ',')]
        platforms: Option<Vec<String>>,

        /// First month to crawl, as YYYYMM
        #[arg(long, default_value = "202101")]
        start_ym: String,

        /// Last month to crawl, as YYYYMM
        #[arg(long, default_value = "202603")]
        end_ym: String,

        /// Directory for the per-year files (default: <data-root>/game-release)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Overwrite year files instead of merging into them
        #[arg(short = 'f', long)]
        force_cover: bool,

        /// Listing pages fetched per second
        #[arg(long, default_value = "2")]
        rate: f64,
    },

    /// Look up English, Chinese and Japanese titles on IGDB
    Igdb {
        /// Game name to search for
        name: Option<String>,

        /// File with one game name per line
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,

        /// Write results to this file instead of standard output
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Indent JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Look up English and Japanese titles on the Steam store
    SteamNames {
        /// Store requests per second
        #[arg(short = 'r', long, default_value = "5")]
        rate: f64,

        /// Titles to look up, one per line (default: <data-root>/un-trans-game.json)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Results file (default: <data-root>/trans-result.txt)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Ignore earlier results and start over
        #[arg(long)]
        restart: bool,
    },

    /// Maintain the translation table
    Trans {
        #[command(subcommand)]
        action: TransAction,
    },

    /// Show settings and where they come from
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum TransAction {
    /// Copy lookup results into the translation table
    Fill {
        /// Results file (default: <data-root>/trans-result.txt)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Translation table (default: <data-root>/game-trans.json)
        #[arg(short = 't', long)]
        table: Option<PathBuf>,

        /// Where to write the updated table (default: the table itself)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Show what would change without writing
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Overwrite existing translations without asking
        #[arg(short = 'f', long)]
        force: bool,
    },

    /// Add every release title missing from the translation table
    Extract {
        /// Release directory (default: <data-root>/game-release)
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Translation table (default: <data-root>/game-trans.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Fill rows whose title is already in Latin script
    Autofill {
        /// Translation table (default: <data-root>/game-trans.json)
        #[arg(long)]
        table: Option<PathBuf>,

        /// Where to write the updated table (default: the table itself)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List rows whose English name is just the Chinese title
    SameName {
        /// Translation table (default: <data-root>/game-trans.json)
        #[arg(long)]
        table: Option<PathBuf>,
    },

    /// List Chinese titles in one year's release file
    ChineseTitles {
        /// Year to read
        year: String,

        /// First month (1-12)
        #[arg(short = 's', long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=12))]
        start: u32,

        /// Last month (1-12)
        #[arg(short = 'e', long, default_value = "12", value_parser = clap::value_parser!(u32).range(1..=12))]
        end: u32,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the config file path
    Path,
}
