//! Logger that keeps progress bars intact and can tee into a file.
//!
//! Info lines are the command's normal output and are printed bare on
//! stdout. Warnings and errors go to stderr with a level tag. With
//! `--verbose` every line gets a timestamp.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use indicatif::MultiProgress;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::CliError;

fn level_tag(level: log::Level) -> String {
    match level {
        log::Level::Error => format!("[{}]", "ERROR".if_supports_color(Stderr, |t| t.red())),
        log::Level::Warn => format!("[{}]", "WARN".if_supports_color(Stderr, |t| t.yellow())),
        log::Level::Info => String::new(),
        log::Level::Debug => format!("[{}]", "DEBUG".if_supports_color(Stderr, |t| t.cyan())),
        log::Level::Trace => format!("[{}]", "TRACE".if_supports_color(Stderr, |t| t.magenta())),
    }
}

/// Build the printed line for a record.
fn format_line(record: &log::Record, timestamps: bool) -> String {
    let tag = level_tag(record.level());
    let mut line = String::new();
    if timestamps {
        line.push_str(&chrono::Local::now().format("%H:%M:%S%.3f ").to_string());
    }
    if !tag.is_empty() {
        line.push_str(&tag);
        line.push(' ');
    }
    line.push_str(&record.args().to_string());
    line
}

pub(crate) struct AlmanacLogger {
    filter: env_logger::Logger,
    multi: MultiProgress,
    timestamps: bool,
    logfile: Option<Mutex<File>>,
}

impl log::Log for AlmanacLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.filter.matches(record) {
            return;
        }
        let line = format_line(record, self.timestamps);
        let to_stderr = record.level() != log::Level::Info;
        self.multi.suspend(|| {
            if to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        });

        if let Some(file) = &self.logfile {
            let plain = strip_ansi_escapes::strip(line.as_bytes());
            if let Ok(mut file) = file.lock() {
                let _ = file.write_all(&plain).and_then(|_| file.write_all(b"\n"));
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.logfile {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Install the global logger. Progress bars should be added to the returned
/// `MultiProgress` so log lines do not tear them.
pub(crate) fn init_logging(
    quiet: bool,
    verbose: bool,
    logfile: Option<&Path>,
) -> Result<MultiProgress, CliError> {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .build();
    let max_level = filter.filter();

    let logfile = match logfile {
        Some(path) => Some(Mutex::new(File::create(path)?)),
        None => None,
    };

    let multi = if quiet {
        MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden())
    } else {
        MultiProgress::new()
    };

    let logger = AlmanacLogger {
        filter,
        multi: multi.clone(),
        timestamps: verbose,
        logfile,
    };
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| CliError::other(format!("Failed to install logger: {e}")))?;
    log::set_max_level(max_level);
    Ok(multi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lines_are_bare() {
        let line = format_line(
            &log::Record::builder()
                .level(log::Level::Info)
                .args(format_args!("Saved 3 games"))
                .build(),
            false,
        );
        assert_eq!(line, "Saved 3 games");
    }

    #[test]
    fn warnings_carry_a_tag() {
        let line = format_line(
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("corrupt file"))
                .build(),
            false,
        );
        let plain = String::from_utf8(strip_ansi_escapes::strip(line.as_bytes())).unwrap();
        assert_eq!(plain, "[WARN] corrupt file");
    }
}
