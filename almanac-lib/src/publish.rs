//! Running the site build and pushing dataset changes with git.

use std::path::Path;
use std::process::{Command, Output};

use log::{debug, info};

use crate::error::PublishError;

/// Result of a commit-and-push run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    /// The working tree had no changes; nothing was pushed.
    NothingToCommit,
}

fn run(mut command: Command, label: String) -> Result<Output, PublishError> {
    debug!("running {}", label);
    command.output().map_err(|source| PublishError::Spawn {
        command: label,
        source,
    })
}

fn failed(label: String, output: &Output) -> PublishError {
    let status = match output.status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    };
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stderr = if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr
    };
    PublishError::Failed {
        command: label,
        status,
        stderr,
    }
}

/// Run the build script with `bash` from the repository root.
/// Returns the script's standard output.
pub fn run_build(repo_root: &Path, script: &Path) -> Result<String, PublishError> {
    if !script.is_file() {
        return Err(PublishError::MissingScript(script.to_path_buf()));
    }
    let mut command = Command::new("bash");
    command.arg(script).current_dir(repo_root);
    let label = format!("bash {}", script.display());
    let output = run(command, label.clone())?;
    if !output.status.success() {
        return Err(failed(label, &output));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn git(repo_root: &Path, args: &[&str]) -> Result<Output, PublishError> {
    let mut command = Command::new("git");
    command.args(args).current_dir(repo_root);
    run(command, format!("git {}", args.join(" ")))
}

fn nothing_to_commit(output: &Output) -> bool {
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout.contains("nothing to commit") || stdout.contains("no changes added to commit")
}

/// Stage everything, commit with `message` and push.
///
/// A clean working tree is not an error; nothing is pushed in that case.
pub fn commit_and_push(repo_root: &Path, message: &str) -> Result<PushOutcome, PublishError> {
    let add = git(repo_root, &["add", "-A"])?;
    if !add.status.success() {
        return Err(failed("git add -A".to_string(), &add));
    }

    info!("git commit: {}", message);
    let commit = git(repo_root, &["commit", "-m", message])?;
    if !commit.status.success() {
        if nothing_to_commit(&commit) {
            return Ok(PushOutcome::NothingToCommit);
        }
        return Err(failed("git commit".to_string(), &commit));
    }

    let push = git(repo_root, &["push"])?;
    if !push.status.success() {
        return Err(failed("git push".to_string(), &push));
    }
    Ok(PushOutcome::Pushed)
}

/// Commit message for newly added games.
pub fn games_commit_message(titles: &[String]) -> String {
    match titles {
        [single] => format!("chore: add game {single}"),
        _ => format!("chore: add {} games", titles.len()),
    }
}

/// Commit message for newly added showcases.
pub fn showcases_commit_message(titles: &[String]) -> String {
    match titles {
        [single] => format!("chore: add showcase {single}"),
        _ => format!("chore: add {} showcases", titles.len()),
    }
}
