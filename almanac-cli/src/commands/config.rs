use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use almanac_lib::SettingSource;
use almanac_lib::settings::{Setting, mask_secret, settings_path};

use crate::{AppContext, CliError};

fn show_value(name: &str, value: Option<String>, source: &SettingSource) {
    let value = match value {
        Some(v) => v.if_supports_color(Stdout, |t| t.green()).to_string(),
        None => "(not set)".if_supports_color(Stdout, |t| t.dimmed()).to_string(),
    };
    log::info!(
        "  {:<20} {} {}",
        name,
        value,
        format!("[{source}]").if_supports_color(Stdout, |t| t.dimmed()),
    );
}

fn show_secret(name: &str, setting: &Setting<Option<String>>) {
    show_value(name, setting.value.as_deref().map(mask_secret), &setting.source);
}

/// Show current settings and their sources.
pub(crate) fn run_config_show(ctx: &AppContext) -> Result<(), CliError> {
    let s = &ctx.settings;

    log::info!(
        "{}",
        "Almanac Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    let status = if s.path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
    };
    log::info!(
        "  Config file: {} {}",
        s.path.display().if_supports_color(Stdout, |t| t.cyan()),
        status,
    );
    crate::log_blank();

    show_value(
        "dataset.root",
        Some(s.data_root.value.display().to_string()),
        &s.data_root.source,
    );
    show_value("llm.base_url", Some(s.llm_base_url.value.clone()), &s.llm_base_url.source);
    show_value("llm.model", Some(s.llm_model.value.clone()), &s.llm_model.source);
    show_secret("llm.api_key", &s.llm_api_key);
    show_value(
        "igdb.client_id",
        s.igdb_client_id.value.clone(),
        &s.igdb_client_id.source,
    );
    show_secret("igdb.client_secret", &s.igdb_client_secret);
    show_value(
        "publish.repo_root",
        Some(s.repo_root.value.display().to_string()),
        &s.repo_root.source,
    );
    show_value(
        "publish.build_script",
        Some(s.build_script.value.display().to_string()),
        &s.build_script.source,
    );
    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings_path().display());
    Ok(())
}
