//! Application settings: dataset location, API credentials, publishing.
//!
//! Values come from `~/.config/release-almanac/config.toml`, environment
//! variables and command-line flags. For every value the priority is
//! flag > environment > config file > built-in default, and the source of
//! each resolved value is kept so `config show` can explain it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

pub const ENV_DATA_ROOT: &str = "ALMANAC_DATA_ROOT";
pub const ENV_LLM_API_KEY: &str = "MOONSHOT_API_KEY";
pub const ENV_IGDB_CLIENT_ID: &str = "IGDB_CLIENT_ID";
pub const ENV_IGDB_CLIENT_SECRET: &str = "IGDB_CLIENT_SECRET";

pub const DEFAULT_DATA_ROOT: &str = "public/data";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.moonshot.cn/v1";
pub const DEFAULT_LLM_MODEL: &str = "kimi-k2-turbo-preview";
pub const DEFAULT_REPO_ROOT: &str = ".";
pub const DEFAULT_BUILD_SCRIPT: &str = "scripts/build.sh";

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("release-almanac").join("config.toml")
}

/// TOML settings file format.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SettingsFile {
    pub dataset: Option<DatasetSection>,
    pub llm: Option<LlmSection>,
    pub igdb: Option<IgdbSection>,
    pub publish: Option<PublishSection>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct DatasetSection {
    pub root: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct LlmSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct IgdbSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct PublishSection {
    pub repo_root: Option<String>,
    pub build_script: Option<String>,
}

impl SettingsFile {
    /// Read the settings file. A missing file is an empty configuration.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    Flag,
    EnvVar(&'static str),
    ConfigFile,
    Default,
    Missing,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// A resolved value and its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting<T> {
    pub value: T,
    pub source: SettingSource,
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_root: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub path: PathBuf,
    pub data_root: Setting<PathBuf>,
    pub llm_base_url: Setting<String>,
    pub llm_model: Setting<String>,
    pub llm_api_key: Setting<Option<String>>,
    pub igdb_client_id: Setting<Option<String>>,
    pub igdb_client_secret: Setting<Option<String>>,
    pub repo_root: Setting<PathBuf>,
    pub build_script: Setting<PathBuf>,
}

impl Settings {
    /// Load from the settings file and the process environment.
    pub fn load(overrides: &Overrides) -> Result<Self, SettingsError> {
        let path = settings_path();
        let file = SettingsFile::load(&path)?;
        Ok(Self::resolve(path, &file, overrides, |var| {
            std::env::var(var).ok().filter(|v| !v.is_empty())
        }))
    }

    /// Apply the priority chain with an explicit environment lookup.
    pub fn resolve<E>(path: PathBuf, file: &SettingsFile, overrides: &Overrides, env: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let dataset = file.dataset.clone().unwrap_or_default();
        let llm = file.llm.clone().unwrap_or_default();
        let igdb = file.igdb.clone().unwrap_or_default();
        let publish = file.publish.clone().unwrap_or_default();

        let data_root = match &overrides.data_root {
            Some(root) => Setting {
                value: root.clone(),
                source: SettingSource::Flag,
            },
            None => with_default(
                pick(&env, Some(ENV_DATA_ROOT), dataset.root),
                DEFAULT_DATA_ROOT,
            )
            .map_value(PathBuf::from),
        };

        Self {
            path,
            data_root,
            llm_base_url: with_default(pick(&env, None, llm.base_url), DEFAULT_LLM_BASE_URL),
            llm_model: with_default(pick(&env, None, llm.model), DEFAULT_LLM_MODEL),
            llm_api_key: pick(&env, Some(ENV_LLM_API_KEY), llm.api_key),
            igdb_client_id: pick(&env, Some(ENV_IGDB_CLIENT_ID), igdb.client_id),
            igdb_client_secret: pick(&env, Some(ENV_IGDB_CLIENT_SECRET), igdb.client_secret),
            repo_root: with_default(pick(&env, None, publish.repo_root), DEFAULT_REPO_ROOT)
                .map_value(PathBuf::from),
            build_script: with_default(pick(&env, None, publish.build_script), DEFAULT_BUILD_SCRIPT)
                .map_value(PathBuf::from),
        }
    }

    /// The LLM API key, or an error naming where to set it.
    pub fn require_llm_key(&self) -> Result<String, SettingsError> {
        self.llm_api_key.value.clone().ok_or_else(|| SettingsError::Missing {
            what: "LLM API key",
            env: ENV_LLM_API_KEY,
            key: "llm.api_key",
            path: self.path.clone(),
        })
    }

    /// IGDB client id and secret.
    pub fn require_igdb(&self) -> Result<(String, String), SettingsError> {
        let id = self.igdb_client_id.value.clone().ok_or_else(|| SettingsError::Missing {
            what: "IGDB client id",
            env: ENV_IGDB_CLIENT_ID,
            key: "igdb.client_id",
            path: self.path.clone(),
        })?;
        let secret = self
            .igdb_client_secret
            .value
            .clone()
            .ok_or_else(|| SettingsError::Missing {
                what: "IGDB client secret",
                env: ENV_IGDB_CLIENT_SECRET,
                key: "igdb.client_secret",
                path: self.path.clone(),
            })?;
        Ok((id, secret))
    }

    /// Build script path, relative paths taken from the repository root.
    pub fn build_script_path(&self) -> PathBuf {
        if self.build_script.value.is_absolute() {
            self.build_script.value.clone()
        } else {
            self.repo_root.value.join(&self.build_script.value)
        }
    }
}

impl<T> Setting<T> {
    fn map_value<U>(self, f: impl FnOnce(T) -> U) -> Setting<U> {
        Setting {
            value: f(self.value),
            source: self.source,
        }
    }
}

fn pick<E>(env: &E, var: Option<&'static str>, from_file: Option<String>) -> Setting<Option<String>>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(var) = var {
        if let Some(value) = env(var) {
            return Setting {
                value: Some(value),
                source: SettingSource::EnvVar(var),
            };
        }
    }
    match from_file.filter(|v| !v.is_empty()) {
        Some(value) => Setting {
            value: Some(value),
            source: SettingSource::ConfigFile,
        },
        None => Setting {
            value: None,
            source: SettingSource::Missing,
        },
    }
}

fn with_default(setting: Setting<Option<String>>, default: &str) -> Setting<String> {
    match setting.value {
        Some(value) => Setting {
            value,
            source: setting.source,
        },
        None => Setting {
            value: default.to_string(),
            source: SettingSource::Default,
        },
    }
}

/// Hide most of a secret for display.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
