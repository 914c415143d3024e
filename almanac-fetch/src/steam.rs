//! Steam storefront lookups for English and Japanese titles.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{FetchError, check_status};
use crate::rate_limit::RateLimiter;

const STORE_API_URL: &str = "https://store.steampowered.com/api";
const USER_AGENT: &str = "Mozilla/5.0";

/// Default number of store requests per second.
pub const DEFAULT_RATE: f64 = 5.0;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct AppDetails {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<AppData>,
}

#[derive(Debug, Deserialize)]
struct AppData {
    #[serde(default)]
    name: Option<String>,
}

/// Store language parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLanguage {
    English,
    Japanese,
}

impl StoreLanguage {
    fn param(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Japanese => "japanese",
        }
    }
}

/// One finished lookup: the query title and the names to record for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamNames {
    pub zh: String,
    pub en: String,
    pub jp: String,
}

impl SteamNames {
    /// Apply the fallbacks: no app means every name is the query; a missing
    /// English name falls back to the query, a missing Japanese one to the
    /// English name.
    pub fn resolve(zh: &str, found: Option<(Option<String>, Option<String>)>) -> Self {
        let Some((en, jp)) = found else {
            return Self {
                zh: zh.to_string(),
                en: zh.to_string(),
                jp: zh.to_string(),
            };
        };
        let en = en.filter(|s| !s.is_empty()).unwrap_or_else(|| zh.to_string());
        let jp = jp.filter(|s| !s.is_empty()).unwrap_or_else(|| en.clone());
        Self {
            zh: zh.to_string(),
            en,
            jp,
        }
    }
}

pub struct SteamClient {
    http: Client,
    limiter: RateLimiter,
}

impl SteamClient {
    pub fn new(requests_per_second: f64) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            limiter: RateLimiter::per_second(requests_per_second),
        })
    }

    /// First store hit for `term` in the Chinese storefront.
    pub fn search_app_id(&mut self, term: &str) -> Result<Option<u64>, FetchError> {
        self.limiter.wait();
        let response = self
            .http
            .get(format!("{STORE_API_URL}/storesearch/"))
            .query(&[("term", term), ("l", "schinese"), ("cc", "CN")])
            .send()?;
        let search: SearchResponse = check_status(response)?.json()?;
        if search.total == 0 {
            return Ok(None);
        }
        Ok(search.items.first().map(|item| item.id))
    }

    /// Localized name of an app, if the store has one.
    pub fn app_name(&mut self, app_id: u64, language: StoreLanguage) -> Result<Option<String>, FetchError> {
        self.limiter.wait();
        let response = self
            .http
            .get(format!("{STORE_API_URL}/appdetails"))
            .query(&[("appids", app_id.to_string().as_str()), ("l", language.param())])
            .send()?;
        let details: HashMap<String, AppDetails> = check_status(response)?.json()?;
        Ok(details
            .get(&app_id.to_string())
            .filter(|d| d.success)
            .and_then(|d| d.data.as_ref())
            .and_then(|d| d.name.clone()))
    }

    /// Look up one Chinese title. Request failures are logged and treated
    /// as "not found" so a batch keeps going.
    pub fn lookup(&mut self, zh: &str) -> SteamNames {
        let app_id = match self.search_app_id(zh) {
            Ok(id) => id,
            Err(e) => {
                warn!("Steam search failed for {}: {}", zh, e);
                None
            }
        };
        let Some(app_id) = app_id else {
            return SteamNames::resolve(zh, None);
        };
        debug!("{} -> app {}", zh, app_id);

        let en = self.name_or_warn(app_id, StoreLanguage::English);
        let jp = self.name_or_warn(app_id, StoreLanguage::Japanese);
        SteamNames::resolve(zh, Some((en, jp)))
    }

    fn name_or_warn(&mut self, app_id: u64, language: StoreLanguage) -> Option<String> {
        self.app_name(app_id, language)
            .inspect_err(|e| warn!("Steam {} name for app {} failed: {}", language.param(), app_id, e))
            .ok()
            .flatten()
    }
}
