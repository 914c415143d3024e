use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, check_status, preview};
use crate::rate_limit::RateLimiter;

const TWITCH_AUTH_URL: &str = "https://id.twitch.tv/oauth2/token";
const IGDB_API_URL: &str = "https://api.igdb.com/v4";
const REQUESTS_PER_SECOND: f64 = 4.0;
const SEARCH_LIMIT: u32 = 5;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IgdbGame {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alternative_names: Vec<AlternativeName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlternativeName {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// English, Chinese and Japanese names found for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleNames {
    pub query: String,
    pub en: String,
    pub zh: String,
    pub jp: String,
    pub found: bool,
}

impl TitleNames {
    pub fn not_found(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    /// Build from search hits: English from the first hit, Chinese and
    /// Japanese from the first alternative name whose comment says so.
    pub fn from_hits(query: &str, hits: &[IgdbGame]) -> Self {
        let Some(game) = hits.first() else {
            return Self::not_found(query);
        };
        let mut names = Self {
            query: query.to_string(),
            en: game.name.clone(),
            found: true,
            ..Self::default()
        };
        for alt in &game.alternative_names {
            if alt.name.is_empty() {
                continue;
            }
            let comment = alt.comment.as_deref().unwrap_or_default().to_lowercase();
            if is_chinese_comment(&comment) {
                if names.zh.is_empty() {
                    names.zh = alt.name.clone();
                }
            } else if is_japanese_comment(&comment) && names.jp.is_empty() {
                names.jp = alt.name.clone();
            }
        }
        names
    }
}

fn is_chinese_comment(comment: &str) -> bool {
    ["chinese", "简体", "繁体", "中文"]
        .iter()
        .any(|marker| comment.contains(marker))
}

fn is_japanese_comment(comment: &str) -> bool {
    ["japanese", "日本", "日文"]
        .iter()
        .any(|marker| comment.contains(marker))
}

/// Apicalypse body for a name search.
pub fn search_query(name: &str) -> String {
    let escaped = name.replace('"', "\\\"");
    format!(
        "search \"{escaped}\";\nfields name, alternative_names.name, alternative_names.comment;\nlimit {SEARCH_LIMIT};\n"
    )
}

/// IGDB client authenticated through Twitch client credentials.
pub struct IgdbClient {
    http: Client,
    client_id: String,
    access_token: String,
    limiter: RateLimiter,
}

impl IgdbClient {
    /// Obtain an access token and return a ready client.
    pub fn authenticate(client_id: &str, client_secret: &str) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let response = http
            .post(TWITCH_AUTH_URL)
            .query(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("grant_type", "client_credentials"),
            ])
            .send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(FetchError::Auth(format!(
                "HTTP {}: {}",
                status.as_u16(),
                preview(&text)
            )));
        }
        let token: TokenResponse = serde_json::from_str(&text)?;
        let access_token = token
            .access_token
            .ok_or_else(|| FetchError::Auth("response has no access_token".to_string()))?;

        Ok(Self {
            http,
            client_id: client_id.to_string(),
            access_token,
            limiter: RateLimiter::per_second(REQUESTS_PER_SECOND),
        })
    }

    pub fn search(&mut self, name: &str) -> Result<Vec<IgdbGame>, FetchError> {
        self.limiter.wait();
        debug!("IGDB search: {}", name);
        let response = self
            .http
            .post(format!("{IGDB_API_URL}/games"))
            .header("Client-ID", &self.client_id)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(search_query(name))
            .send()?;
        let text = check_status(response)?.text()?;
        serde_json::from_str(&text).map_err(|e| {
            FetchError::invalid_response(format!("{e}. Response: {}", preview(&text)))
        })
    }

    pub fn lookup_names(&mut self, name: &str) -> Result<TitleNames, FetchError> {
        let hits = self.search(name)?;
        Ok(TitleNames::from_hits(name, &hits))
    }
}
