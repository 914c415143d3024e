//! Turning freeform announcement text into validated records.
//!
//! The model is asked for JSON; whatever comes back is parsed leniently into
//! candidates with optional fields, and each candidate is validated on its
//! own so one bad item never sinks the rest of the batch.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use almanac_core::{
    DateKey, ReleaseRecord, SHOWCASE_GENRE, ShowcaseRecord, normalize_platform, parse_date_key,
};

use crate::error::FetchError;
use crate::llm::{EXTRACTION_TEMPERATURE, LlmClient, strip_code_fences};

/// Format of showcase date-times.
pub const SHOWCASE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const GAME_PROMPT: &str = r#"你负责从游戏资讯文案中提取发售信息，只输出 JSON。

每个游戏输出一个对象，字段如下：
- title: 游戏名（字符串）
- date: 发售日期。确定到日用 "YYYY-MM-DD"；只有月份用 "YYYY-MM"；只知道季节、季度或上下半年时写成 "2026-春季"、"2026-Q3"、"2026-下半年"；只知道年份写 "2026"
- genre: 类型（中文字符串数组），如 动作、角色扮演、冒险、射击、策略、模拟、竞速、格斗
- style: 一两句话的游戏简介（字符串）
- platforms: 平台（字符串数组），如 PC、PS5、PS4、Xbox Series X|S、Xbox One、Switch、Switch 2、iOS、Android

文案只提到一个游戏时输出单个对象，提到多个时输出对象数组。
文案没写明的信息可根据上下文合理推断。不要输出任何解释文字。"#;

/// System prompt for showcase extraction. The current year lets the model
/// fill in dates written without one.
pub fn showcase_prompt(current_year: i32) -> String {
    format!(
        r#"你负责从游戏展示会、发布会、直面会的预告文案中提取活动信息，只输出 JSON 数组。

今年是 {current_year} 年。文案中的日期没有年份时按 {current_year} 年处理；如果该月份在今年已经明显过去，按 {next_year} 年处理。

数组中每场活动一个对象，字段如下：
- title: 活动名称（字符串），一般是 "主办方 + 展示会/发布会/直面会"
- title_en: 活动名称的英文（字符串）
- date: 开始时间，格式 "YYYY-MM-DD HH:mm"，24 小时制，北京时间；没写具体时间时用 00:00
- genre: 固定为 ["showcase"]
- style: 活动内容简介或将展示的游戏（字符串）
- style_en: style 的英文翻译（字符串）

"凌晨" 指 00:00 到 06:00。游戏名的英文使用官方译名。不要输出任何解释文字。"#,
        next_year = current_year + 1,
    )
}

/// A game as returned by the model. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameCandidate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub genre: Option<Vec<String>>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub platforms: Option<Vec<String>>,
}

/// A showcase as returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowcaseCandidate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub genre: Option<Vec<String>>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub style_en: Option<String>,
}

/// A validated game ready to merge.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedGame {
    pub date: DateKey,
    pub record: ReleaseRecord,
}

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Title if the candidate had one, for reporting.
    pub title: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{}: {}", title, self.reason),
            None => write!(f, "(untitled): {}", self.reason),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Parse a model reply holding one JSON object or an array of them.
pub fn parse_candidates<T: DeserializeOwned>(reply: &str) -> Result<Vec<T>, FetchError> {
    let body = strip_code_fences(reply);
    let parsed: OneOrMany<T> = serde_json::from_str(body).map_err(|e| {
        FetchError::invalid_response(format!("reply is not the expected JSON ({e}): {body}"))
    })?;
    Ok(match parsed {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn non_empty_list(value: &Option<Vec<String>>) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!items.is_empty()).then_some(items)
}

fn missing(fields: &[&str]) -> String {
    format!("missing {}", fields.join(", "))
}

impl GameCandidate {
    /// Check every field and normalize date, platforms and genres.
    pub fn validate(&self) -> Result<ExtractedGame, Rejection> {
        let title = non_empty(&self.title);
        let date = non_empty(&self.date);
        let genre = non_empty_list(&self.genre);
        let style = non_empty(&self.style);
        let platforms = non_empty_list(&self.platforms);

        let reject = |reason: String| Rejection {
            title: title.map(str::to_string),
            reason,
        };

        let mut absent = Vec::new();
        for (name, present) in [
            ("title", title.is_some()),
            ("date", date.is_some()),
            ("genre", genre.is_some()),
            ("style", style.is_some()),
            ("platforms", platforms.is_some()),
        ] {
            if !present {
                absent.push(name);
            }
        }
        let (Some(title), Some(date), Some(genre), Some(style), Some(platforms)) =
            (title, date, genre, style, platforms)
        else {
            return Err(reject(missing(&absent)));
        };

        let date = parse_date_key(date).map_err(|e| reject(e.to_string()))?;
        let record = ReleaseRecord::new(title)
            .with_genre(genre)
            .with_style(style)
            .with_platforms(platforms.iter().map(|p| normalize_platform(p)))
            .normalized();
        Ok(ExtractedGame { date, record })
    }
}

impl ShowcaseCandidate {
    /// Check every field; the date-time must parse and the genre tag is
    /// always the showcase tag.
    pub fn validate(&self) -> Result<ShowcaseRecord, Rejection> {
        let title = non_empty(&self.title);
        let title_en = non_empty(&self.title_en);
        let date = non_empty(&self.date);
        let style = non_empty(&self.style);
        let style_en = non_empty(&self.style_en);

        let reject = |reason: String| Rejection {
            title: title.map(str::to_string),
            reason,
        };

        let mut absent = Vec::new();
        for (name, present) in [
            ("title", title.is_some()),
            ("title_en", title_en.is_some()),
            ("date", date.is_some()),
            ("style", style.is_some()),
            ("style_en", style_en.is_some()),
        ] {
            if !present {
                absent.push(name);
            }
        }
        let (Some(title), Some(title_en), Some(date), Some(style), Some(style_en)) =
            (title, title_en, date, style, style_en)
        else {
            return Err(reject(missing(&absent)));
        };

        let when = NaiveDateTime::parse_from_str(date, SHOWCASE_DATETIME_FORMAT)
            .map_err(|_| reject(format!("invalid date-time '{date}', expected YYYY-MM-DD HH:mm")))?;

        Ok(ShowcaseRecord {
            title: title.to_string(),
            title_en: title_en.to_string(),
            display_date: when.format(SHOWCASE_DATETIME_FORMAT).to_string(),
            genre: vec![SHOWCASE_GENRE.to_string()],
            style: style.to_string(),
            style_en: style_en.to_string(),
        })
    }
}

/// Validated items plus the ones that were dropped.
#[derive(Debug, Clone, Default)]
pub struct Extraction<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<Rejection>,
}

fn partition<C, T>(candidates: &[C], validate: impl Fn(&C) -> Result<T, Rejection>) -> Extraction<T> {
    let mut out = Extraction {
        accepted: Vec::new(),
        rejected: Vec::new(),
    };
    for candidate in candidates {
        match validate(candidate) {
            Ok(item) => out.accepted.push(item),
            Err(rejection) => out.rejected.push(rejection),
        }
    }
    out
}

pub fn validate_games(candidates: &[GameCandidate]) -> Extraction<ExtractedGame> {
    partition(candidates, GameCandidate::validate)
}

pub fn validate_showcases(candidates: &[ShowcaseCandidate]) -> Extraction<ShowcaseRecord> {
    partition(candidates, ShowcaseCandidate::validate)
}

/// Ask the model for the games mentioned in `text`.
pub fn extract_games(client: &LlmClient, text: &str) -> Result<Extraction<ExtractedGame>, FetchError> {
    let reply = client.chat(GAME_PROMPT, text, EXTRACTION_TEMPERATURE)?;
    let candidates: Vec<GameCandidate> = parse_candidates(&reply)?;
    Ok(validate_games(&candidates))
}

/// Ask the model for the showcases mentioned in `text`.
pub fn extract_showcases(
    client: &LlmClient,
    text: &str,
    current_year: i32,
) -> Result<Extraction<ShowcaseRecord>, FetchError> {
    let reply = client.chat(&showcase_prompt(current_year), text, EXTRACTION_TEMPERATURE)?;
    let candidates: Vec<ShowcaseCandidate> = parse_candidates(&reply)?;
    Ok(validate_showcases(&candidates))
}

#[cfg(test)]
#[path = "tests/extract_tests.rs"]
mod tests;
