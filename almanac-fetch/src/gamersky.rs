//! Gamersky monthly release listings.
//!
//! One page per platform and month at
//! `https://ku.gamersky.com/release/<slug>_<YYYYMM>/`. Each list item carries
//! a title, a release date, a genre line and a short summary.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use log::debug;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html};

use almanac_core::Platform;

use crate::error::{FetchError, check_status};
use crate::rate_limit::RateLimiter;

const RELEASE_URL: &str = "https://ku.gamersky.com/release";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Listing slugs crawled when none are given.
pub const DEFAULT_PLATFORMS: &[&str] = &["pc", "ps5", "xsx", "ps4", "switch", "switch2", "xboxone"];

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("static pattern"));

/// A listing page to fetch and the platform label its items get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub url: String,
    pub platform: String,
}

/// One game row on a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingItem {
    pub title: String,
    /// First `YYYY-MM-DD` in the date cell, if any.
    pub date: Option<String>,
    pub genre: String,
    pub summary: String,
}

/// Label recorded for a listing slug: the canonical platform label when the
/// slug is known, else the slug upper-cased.
pub fn platform_label(slug: &str) -> String {
    slug.parse::<Platform>()
        .map(|p| p.label().to_string())
        .unwrap_or_else(|_| slug.to_uppercase())
}

fn parse_year_month(ym: &str) -> Result<NaiveDate, FetchError> {
    let invalid = || FetchError::invalid_response(format!("invalid year-month '{ym}', expected YYYYMM"));
    if ym.len() != 6 || !ym.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let year: i32 = ym[..4].parse().map_err(|_| invalid())?;
    let month: u32 = ym[4..].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Every `YYYYMM` from `start` to `end`, inclusive. Empty when `start` is
/// after `end`.
pub fn iter_year_months(start: &str, end: &str) -> Result<Vec<String>, FetchError> {
    let mut current = parse_year_month(start)?;
    let end = parse_year_month(end)?;
    let mut months = Vec::new();
    while current <= end {
        months.push(format!("{:04}{:02}", current.year(), current.month()));
        current = match current.checked_add_months(chrono::Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(months)
}

/// Listing pages for every platform and month, platform-major.
pub fn build_urls(platforms: &[String], start: &str, end: &str) -> Result<Vec<ListingPage>, FetchError> {
    let months = iter_year_months(start, end)?;
    let mut pages = Vec::with_capacity(platforms.len() * months.len());
    for slug in platforms {
        let platform = platform_label(slug);
        for ym in &months {
            pages.push(ListingPage {
                url: format!("{RELEASE_URL}/{slug}_{ym}/"),
                platform: platform.clone(),
            });
        }
    }
    Ok(pages)
}

/// The `n`th (1-based) child element named `tag`.
fn nth_child<'a>(parent: ElementRef<'a>, tag: &str, n: usize) -> Option<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == tag)
        .nth(n.checked_sub(1)?)
}

fn children_named<'a>(parent: ElementRef<'a>, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == tag)
}

/// Walk a path of `(tag, position)` steps below `start`.
fn descend<'a>(start: ElementRef<'a>, path: &[(&str, usize)]) -> Option<ElementRef<'a>> {
    path.iter()
        .try_fold(start, |el, (tag, n)| nth_child(el, tag, *n))
}

/// First direct text node of an element, trimmed.
fn own_text(el: ElementRef<'_>) -> Option<String> {
    el.children()
        .filter_map(|node| node.value().as_text().map(|t| t.trim().to_string()))
        .find(|t| !t.is_empty())
}

fn cell_text(item: ElementRef<'_>, path: &[(&str, usize)]) -> Option<String> {
    descend(item, path).and_then(own_text)
}

/// Pull the game rows out of a listing page.
pub fn parse_listing(html: &str) -> Vec<ListingItem> {
    let document = Html::parse_document(html);
    let Some(body) = nth_child(document.root_element(), "body", 1) else {
        return Vec::new();
    };
    let Some(list_parent) = descend(body, &[("div", 7), ("div", 2), ("div", 1)]) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for ul in children_named(list_parent, "ul") {
        for li in children_named(ul, "li") {
            let title = cell_text(li, &[("div", 1), ("div", 2), ("a", 1)]).unwrap_or_default();
            let date = cell_text(li, &[("div", 1), ("div", 3)])
                .and_then(|raw| DATE_RE.find(&raw).map(|m| m.as_str().to_string()));
            let genre = cell_text(li, &[("div", 1), ("div", 4), ("a", 1)]).unwrap_or_default();
            let summary = cell_text(li, &[("div", 1), ("div", 6), ("p", 1)]).unwrap_or_default();
            items.push(ListingItem {
                title,
                date,
                genre,
                summary,
            });
        }
    }
    items
}

pub struct GamerskyClient {
    http: Client,
    limiter: RateLimiter,
}

impl GamerskyClient {
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

    /// Fetch and parse one listing page. A page without any list item is an
    /// error, since the list is rendered client-side on some responses.
    pub fn fetch_listing(&mut self, url: &str) -> Result<Vec<ListingItem>, FetchError> {
        self.limiter.wait();
        debug!("GET {}", url);
        let response = self.http.get(url).send()?;
        let html = check_status(response)?.text()?;
        let items = parse_listing(&html);
        if items.is_empty() {
            return Err(FetchError::Page {
                url: url.to_string(),
                reason: "release list not found in page".to_string(),
            });
        }
        Ok(items)
    }
}
