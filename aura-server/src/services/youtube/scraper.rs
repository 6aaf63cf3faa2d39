//! Scraping-backed video search
//!
//! Fallback used when no API key is configured: fetches the public search
//! results page and extracts video IDs from the embedded `ytInitialData`
//! JSON, with a raw `/watch?v=` regex scan as a second pass. The JSON path
//! follows an undocumented internal structure; when it changes upstream,
//! extraction silently degrades to the regex pass.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::api_search::SearchApiError;
use super::query::{scrape_query_variants, SongQuery};
use super::video_id::is_valid_video_id;
use super::VideoSearchBackend;

const RESULTS_URL: &str = "https://www.youtube.com/results?search_query=";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

static INITIAL_DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"var ytInitialData = (\{.+?\});").expect("ytInitialData regex"));

static WATCH_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/watch\?v=([a-zA-Z0-9_-]{11})").expect("watch URL regex"));

/// Search backend scraping the public results page
pub struct ScrapingBackend {
    http_client: reqwest::Client,
}

impl ScrapingBackend {
    pub fn new() -> Result<Self, SearchApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SearchApiError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Fetch one results page; `None` when the server answered non-200
    async fn fetch_results_page(
        &self,
        search_query: &str,
    ) -> Result<Option<String>, reqwest::Error> {
        let search_url = format!("{}{}", RESULTS_URL, urlencoding::encode(search_query));
        debug!(url = %search_url, "Fetching search results page");

        let response = self.http_client.get(&search_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                query = %search_query,
                status = status.as_u16(),
                "Search results page returned non-success status"
            );
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl VideoSearchBackend for ScrapingBackend {
    fn name(&self) -> &'static str {
        "scraping"
    }

    async fn search(&self, query: &SongQuery) -> Option<String> {
        info!(title = %query.title, artists = ?query.artists, "Scraping for video");

        for search_query in scrape_query_variants(query) {
            let search_query = search_query.trim();
            if search_query.is_empty() {
                continue;
            }

            let body = match self.fetch_results_page(search_query).await {
                Ok(Some(body)) => body,
                Ok(None) => continue,
                Err(e) if e.is_timeout() => {
                    warn!(query = %search_query, "Search request timed out");
                    continue;
                }
                Err(e) => {
                    debug!(query = %search_query, "Search request failed: {}", e);
                    continue;
                }
            };

            if let Some(video_id) = extract_video_id(&body) {
                info!(video_id = %video_id, title = %query.title, "Found video via scraping");
                return Some(video_id);
            }
        }

        warn!(title = %query.title, "No video found via scraping");
        None
    }
}

/// Two extraction passes over a results page body; first non-empty pass
/// wins, and the first format-valid ID from it is returned
fn extract_video_id(body: &str) -> Option<String> {
    let json_ids = extract_ids_from_initial_data(body);
    if !json_ids.is_empty() {
        debug!(count = json_ids.len(), "Extracted video IDs from ytInitialData");
        return json_ids.into_iter().next();
    }

    for capture in WATCH_URL_RE.captures_iter(body) {
        let video_id = &capture[1];
        if is_valid_video_id(video_id) {
            return Some(video_id.to_string());
        }
    }

    None
}

/// Extract video IDs from the `var ytInitialData = {...};` assignment
///
/// Navigates contents → twoColumnSearchResultsRenderer → primaryContents →
/// sectionListRenderer → contents[] → itemSectionRenderer → contents[] →
/// videoRenderer → videoId, collecting format-valid IDs in document order.
/// Any shape mismatch yields an empty list.
fn extract_ids_from_initial_data(body: &str) -> Vec<String> {
    let mut video_ids = Vec::new();

    let Some(capture) = INITIAL_DATA_RE.captures(body) else {
        return video_ids;
    };

    let data: serde_json::Value = match serde_json::from_str(&capture[1]) {
        Ok(data) => data,
        Err(e) => {
            debug!("Failed to parse ytInitialData JSON: {}", e);
            return video_ids;
        }
    };

    let sections = data
        .get("contents")
        .and_then(|v| v.get("twoColumnSearchResultsRenderer"))
        .and_then(|v| v.get("primaryContents"))
        .and_then(|v| v.get("sectionListRenderer"))
        .and_then(|v| v.get("contents"))
        .and_then(|v| v.as_array());

    let Some(sections) = sections else {
        return video_ids;
    };

    for section in sections {
        let items = section
            .get("itemSectionRenderer")
            .and_then(|v| v.get("contents"))
            .and_then(|v| v.as_array());
        let Some(items) = items else {
            continue;
        };

        for item in items {
            let video_id = item
                .get("videoRenderer")
                .and_then(|v| v.get("videoId"))
                .and_then(|v| v.as_str());
            if let Some(video_id) = video_id {
                if is_valid_video_id(video_id) {
                    video_ids.push(video_id.to_string());
                }
            }
        }
    }

    video_ids
}
