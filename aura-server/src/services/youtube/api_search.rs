//! API-backed video search
//!
//! Queries the YouTube Data API v3 search endpoint with several query
//! variants and scores the returned candidates with string heuristics.
//! Preferred over scraping whenever an API key is configured.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::query::{api_query_variants, SongQuery};
use super::video_id::is_valid_video_id;
use super::VideoSearchBackend;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const USER_AGENT: &str = "Aura/0.1.0 (music backend)";
const MAX_RESULTS: &str = "5";
const MUSIC_CATEGORY_ID: &str = "10";

/// Candidate titles containing any of these are never returned
const NON_MUSIC_KEYWORDS: [&str; 4] = ["#shorts", "playlist", "mix", "compilation"];

/// Title substrings marking a likely artist-authorized upload
const OFFICIAL_MARKERS: [&str; 3] = ["official", "official audio", "official video"];

/// Search API errors
#[derive(Debug, Error)]
pub enum SearchApiError {
    /// HTTP 403: quota exhausted or key revoked. Retrying other query
    /// variants with the same key is pointless.
    #[error("API quota exceeded or API key invalid")]
    QuotaExceeded,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One search result, kept only for the duration of a resolution call
#[derive(Debug, Clone)]
pub struct VideoCandidate {
    pub video_id: String,
    pub title: String,
    pub description: String,
}

/// Transport seam for the search API; mocked in tests
#[async_trait]
pub trait VideoSearchApi: Send + Sync {
    /// One search request: video type, music category, top 5 by relevance
    async fn search(&self, query: &str) -> Result<Vec<VideoCandidate>, SearchApiError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

/// YouTube Data API v3 client
pub struct YouTubeDataApi {
    http_client: reqwest::Client,
    api_key: String,
}

impl YouTubeDataApi {
    pub fn new(api_key: String) -> Result<Self, SearchApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SearchApiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }
}

#[async_trait]
impl VideoSearchApi for YouTubeDataApi {
    async fn search(&self, query: &str) -> Result<Vec<VideoCandidate>, SearchApiError> {
        debug!(query = %query, "Querying YouTube Data API");

        let response = self
            .http_client
            .get(SEARCH_URL)
            .query(&[
                ("part", "id,snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", MAX_RESULTS),
                ("videoCategoryId", MUSIC_CATEGORY_ID),
                ("order", "relevance"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchApiError::Network(e.to_string()))?;

        let status = response.status();

        if status == 403 {
            return Err(SearchApiError::QuotaExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchApiError::Api(status.as_u16(), error_text));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchApiError::Parse(e.to_string()))?;

        Ok(search_response
            .items
            .into_iter()
            .filter_map(|item| {
                item.id.video_id.map(|video_id| VideoCandidate {
                    video_id,
                    title: item.snippet.title,
                    description: item.snippet.description,
                })
            })
            .collect())
    }
}

/// Search backend running the query-variant loop over a [`VideoSearchApi`]
pub struct ApiSearchBackend {
    api: Box<dyn VideoSearchApi>,
}

impl ApiSearchBackend {
    pub fn new(api: Box<dyn VideoSearchApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl VideoSearchBackend for ApiSearchBackend {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn search(&self, query: &SongQuery) -> Option<String> {
        // First format-valid candidate of the first variant that returned
        // any results; used only when no variant produces a scored match.
        let mut fallback: Option<String> = None;
        let mut seen_results = false;

        for search_query in api_query_variants(query) {
            let candidates = match self.api.search(&search_query).await {
                Ok(candidates) => candidates,
                Err(SearchApiError::QuotaExceeded) => {
                    error!("YouTube API quota exceeded or API key invalid");
                    return None;
                }
                Err(e) => {
                    warn!(query = %search_query, "YouTube API error: {}", e);
                    continue;
                }
            };

            if candidates.is_empty() {
                continue;
            }

            if !seen_results {
                seen_results = true;
                fallback = candidates
                    .iter()
                    .find(|c| is_valid_video_id(&c.video_id))
                    .map(|c| c.video_id.clone());
            }

            if let Some(video_id) = select_candidate(query, &candidates) {
                return Some(video_id);
            }
        }

        if let Some(video_id) = &fallback {
            debug!(video_id = %video_id, title = %query.title, "No scored match; using first result");
        }
        fallback
    }
}

/// Scan candidates in order and apply the selection policy: an official
/// upload with a title or artist match wins outright; otherwise the first
/// candidate with a combined title and artist match is used.
fn select_candidate(query: &SongQuery, candidates: &[VideoCandidate]) -> Option<String> {
    let mut plain_match: Option<&VideoCandidate> = None;

    for candidate in candidates {
        if !is_valid_video_id(&candidate.video_id) {
            continue;
        }

        let title = candidate.title.to_lowercase();

        // Filter out non-music content (shorts, playlists, compilations)
        if NON_MUSIC_KEYWORDS.iter().any(|k| title.contains(k)) {
            continue;
        }

        let description = candidate.description.to_lowercase();
        let title_match = title_matches(&query.title, &title);
        let artist_match = artist_matches(&query.artists, &title, &description);
        let is_official = OFFICIAL_MARKERS.iter().any(|m| title.contains(m));

        if is_official && (title_match || artist_match) {
            debug!(video_id = %candidate.video_id, title = %query.title, "Found official video");
            return Some(candidate.video_id.clone());
        }

        if plain_match.is_none() && title_match && artist_match {
            plain_match = Some(candidate);
        }
    }

    plain_match.map(|candidate| {
        debug!(video_id = %candidate.video_id, title = %query.title, "Found matching video");
        candidate.video_id.clone()
    })
}

/// True when the song title appears in the candidate title, or any title
/// word longer than 3 characters does. Short titles and common words make
/// this deliberately fuzzy.
fn title_matches(song_title: &str, candidate_title: &str) -> bool {
    let song_title = song_title.to_lowercase();
    if candidate_title.contains(&song_title) {
        return true;
    }
    song_title
        .split_whitespace()
        .any(|word| word.len() > 3 && candidate_title.contains(word))
}

/// True when no artist was supplied, or any of the first two artists
/// appears in the candidate title or description
fn artist_matches(artists: &[String], candidate_title: &str, description: &str) -> bool {
    if artists.is_empty() {
        return true;
    }
    artists.iter().take(2).any(|artist| {
        let artist = artist.to_lowercase();
        candidate_title.contains(&artist) || description.contains(&artist)
    })
}
