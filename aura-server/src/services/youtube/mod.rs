//! YouTube video resolution
//!
//! Finds a playable video ID for a (title, artists) pair. Two
//! interchangeable backends: the YouTube Data API v3 when a key is
//! configured, and a results-page scraper otherwise. Resolution is
//! best-effort; failing to find a video is an ordinary outcome, never an
//! error, and no error value escapes [`YouTubeResolver::search_video_id`].
//!
//! The resolver is constructed once at startup and shared behind an `Arc`;
//! it holds no per-call state, so sequential and concurrent callers are
//! both fine.

pub mod api_search;
pub mod query;
pub mod scraper;
pub mod urls;
pub mod video_id;

use async_trait::async_trait;
use tracing::{error, info, warn};

use aura_common::Config;

use api_search::{ApiSearchBackend, YouTubeDataApi};
use scraper::ScrapingBackend;

pub use query::SongQuery;
pub use video_id::is_valid_video_id;

/// One of the two search strategies; exactly one runs per resolution call
#[async_trait]
pub trait VideoSearchBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Best-effort search returning a validated video ID
    async fn search(&self, query: &SongQuery) -> Option<String>;
}

/// Video resolution service
pub struct YouTubeResolver {
    backend: Box<dyn VideoSearchBackend>,
    base_url: String,
}

impl YouTubeResolver {
    /// Select a backend from configuration: API when a key is present,
    /// scraping otherwise
    pub fn from_config(config: &Config) -> aura_common::Result<Self> {
        let backend: Box<dyn VideoSearchBackend> = match &config.youtube_api_key {
            Some(api_key) => match YouTubeDataApi::new(api_key.clone()) {
                Ok(api) => {
                    info!("YouTube Data API backend initialized");
                    Box::new(ApiSearchBackend::new(Box::new(api)))
                }
                Err(e) => {
                    error!("Could not initialize YouTube API client: {}. Falling back to web scraping.", e);
                    Box::new(scraping_backend()?)
                }
            },
            None => {
                warn!("No YouTube API key configured. Falling back to web scraping.");
                Box::new(scraping_backend()?)
            }
        };

        Ok(Self::with_backend(backend, config.base_url.clone()))
    }

    /// Build a resolver around an explicit backend (used by tests)
    pub fn with_backend(backend: Box<dyn VideoSearchBackend>, base_url: String) -> Self {
        Self { backend, base_url }
    }

    /// Name of the selected backend ("api" or "scraping")
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Search for a video ID for a song
    ///
    /// Returns a format-validated ID or `None`; network, parse and quota
    /// failures are handled inside the backends.
    pub async fn search_video_id(&self, query: &SongQuery) -> Option<String> {
        if query.title.trim().is_empty() {
            warn!("Empty song title provided for video search");
            return None;
        }

        self.backend.search(query).await
    }

    /// Embed URL for a previously validated video ID
    pub fn embed_url(&self, video_id: &str) -> String {
        urls::embed_url(video_id, &self.base_url)
    }

    /// Watch-page URL for a previously validated video ID
    pub fn watch_url(&self, video_id: &str) -> String {
        urls::watch_url(video_id)
    }
}

fn scraping_backend() -> aura_common::Result<ScrapingBackend> {
    ScrapingBackend::new()
        .map_err(|e| aura_common::Error::Internal(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn config(youtube_api_key: Option<&str>) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8000,
            data_dir: "/tmp".into(),
            youtube_api_key: youtube_api_key.map(String::from),
            base_url: "http://localhost:8000".to_string(),
        }
    }

    struct FixedBackend {
        result: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl VideoSearchBackend for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn search(&self, _query: &SongQuery) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[test]
    fn test_no_api_key_selects_scraping_backend() {
        let resolver = YouTubeResolver::from_config(&config(None)).unwrap();
        assert_eq!(resolver.backend_name(), "scraping");
    }

    #[test]
    fn test_api_key_selects_api_backend() {
        let resolver = YouTubeResolver::from_config(&config(Some("key"))).unwrap();
        assert_eq!(resolver.backend_name(), "api");
    }

    #[tokio::test]
    async fn test_delegates_to_backend() {
        let resolver = YouTubeResolver::with_backend(
            Box::new(FixedBackend {
                result: Some("dQw4w9WgXcQ".to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            "http://localhost:8000".to_string(),
        );

        let result = resolver
            .search_video_id(&SongQuery::new("Never Gonna Give You Up", vec![]))
            .await;
        assert_eq!(result.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn test_empty_title_short_circuits_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = YouTubeResolver::with_backend(
            Box::new(FixedBackend {
                result: Some("dQw4w9WgXcQ".to_string()),
                calls: calls.clone(),
            }),
            "http://localhost:8000".to_string(),
        );

        let result = resolver
            .search_video_id(&SongQuery::new("   ", vec![]))
            .await;
        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_urls_use_configured_origin() {
        let resolver = YouTubeResolver::with_backend(
            Box::new(FixedBackend {
                result: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            "https://aura.example.com".to_string(),
        );

        let embed = resolver.embed_url("dQw4w9WgXcQ");
        assert!(embed.contains("origin=https%3A%2F%2Faura.example.com"));
        assert_eq!(
            resolver.watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
