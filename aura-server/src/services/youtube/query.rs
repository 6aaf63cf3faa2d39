//! Search query construction
//!
//! Both backends derive several differently-worded search strings from the
//! same (title, artists) pair and try them in a fixed priority order. The
//! two backends use distinct orders; the difference is long-standing
//! observed behavior and is kept as-is.

/// Immutable (title, artists) input to a resolution call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongQuery {
    /// Song title, free text; non-empty, caller-validated
    pub title: String,
    /// Ordered artist names, possibly empty
    pub artists: Vec<String>,
}

impl SongQuery {
    pub fn new(title: impl Into<String>, artists: Vec<String>) -> Self {
        Self {
            title: title.into(),
            artists,
        }
    }
}

/// Space-joined first two artists, empty when there are none
fn artist_fragment(artists: &[String]) -> String {
    artists
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Query variants for the API backend, most to least specific
pub fn api_query_variants(query: &SongQuery) -> Vec<String> {
    let artist_str = artist_fragment(&query.artists);
    vec![
        format!("{} {} official audio", query.title, artist_str),
        format!("{} {} official", query.title, artist_str),
        format!("{} {}", query.title, artist_str),
        format!("{} {} music", query.title, artist_str),
    ]
}

/// Query variants for the scraping backend
pub fn scrape_query_variants(query: &SongQuery) -> Vec<String> {
    let artist_str = artist_fragment(&query.artists);
    vec![
        format!("{} {} official audio", query.title, artist_str),
        format!("{} {} official", query.title, artist_str),
        format!("{} {} music", query.title, artist_str),
        format!("{} {}", query.title, artist_str),
    ]
}
