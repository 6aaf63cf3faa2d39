//! Video ID format validation
//!
//! YouTube video IDs are exactly 11 characters of `[a-zA-Z0-9_-]`. A small
//! denylist rejects placeholder strings that scraping occasionally turns up
//! in page markup.

use once_cell::sync::Lazy;
use regex::Regex;

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("video ID regex"));

/// Known-invalid placeholder values that pass the format check
const INVALID_IDS: [&str; 5] = ["AAAAAAAAAAA", "undefined", "null", "true", "false"];

/// Validate that a video ID looks correct
pub fn is_valid_video_id(video_id: &str) -> bool {
    if !VIDEO_ID_RE.is_match(video_id) {
        return false;
    }
    !INVALID_IDS.contains(&video_id)
}
