//! Playback URL builders
//!
//! Pure functions; callers are expected to have validated the video ID
//! already. Embeds target youtube-nocookie.com with a fixed player
//! parameter set (no autoplay, no related videos, custom controls).

/// Embed URL on the privacy-preserving playback domain
///
/// `origin` is the public base URL of this application and is
/// percent-encoded into the player options.
pub fn embed_url(video_id: &str, origin: &str) -> String {
    let origin_param = format!("origin={}", urlencoding::encode(origin));
    let params = [
        "autoplay=0",
        "enablejsapi=1",
        origin_param.as_str(),
        "rel=0",
        "modestbranding=1",
        "iv_load_policy=3",
        "fs=0",
        "playsinline=1",
        "controls=0",
        "disablekb=1",
        "cc_load_policy=0",
        "loop=0",
        "mute=0",
        "start=0",
    ];
    format!(
        "https://www.youtube-nocookie.com/embed/{}?{}",
        video_id,
        params.join("&")
    )
}

/// Standard watch-page URL
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
