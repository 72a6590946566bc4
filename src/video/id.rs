//! YouTube video id extraction

use regex::Regex;
use std::sync::LazyLock;

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(v=|/)([a-zA-Z0-9_-]{11})").expect("video id pattern is valid")
});

/// Extract the 11-character video id from a watch, short or embed URL.
///
/// Returns the first match of `v=<id>` or `/<id>`.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID
        .captures(url)
        .and_then(|captures| captures.get(2))
        .map(|id| id.as_str().to_string())
}
