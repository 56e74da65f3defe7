//! Cover upload date extraction.
//!
//! Cover images are stored under a `/YYYYMM/` path segment, which is the best
//! available proxy for when a listing went up.

use std::sync::LazyLock;

use regex::Regex;

/// Marker returned when the cover URL carries no date segment.
pub const UNKNOWN_DATE: &str = "unknown";

static DATE_SEGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/([0-9]{4})([0-9]{2})/").unwrap());

/// Extract `YYYY-MM` from a cover URL, or [`UNKNOWN_DATE`].
pub fn extract_cover_date(cover_url: Option<&str>) -> String {
    cover_url
        .and_then(|url| DATE_SEGMENT.captures(url))
        .map(|caps| format!("{}-{}", &caps[1], &caps[2]))
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}
