//! Listing title normalization.
//!
//! Seasons of one series are listed separately ("某某 第二季", "某某 上季"). The
//! cleaned title groups them for lookups and deduplication.

use std::sync::LazyLock;

use regex::Regex;

static SEASON_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s·]*(?:第[一二三四五六七八九十0-9]+季|全[一二三四五六七八九十0-9]+季|上季|下季|合集)$").unwrap()
});

/// Strip one trailing season or compilation marker from a listing name.
pub fn clean_title(name: &str) -> String {
    let trimmed = name.trim();
    SEASON_SUFFIX.replace(trimmed, "").trim().to_string()
}
