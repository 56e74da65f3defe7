//! Producer credit extraction.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::unique::UniqueSeq;

/// Brand token marking a platform self-production.
pub const PLATFORM_BRAND: &str = "猫耳FM";

/// Substrings that mark an authorial or genre mention rather than a production credit.
const NOISE_MARKERS: [&str; 3] = ["原著", "广播剧", "作者"];

/// Up to 30 clause glyphs, a credit keyword, then up to 10 more clause glyphs.
/// Clause glyphs are anything but clause delimiters and line breaks.
static CREDIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^，。；;！!？?、,|｜\r\n]{0,30}(?:联合出品|联合制作|出品|制作|协作)[^，。；;！!？?、,|｜\r\n]{0,10}")
        .unwrap()
});

/// Producer credits found in an abstract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProducerSet {
    /// Unique credit clauses in first-seen order.
    pub producers: Vec<String>,
    /// Whether any credit names the platform itself.
    pub platform_flag: bool,
}

impl ProducerSet {
    /// Credits joined for single-cell output.
    pub fn joined(&self, sep: &str) -> String {
        self.producers.join(sep)
    }
}

fn is_edge_noise(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || "：【】「」『』（）《》〈〉“”‘’·—…～".contains(c)
}

fn is_noise(clause: &str) -> bool {
    NOISE_MARKERS.iter().any(|marker| clause.contains(marker))
}

/// Extract producer credit clauses from normalized abstract text.
///
/// Noisy clauses are dropped before deduplication, so a discarded variant never
/// shadows or re-admits an identical clean one.
pub fn extract_producers(text: &str) -> ProducerSet {
    let producers: UniqueSeq<String> = CREDIT
        .find_iter(text)
        .map(|m| m.as_str().trim_matches(is_edge_noise))
        .filter(|clause| !clause.is_empty() && !is_noise(clause))
        .map(str::to_string)
        .collect();

    let platform_flag = producers.iter().any(|p| p.contains(PLATFORM_BRAND));

    ProducerSet { producers: producers.into_vec(), platform_flag }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_production() {
        let set = extract_producers("猫耳FM出品；原著某某作者");
        assert_eq!(set.producers, vec!["猫耳FM出品".to_string()]);
        assert!(set.platform_flag);
    }

    #[test]
    fn test_noise_filtered_not_deduplicated() {
        let set = extract_producers("猫耳FM出品；原著作者某某出品");
        assert_eq!(set.producers, vec!["猫耳FM出品".to_string()]);
    }

    #[test]
    fn test_filter_before_dedupe() {
        let set = extract_producers("某某工作室制作。广播剧某某工作室制作。某某工作室制作");
        assert_eq!(set.producers, vec!["某某工作室制作".to_string()]);
        assert!(!set.platform_flag);
    }

    #[test]
    fn test_multiple_credits_in_order() {
        let set = extract_producers("由听见工作室联合出品，\n声优们协作完成；后期：某某制作");
        assert_eq!(set.producers, vec!["由听见工作室联合出品", "声优们协作完成", "后期：某某制作"]);
    }

    #[test]
    fn test_trims_edge_punctuation() {
        let set = extract_producers("【猫耳FM联合制作】");
        assert_eq!(set.producers, vec!["猫耳FM联合制作".to_string()]);
        assert!(set.platform_flag);
    }

    #[test]
    fn test_trims_trailing_suffix() {
        let set = extract_producers("（某某出品）");
        assert_eq!(set.producers, vec!["某某出品".to_string()]);

        let set = extract_producers("某某出品）…");
        assert_eq!(set.producers, vec!["某某出品".to_string()]);
    }

    #[test]
    fn test_no_credits() {
        let set = extract_producers("一个温暖的故事");
        assert!(set.producers.is_empty());
        assert!(!set.platform_flag);
    }

    #[test]
    fn test_joined() {
        let set = extract_producers("甲工作室出品，乙工作室制作");
        assert_eq!(set.joined(" / "), "甲工作室出品 / 乙工作室制作");
    }
}
