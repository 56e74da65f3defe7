//! Episode count extraction.
//!
//! ### Cascade
//! - Eight fact-pattern families, most specific first (see [`rules::CASCADE`]).
//! - The first family that matches commits main/total counts; the rest are skipped.
//!
//! ### Free episodes
//! - Independent pass over the same text (`前N集免费`, `首N话限免`).
//! - Paid episodes are main minus free, floored at zero.

pub mod rules;

pub use rules::{CASCADE, EpisodeRule, RuleMatch, free_episodes, run_cascade};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Episode counts derived from an abstract.
///
/// `None` always means "not stated", never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EpisodeCounts {
    /// Main plus bonus episodes.
    pub total_episodes: Option<u32>,
    /// Main (正剧) episodes.
    pub main_episodes: Option<u32>,
    /// Bonus (番外) episodes stated alongside the main count.
    pub extra_episodes: u32,
    /// Episodes offered for free.
    pub free_episodes: u32,
    /// `main - free`, floored at zero; `None` when main is unknown.
    pub paid_episodes: Option<u32>,
    /// Main count was given as a lower bound (`20+集正剧`), so the total is unknown.
    pub open_ended: bool,
    /// Cascade family that committed the counts.
    pub rule: Option<EpisodeRule>,
}

/// Extract episode counts from normalized abstract text.
pub fn extract_episode_counts(text: &str) -> EpisodeCounts {
    let free = free_episodes(text);

    let Some((rule, m)) = run_cascade(text) else {
        tracing::debug!(free, "No episode rule matched");
        return EpisodeCounts { free_episodes: free, ..Default::default() };
    };

    tracing::debug!(?rule, main = m.main, extra = m.extra, total = ?m.total, free, "Episode rule committed");

    EpisodeCounts {
        total_episodes: m.total,
        main_episodes: Some(m.main),
        extra_episodes: m.extra,
        free_episodes: free,
        paid_episodes: Some(m.main.saturating_sub(free)),
        open_ended: m.open_ended,
        rule: Some(rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_wins_over_total() {
        let counts = extract_episode_counts("9集正剧，4集番外。本系列共20集");
        assert_eq!(counts.main_episodes, Some(9));
        assert_eq!(counts.extra_episodes, 4);
        assert_eq!(counts.total_episodes, Some(13));
        assert_eq!(counts.rule, Some(EpisodeRule::Combo));
    }

    #[test]
    fn test_full_width_digits() {
        let counts = extract_episode_counts("全剧共１２集，前２集免费");
        assert_eq!(counts.main_episodes, Some(12));
        assert_eq!(counts.total_episodes, Some(12));
        assert_eq!(counts.free_episodes, 2);
        assert_eq!(counts.paid_episodes, Some(10));
        assert_eq!(counts.rule, Some(EpisodeRule::TotalWithExtras));
    }

    #[test]
    fn test_free_and_paid() {
        let counts = extract_episode_counts("12集正剧，前2集限免");
        assert_eq!(counts.main_episodes, Some(12));
        assert_eq!(counts.total_episodes, Some(12));
        assert_eq!(counts.free_episodes, 2);
        assert_eq!(counts.paid_episodes, Some(10));
    }

    #[test]
    fn test_free_exceeding_main_clamps_to_zero() {
        let counts = extract_episode_counts("共2集，前5集免费");
        assert_eq!(counts.main_episodes, Some(2));
        assert_eq!(counts.free_episodes, 5);
        assert_eq!(counts.paid_episodes, Some(0));
    }

    #[test]
    fn test_open_ended_keeps_total_unknown() {
        let counts = extract_episode_counts("正剧共30+集正剧，首3集免费");
        assert_eq!(counts.main_episodes, Some(30));
        assert_eq!(counts.total_episodes, None);
        assert!(counts.open_ended);
        assert_eq!(counts.paid_episodes, Some(27));
    }

    #[test]
    fn test_unknown_counts() {
        let counts = extract_episode_counts("精彩剧情，敬请收听");
        assert_eq!(counts, EpisodeCounts::default());
        assert_eq!(counts.paid_episodes, None);
    }

    #[test]
    fn test_total_never_below_main() {
        for text in ["9集正剧，4集番外", "共15集，含3集番外", "共十二集", "第一季12集", "共2集，含5集番外"] {
            let counts = extract_episode_counts(text);
            if let (Some(total), Some(main)) = (counts.total_episodes, counts.main_episodes) {
                assert!(total >= main, "{text}: total {total} < main {main}");
            }
        }
    }
}
