//! The episode-count rule cascade.
//!
//! Abstracts state episode counts in many overlapping ways, and one text often
//! satisfies several rules at once ("9集正剧，4集番外" also contains a bare "9集").
//! Rules are therefore tried most-specific first and the first hit wins.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::numeral::{NUMERAL_CHARS, parse_chinese_numeral, parse_count, parse_decimal};

/// `<N1>集正剧，<N2>集番外`
static COMBO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*[集话期]+\s*正剧\s*[,、，\s]*\s*(\d+)\s*[集话期]*\s*(?:番外|花絮|小剧场|福利)?").unwrap()
});

/// `共<N>集正剧`
static MAIN_TAGGED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:正剧共|共)?\s*(\d+)\s*[集话期]\s*正剧").unwrap());

/// `<N>+集正剧`
static OPEN_ENDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:正剧共|共)?\s*(\d+)\s*[+＋]\s*[集话期]\s*正剧").unwrap());

static TOTAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"共\s*(\d+)\s*[集话期]").unwrap());

/// `含<M>集番外`, searched only once `TOTAL` has matched.
static INCLUDED_EXTRA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"含\s*(\d+)\s*[集话期]?.*?(?:番外|花絮|小剧场|福利)").unwrap());

static BARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:共|第一季)?\s*(\d{1,4})\s*[集话期]").unwrap());

static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?:共)?\s*([{NUMERAL_CHARS}]+)\s*[集话期]")).unwrap());

static INCLUDED_MAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"包含正剧\s*(\d+|[{NUMERAL_CHARS}]+)\s*[集话期]")).unwrap());

static FIRST_SEASON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"第一季\s*(\d{1,4})\s*[集话期]").unwrap());

/// `前<N>集限免` / `首<N>话免费`
static FREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:前|首)\s*(\d+|[{NUMERAL_CHARS}]+)\s*[集话期]?.*?(?:免费|限免)")).unwrap()
});

/// One fact-pattern family of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeRule {
    /// Main and bonus counts stated together.
    Combo,
    /// Count explicitly tagged as 正剧.
    MainTagged,
    /// `N+` main episodes, total still open.
    OpenEnded,
    /// `共N集` with optional `含M集番外`.
    TotalWithExtras,
    /// Any 1–4 digit count followed by an episode unit.
    Bare,
    /// Count written in Chinese numerals.
    Numeral,
    /// `包含正剧N集`
    IncludedMain,
    /// `第一季N集`
    FirstSeason,
}

/// Evaluation order of the cascade.
pub const CASCADE: [EpisodeRule; 8] = [
    EpisodeRule::Combo,
    EpisodeRule::MainTagged,
    EpisodeRule::OpenEnded,
    EpisodeRule::TotalWithExtras,
    EpisodeRule::Bare,
    EpisodeRule::Numeral,
    EpisodeRule::IncludedMain,
    EpisodeRule::FirstSeason,
];

/// Counts committed by a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub main: u32,
    pub extra: u32,
    pub total: Option<u32>,
    pub open_ended: bool,
}

impl RuleMatch {
    fn closed(main: u32) -> Self {
        Self { main, extra: 0, total: Some(main), open_ended: false }
    }
}

fn first_number(re: &Regex, text: &str) -> Option<u32> {
    parse_decimal(re.captures(text)?.get(1)?.as_str())
}

impl EpisodeRule {
    /// Try this rule alone against normalized text.
    pub fn apply(self, text: &str) -> Option<RuleMatch> {
        match self {
            EpisodeRule::Combo => {
                let caps = COMBO.captures(text)?;
                let main = parse_decimal(caps.get(1)?.as_str())?;
                let extra = parse_decimal(caps.get(2)?.as_str())?;
                Some(RuleMatch { main, extra, total: Some(main.saturating_add(extra)), open_ended: false })
            }
            EpisodeRule::MainTagged => first_number(&MAIN_TAGGED, text).map(RuleMatch::closed),
            EpisodeRule::OpenEnded => first_number(&OPEN_ENDED, text)
                .map(|main| RuleMatch { main, extra: 0, total: None, open_ended: true }),
            EpisodeRule::TotalWithExtras => {
                let total = first_number(&TOTAL, text)?;
                let extra = first_number(&INCLUDED_EXTRA, text).unwrap_or(0);
                Some(RuleMatch { main: total.saturating_sub(extra), extra, total: Some(total), open_ended: false })
            }
            EpisodeRule::Bare => first_number(&BARE, text).map(RuleMatch::closed),
            EpisodeRule::Numeral => {
                let token = NUMERAL.captures(text)?.get(1)?.as_str();
                parse_chinese_numeral(token).ok().map(RuleMatch::closed)
            }
            EpisodeRule::IncludedMain => {
                let token = INCLUDED_MAIN.captures(text)?.get(1)?.as_str();
                parse_count(token).map(RuleMatch::closed)
            }
            EpisodeRule::FirstSeason => first_number(&FIRST_SEASON, text).map(RuleMatch::closed),
        }
    }
}

/// Run the cascade and return the first rule that matched.
pub fn run_cascade(text: &str) -> Option<(EpisodeRule, RuleMatch)> {
    CASCADE.iter().find_map(|rule| rule.apply(text).map(|m| (*rule, m)))
}

/// Free episodes announced as `前N集免费` / `首N集限免`; 0 when absent or unparseable.
pub fn free_episodes(text: &str) -> u32 {
    FREE.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_count(m.as_str()))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_rule() {
        let m = EpisodeRule::Combo.apply("9集正剧，4集番外").unwrap();
        assert_eq!(m, RuleMatch { main: 9, extra: 4, total: Some(13), open_ended: false });
    }

    #[test]
    fn test_combo_rule_without_bonus_keyword() {
        let m = EpisodeRule::Combo.apply("12期正剧、2期").unwrap();
        assert_eq!((m.main, m.extra, m.total), (12, 2, Some(14)));
    }

    #[test]
    fn test_combo_rule_needs_second_number() {
        assert!(EpisodeRule::Combo.apply("12集正剧，前2集限免").is_none());
    }

    #[test]
    fn test_main_tagged_rule() {
        let m = EpisodeRule::MainTagged.apply("全剧共12期正剧").unwrap();
        assert_eq!(m, RuleMatch::closed(12));
    }

    #[test]
    fn test_open_ended_rule() {
        let m = EpisodeRule::OpenEnded.apply("共20+集正剧，持续更新").unwrap();
        assert_eq!(m, RuleMatch { main: 20, extra: 0, total: None, open_ended: true });
        assert!(EpisodeRule::OpenEnded.apply("20＋集正剧").is_some());
        assert!(EpisodeRule::MainTagged.apply("共20+集正剧").is_none());
    }

    #[test]
    fn test_total_with_extras_rule() {
        let m = EpisodeRule::TotalWithExtras.apply("共15集，含3集番外").unwrap();
        assert_eq!(m, RuleMatch { main: 12, extra: 3, total: Some(15), open_ended: false });

        let m = EpisodeRule::TotalWithExtras.apply("共15集（含2期小剧场）").unwrap();
        assert_eq!((m.main, m.extra), (13, 2));
    }

    #[test]
    fn test_total_without_extras() {
        let m = EpisodeRule::TotalWithExtras.apply("共10集").unwrap();
        assert_eq!(m, RuleMatch::closed(10));
    }

    #[test]
    fn test_total_extras_exceeding_total_clamps() {
        let m = EpisodeRule::TotalWithExtras.apply("共2集，含5集番外").unwrap();
        assert_eq!(m.main, 0);
        assert_eq!(m.total, Some(2));
    }

    #[test]
    fn test_bare_rule() {
        assert_eq!(EpisodeRule::Bare.apply("本季更新至8话").unwrap().main, 8);
        assert_eq!(EpisodeRule::Bare.apply("第一季12集").unwrap().main, 12);
        assert!(EpisodeRule::Bare.apply("十二集").is_none());
    }

    #[test]
    fn test_numeral_rule() {
        assert_eq!(EpisodeRule::Numeral.apply("共十二集").unwrap(), RuleMatch::closed(12));
        assert_eq!(EpisodeRule::Numeral.apply("两百期").unwrap().main, 200);
    }

    #[test]
    fn test_numeral_rule_conversion_failure() {
        assert!(EpisodeRule::Numeral.apply("零集").is_none());
    }

    #[test]
    fn test_included_main_rule() {
        assert_eq!(EpisodeRule::IncludedMain.apply("包含正剧十集").unwrap().main, 10);
        assert_eq!(EpisodeRule::IncludedMain.apply("包含正剧 16 集").unwrap().main, 16);
    }

    #[test]
    fn test_first_season_rule() {
        assert_eq!(EpisodeRule::FirstSeason.apply("第一季 12 集").unwrap().main, 12);
        assert!(EpisodeRule::FirstSeason.apply("第二季12集").is_none());
    }

    #[test]
    fn test_cascade_prefers_combo_over_bare() {
        let (rule, m) = run_cascade("本剧共20集，其中9集正剧，4集番外").unwrap();
        assert_eq!(rule, EpisodeRule::Combo);
        assert_eq!((m.main, m.extra, m.total), (9, 4, Some(13)));
    }

    #[test]
    fn test_cascade_falls_through_failed_numeral() {
        let (rule, m) = run_cascade("第零集预告，包含正剧十二集").unwrap();
        assert_eq!(rule, EpisodeRule::IncludedMain);
        assert_eq!(m.main, 12);
    }

    #[test]
    fn test_cascade_no_match() {
        assert!(run_cascade("一部关于猫的故事").is_none());
    }

    #[test]
    fn test_free_episodes_digits() {
        assert_eq!(free_episodes("12集正剧，前2集限免"), 2);
        assert_eq!(free_episodes("首1话免费收听"), 1);
    }

    #[test]
    fn test_full_width_combo_and_free() {
        let m = EpisodeRule::Combo.apply("９集正剧，４集番外").unwrap();
        assert_eq!((m.main, m.extra, m.total), (9, 4, Some(13)));
        assert_eq!(free_episodes("前３集限免"), 3);
    }

    #[test]
    fn test_free_episodes_numerals() {
        assert_eq!(free_episodes("前两集免费"), 2);
        assert_eq!(free_episodes("首三期限免"), 3);
    }

    #[test]
    fn test_free_episodes_default_zero() {
        assert_eq!(free_episodes("共12集"), 0);
        assert_eq!(free_episodes("前零集免费"), 0);
        assert_eq!(free_episodes("前2集"), 0);
    }
}
