//! Content category classification.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of audio production a listing belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// 广播剧: full-cast radio drama (the default).
    RadioDrama,
    /// 有声剧: narrated audio drama.
    AudioDrama,
}

impl Category {
    /// Display label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            Category::RadioDrama => "广播剧",
            Category::AudioDrama => "有声剧",
        }
    }
}

/// Classify normalized abstract text. Only the presence of `有声剧` counts.
pub fn classify(text: &str) -> Category {
    if text.contains("有声剧") { Category::AudioDrama } else { Category::RadioDrama }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_drama() {
        assert_eq!(classify("多人有声剧《某某》正式上线"), Category::AudioDrama);
    }

    #[test]
    fn test_radio_drama_default() {
        assert_eq!(classify("9集正剧"), Category::RadioDrama);
        assert_eq!(classify(""), Category::RadioDrama);
    }

    #[test]
    fn test_broadcast_keyword_is_not_a_signal() {
        assert_eq!(classify("全新广播剧"), Category::RadioDrama);
    }

    #[test]
    fn test_label() {
        assert_eq!(Category::AudioDrama.label(), "有声剧");
        assert_eq!(Category::RadioDrama.label(), "广播剧");
    }
}
