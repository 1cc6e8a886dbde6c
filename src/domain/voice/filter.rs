//! Voice Context - 音色筛选
//!
//! 纯函数，不做 I/O，可脱离远端目录单独测试

use serde::{Deserialize, Serialize};

use super::{Gender, VoiceRecord};

/// 音色筛选条件
///
/// - `locale_prefixes` 为空表示不限语言
/// - `gender` 为 None 表示不限性别
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCriteria {
    #[serde(default)]
    pub locale_prefixes: Vec<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl VoiceCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !self.locale_prefixes.contains(&prefix) {
            self.locale_prefixes.push(prefix);
        }
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn matches(&self, voice: &VoiceRecord) -> bool {
        let gender_ok = self.gender.map_or(true, |g| g == voice.gender());
        let locale_ok = self.locale_prefixes.is_empty()
            || self
                .locale_prefixes
                .iter()
                .any(|prefix| voice.locale().starts_with(prefix.as_str()));
        gender_ok && locale_ok
    }
}

/// 按条件筛选音色，保持原有相对顺序
pub fn filter_voices(voices: &[VoiceRecord], criteria: &VoiceCriteria) -> Vec<VoiceRecord> {
    voices
        .iter()
        .filter(|voice| criteria.matches(voice))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_voices() -> Vec<VoiceRecord> {
        vec![
            VoiceRecord::new("zh-CN-XiaoxiaoNeural", "Xiaoxiao", "zh-CN", Gender::Female),
            VoiceRecord::new("zh-CN-YunxiNeural", "Yunxi", "zh-CN", Gender::Male),
            VoiceRecord::new("en-US-AriaNeural", "Aria", "en-US", Gender::Female),
            VoiceRecord::new("zh-TW-HsiaoChenNeural", "HsiaoChen", "zh-TW", Gender::Female),
            VoiceRecord::new("zh-HK-HiuGaaiNeural", "HiuGaai", "zh-HK", Gender::Female),
            VoiceRecord::new("zh-TW-YunJheNeural", "YunJhe", "zh-TW", Gender::Male),
        ]
    }

    #[test]
    fn test_female_chinese_voices_keep_order() {
        let criteria = VoiceCriteria::new()
            .with_locale_prefix("zh-CN")
            .with_locale_prefix("zh-TW")
            .with_gender(Gender::Female);

        let ids: Vec<_> = filter_voices(&sample_voices(), &criteria)
            .iter()
            .map(|v| v.id().to_string())
            .collect();

        assert_eq!(ids, vec!["zh-CN-XiaoxiaoNeural", "zh-TW-HsiaoChenNeural"]);
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        let voices = sample_voices();
        let filtered = filter_voices(&voices, &VoiceCriteria::default());
        assert_eq!(filtered, voices);
    }

    #[test]
    fn test_gender_only() {
        let criteria = VoiceCriteria::new().with_gender(Gender::Male);
        let filtered = filter_voices(&sample_voices(), &criteria);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|v| v.gender() == Gender::Male));
    }

    #[test]
    fn test_prefix_only_and_duplicates_ignored() {
        let criteria = VoiceCriteria::new()
            .with_locale_prefix("zh")
            .with_locale_prefix("zh");
        assert_eq!(criteria.locale_prefixes.len(), 1);

        let filtered = filter_voices(&sample_voices(), &criteria);
        assert_eq!(filtered.len(), 5);
        assert!(filtered.iter().all(|v| v.locale().starts_with("zh")));
    }

    #[test]
    fn test_no_match() {
        let criteria = VoiceCriteria::new().with_locale_prefix("ja-JP");
        assert!(filter_voices(&sample_voices(), &criteria).is_empty());
    }
}
