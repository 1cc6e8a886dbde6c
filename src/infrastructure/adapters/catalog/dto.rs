//! Catalog DTO - 远端目录记录的规范化
//!
//! 远端记录是松散的键值对象，键名大小写与风格不固定
//! （`ShortName` / `short_name` / `shortname`）。在此一次性转换为 VoiceRecord。

use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

use crate::domain::{locale_from_voice_id, Gender, VoiceRecord};

/// 远端目录中的一条原始记录
pub type RawCatalogEntry = Map<String, Value>;

/// 键名规范化：小写并去掉 `_` 与 `-`
fn canonical_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// 规范化单条记录；缺少 ShortName 时返回 None
pub fn normalize_entry(entry: &RawCatalogEntry) -> Option<VoiceRecord> {
    let fields: HashMap<String, &str> = entry
        .iter()
        .filter_map(|(key, value)| value.as_str().map(|v| (canonical_key(key), v.trim())))
        .filter(|(_, value)| !value.is_empty())
        .collect();

    let id = *fields.get("shortname")?;
    let display_name = ["name", "displayname", "friendlyname"]
        .iter()
        .find_map(|key| fields.get(*key).copied())
        .unwrap_or(id);
    let locale = fields
        .get("locale")
        .copied()
        .or_else(|| locale_from_voice_id(id))
        .unwrap_or_default();
    let gender = fields
        .get("gender")
        .map(|g| Gender::parse_lossy(g))
        .unwrap_or_default();

    let mut voice = VoiceRecord::new(id, display_name, locale, gender);
    if let Some(local_name) = fields.get("localname") {
        voice = voice.with_local_name(*local_name);
    }
    Some(voice)
}

/// 规范化整份目录，保持原有顺序；id 重复时保留首次出现的记录
pub fn normalize_catalog(entries: &[RawCatalogEntry]) -> Vec<VoiceRecord> {
    let mut seen = HashSet::new();
    let mut voices = Vec::with_capacity(entries.len());

    for entry in entries {
        match normalize_entry(entry) {
            Some(voice) if seen.insert(voice.id().to_string()) => voices.push(voice),
            Some(voice) => {
                tracing::debug!(voice_id = %voice.id(), "Dropping duplicate catalog entry");
            }
            None => {
                tracing::debug!(keys = ?entry.keys().collect::<Vec<_>>(), "Skipping catalog entry without ShortName");
            }
        }
    }

    voices
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(value: Value) -> Vec<RawCatalogEntry> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_pascal_case() {
        let raw = entries(json!([{
            "Name": "Microsoft Server Speech Text to Speech Voice (zh-CN, XiaoxiaoNeural)",
            "DisplayName": "Xiaoxiao",
            "LocalName": "晓晓",
            "ShortName": "zh-CN-XiaoxiaoNeural",
            "Gender": "Female",
            "Locale": "zh-CN"
        }]));

        let voices = normalize_catalog(&raw);
        assert_eq!(voices.len(), 1);
        let voice = &voices[0];
        assert_eq!(voice.id(), "zh-CN-XiaoxiaoNeural");
        assert_eq!(
            voice.display_name(),
            "Microsoft Server Speech Text to Speech Voice (zh-CN, XiaoxiaoNeural)"
        );
        assert_eq!(voice.local_name(), Some("晓晓"));
        assert_eq!(voice.locale(), "zh-CN");
        assert_eq!(voice.gender(), Gender::Female);
    }

    #[test]
    fn test_normalize_snake_and_lower_case() {
        let raw = entries(json!([
            {"short_name": "zh-TW-HsiaoYuNeural", "gender": "female", "locale": "zh-TW", "local_name": "曉雨"},
            {"shortname": "en-US-GuyNeural", "GENDER": "MALE", "friendlyName": "Microsoft Guy Online"}
        ]));

        let voices = normalize_catalog(&raw);
        assert_eq!(voices.len(), 2);

        assert_eq!(voices[0].display_name(), "zh-TW-HsiaoYuNeural");
        assert_eq!(voices[0].local_name(), Some("曉雨"));
        assert_eq!(voices[0].gender(), Gender::Female);

        assert_eq!(voices[1].display_name(), "Microsoft Guy Online");
        assert_eq!(voices[1].locale(), "en-US");
        assert_eq!(voices[1].gender(), Gender::Male);
    }

    #[test]
    fn test_entries_without_short_name_and_duplicates_dropped() {
        let raw = entries(json!([
            {"ShortName": "zh-CN-YunxiNeural", "Gender": "Male", "Locale": "zh-CN"},
            {"Name": "orphan", "Locale": "xx-XX"},
            {"ShortName": "zh-CN-YunxiNeural", "Gender": "Female", "Locale": "zh-CN"},
            {"ShortName": "", "Locale": "zh-CN"}
        ]));

        let voices = normalize_catalog(&raw);
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].gender(), Gender::Male);
    }

    #[test]
    fn test_unknown_gender_and_non_string_fields() {
        let raw = entries(json!([
            {"ShortName": "ja-JP-NanamiNeural", "Gender": "Neutral", "Locale": "ja-JP", "WordsPerMinute": 150}
        ]));

        let voices = normalize_catalog(&raw);
        assert_eq!(voices[0].gender(), Gender::Unknown);
        assert_eq!(voices[0].locale(), "ja-JP");
    }
}
