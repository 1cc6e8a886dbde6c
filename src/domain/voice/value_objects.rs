//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

/// 音色性别
///
/// 反序列化与 `FromStr` 一致，大小写不敏感
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Gender {
    Female,
    Male,
    #[default]
    Unknown,
}

impl Gender {
    /// 宽松解析：大小写不敏感，无法识别的值归为 Unknown
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" => Ok(Self::Female),
            "male" => Ok(Self::Male),
            "unknown" | "" => Ok(Self::Unknown),
            other => Err(format!("无法识别的性别: {}", other)),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MP3 - 远端服务默认返回的压缩格式
    #[default]
    Mp3,
    /// RIFF WAV (16bit PCM)
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    /// 合成服务 `X-Microsoft-OutputFormat` 头对应的取值
    pub fn output_format(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio-24khz-48kbitrate-mono-mp3",
            Self::Wav => "riff-24khz-16bit-mono-pcm",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 音色记录 - 目录中一条音色的规范化表示
///
/// 不变量:
/// - `id` 在同一份目录快照中唯一
/// - 创建后不可修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceRecord {
    id: String,
    display_name: String,
    local_name: Option<String>,
    locale: String,
    gender: Gender,
}

impl VoiceRecord {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        locale: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            local_name: None,
            locale: locale.into(),
            gender,
        }
    }

    pub fn with_local_name(mut self, local_name: impl Into<String>) -> Self {
        let local_name = local_name.into();
        self.local_name = if local_name.is_empty() {
            None
        } else {
            Some(local_name)
        };
        self
    }

    /// 短标识（ShortName），用于选择与合成请求
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn local_name(&self) -> Option<&str> {
        self.local_name.as_deref()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// 展示用名称：优先本地化名称
    pub fn label(&self) -> &str {
        self.local_name().unwrap_or(&self.display_name)
    }
}

/// 从音色短标识推断语言区域，例如 `zh-CN-XiaoxiaoNeural` -> `zh-CN`
pub fn locale_from_voice_id(voice_id: &str) -> Option<&str> {
    let mut parts = voice_id.splitn(3, '-');
    let language = parts.next().filter(|s| !s.is_empty())?;
    let region = parts.next().filter(|s| !s.is_empty())?;
    parts.next()?;
    Some(&voice_id[..language.len() + 1 + region.len()])
}

impl std::fmt::Display for VoiceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) [{}]", self.label(), self.id, self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_case_insensitive() {
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("MALE".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!(Gender::parse_lossy("Neutral"), Gender::Unknown);
    }

    #[test]
    fn test_gender_deserialize_case_insensitive() {
        let gender: Gender = serde_json::from_str("\"Female\"").unwrap();
        assert_eq!(gender, Gender::Female);
        let gender: Gender = serde_json::from_str("\"MALE\"").unwrap();
        assert_eq!(gender, Gender::Male);
        assert!(serde_json::from_str::<Gender>("\"neutral\"").is_err());
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
    }

    #[test]
    fn test_voice_record_label() {
        let voice = VoiceRecord::new(
            "zh-CN-XiaoxiaoNeural",
            "Microsoft Xiaoxiao Online (Natural) - Chinese (Mainland)",
            "zh-CN",
            Gender::Female,
        )
        .with_local_name("晓晓");

        assert_eq!(voice.label(), "晓晓");
        assert_eq!(voice.to_string(), "晓晓 (zh-CN-XiaoxiaoNeural) [zh-CN]");

        let plain = VoiceRecord::new("en-US-GuyNeural", "Guy", "en-US", Gender::Male)
            .with_local_name("");
        assert_eq!(plain.local_name(), None);
        assert_eq!(plain.label(), "Guy");
    }

    #[test]
    fn test_locale_from_voice_id() {
        assert_eq!(locale_from_voice_id("zh-CN-XiaoxiaoNeural"), Some("zh-CN"));
        assert_eq!(locale_from_voice_id("en-US-AriaNeural"), Some("en-US"));
        assert_eq!(locale_from_voice_id("zh-CN"), None);
        assert_eq!(locale_from_voice_id("not_a_voice"), None);
    }

    #[test]
    fn test_audio_format_output_header() {
        assert_eq!(AudioFormat::default(), AudioFormat::Mp3);
        assert_eq!(
            AudioFormat::Mp3.output_format(),
            "audio-24khz-48kbitrate-mono-mp3"
        );
        assert_eq!(AudioFormat::Wav.extension(), "wav");
    }
}
