//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::application::{
    CatalogCacheConfig, SpeechOptions, SynthesisEngineConfig, VoiceProviderConfig,
    DEFAULT_VOICE_ID,
};
use crate::domain::{AudioFormat, Gender, VoiceCriteria};
use crate::infrastructure::adapters::{HttpCatalogClientConfig, HttpTtsClientConfig, RodioPlayerConfig};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 远端语音服务配置
    #[serde(default)]
    pub service: ServiceConfig,

    /// 音色目录配置
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// 合成配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 音色选择配置
    #[serde(default)]
    pub voice: VoiceConfig,

    /// 播放配置
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 转换为 VoiceProvider 配置
    pub fn provider_config(&self) -> VoiceProviderConfig {
        VoiceProviderConfig {
            default_voice: self.voice.default_voice.clone(),
            cache: CatalogCacheConfig {
                fetch_timeout: Duration::from_secs(self.catalog.timeout_secs),
                serve_stale_on_error: self.catalog.serve_stale_on_error,
            },
            synthesis: SynthesisEngineConfig {
                timeout: Duration::from_secs(self.tts.timeout_secs),
                max_retries: self.tts.max_retries,
                retry_backoff: Duration::from_millis(self.tts.retry_backoff_ms),
                format: self.tts.output_format,
                options: SpeechOptions {
                    rate: self.tts.rate.clone(),
                    pitch: self.tts.pitch.clone(),
                    volume: self.tts.volume.clone(),
                },
            },
        }
    }

    pub fn catalog_client_config(&self) -> HttpCatalogClientConfig {
        HttpCatalogClientConfig {
            base_url: self.service.base_url.clone(),
            subscription_key: self.service.subscription_key(),
            timeout_secs: self.catalog.timeout_secs,
            user_agent: self.service.user_agent.clone(),
        }
    }

    pub fn tts_client_config(&self) -> HttpTtsClientConfig {
        HttpTtsClientConfig {
            base_url: self.service.base_url.clone(),
            subscription_key: self.service.subscription_key(),
            timeout_secs: self.tts.timeout_secs,
            user_agent: self.service.user_agent.clone(),
        }
    }

    pub fn player_config(&self) -> RodioPlayerConfig {
        RodioPlayerConfig {
            volume: self.playback.volume,
            poll_interval: Duration::from_millis(self.playback.poll_interval_ms),
        }
    }
}

/// 远端语音服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// 服务基础 URL，目录与合成接口都挂在其下
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 订阅密钥，为空表示不发送
    #[serde(default)]
    pub subscription_key: String,

    /// 请求的 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://eastus.tts.speech.microsoft.com".to_string()
}

fn default_user_agent() -> String {
    concat!("edge-voice/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            subscription_key: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

impl ServiceConfig {
    pub fn subscription_key(&self) -> Option<String> {
        let key = self.subscription_key.trim();
        (!key.is_empty()).then(|| key.to_string())
    }
}

/// 音色目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// 拉取超时时间（秒）
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,

    /// 强制刷新失败时是否返回旧缓存
    #[serde(default)]
    pub serve_stale_on_error: bool,
}

fn default_catalog_timeout() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_catalog_timeout(),
            serve_stale_on_error: false,
        }
    }
}

/// 合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 单次请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 瞬时错误最大重试次数
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// 重试等待时间（毫秒）
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,

    /// 输出格式
    /// 可选: mp3, wav
    #[serde(default)]
    pub output_format: AudioFormat,

    /// 语速
    #[serde(default = "default_rate")]
    pub rate: String,

    /// 音调
    #[serde(default = "default_pitch")]
    pub pitch: String,

    /// 音量
    #[serde(default = "default_volume")]
    pub volume: String,
}

fn default_tts_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_backoff() -> u64 {
    500
}

fn default_rate() -> String {
    "+0%".to_string()
}

fn default_pitch() -> String {
    "+0Hz".to_string()
}

fn default_volume() -> String {
    "+0%".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_tts_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff(),
            output_format: AudioFormat::Mp3,
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
        }
    }
}

/// 音色选择配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// 默认音色
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// 默认筛选的语言前缀
    #[serde(default = "default_locale_prefixes")]
    pub locale_prefixes: Vec<String>,

    /// 默认筛选的性别
    #[serde(default = "default_gender")]
    pub gender: Option<Gender>,
}

fn default_voice() -> String {
    DEFAULT_VOICE_ID.to_string()
}

fn default_locale_prefixes() -> Vec<String> {
    vec!["zh-CN".to_string(), "zh-TW".to_string()]
}

fn default_gender() -> Option<Gender> {
    Some(Gender::Female)
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            default_voice: default_voice(),
            locale_prefixes: default_locale_prefixes(),
            gender: default_gender(),
        }
    }
}

impl VoiceConfig {
    /// 默认筛选条件
    pub fn criteria(&self) -> VoiceCriteria {
        VoiceCriteria {
            locale_prefixes: self.locale_prefixes.clone(),
            gender: self.gender,
        }
    }
}

/// 播放配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// 是否输出到音频设备
    #[serde(default = "default_playback_enabled")]
    pub enabled: bool,

    /// 音量倍数
    #[serde(default = "default_playback_volume")]
    pub volume: f32,

    /// 轮询间隔（毫秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_playback_enabled() -> bool {
    true
}

fn default_playback_volume() -> f32 {
    1.0
}

fn default_poll_interval() -> u64 {
    50
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            enabled: default_playback_enabled(),
            volume: default_playback_volume(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
