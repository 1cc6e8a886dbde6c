//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "EDGE_VOICE";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `EDGE_VOICE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `EDGE_VOICE_SERVICE__BASE_URL=https://westus.tts.speech.microsoft.com`
/// - `EDGE_VOICE_SERVICE__SUBSCRIPTION_KEY=...`
/// - `EDGE_VOICE_TTS__TIMEOUT_SECS=20`
/// - `EDGE_VOICE_VOICE__DEFAULT_VOICE=zh-TW-HsiaoChenNeural`
///
/// 列表项（`voice.locale_prefixes`）只能通过配置文件设置
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）；未列出的字段由 serde default 补齐
    builder = builder
        .set_default("service.base_url", "https://eastus.tts.speech.microsoft.com")?
        .set_default("catalog.timeout_secs", 10)?
        .set_default("catalog.serve_stale_on_error", false)?
        .set_default("tts.timeout_secs", 30)?
        .set_default("tts.max_retries", 1)?
        .set_default("tts.retry_backoff_ms", 500)?
        .set_default("tts.output_format", "mp3")?
        .set_default("voice.default_voice", "zh-CN-XiaoxiaoNeural")?
        .set_default("playback.enabled", true)?
        .set_default("playback.volume", 1.0)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: EDGE_VOICE_TTS__MAX_RETRIES=0
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let base_url = &config.service.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "Service base URL must be http(s): {:?}",
            base_url
        )));
    }

    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Catalog timeout cannot be 0".to_string(),
        ));
    }

    if config.tts.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "TTS timeout cannot be 0".to_string(),
        ));
    }

    if config.tts.max_retries > 3 {
        return Err(ConfigError::ValidationError(format!(
            "TTS max_retries must be at most 3, got {}",
            config.tts.max_retries
        )));
    }

    if config.voice.default_voice.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Default voice cannot be empty".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&config.playback.volume) {
        return Err(ConfigError::ValidationError(format!(
            "Playback volume must be between 0.0 and 2.0, got {}",
            config.playback.volume
        )));
    }

    if config.playback.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Playback poll interval cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志），不输出订阅密钥
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Service URL: {}", config.service.base_url);
    tracing::info!(
        "Subscription Key: {}",
        if config.service.subscription_key().is_some() {
            "set"
        } else {
            "not set"
        }
    );
    tracing::info!("Catalog Timeout: {}s", config.catalog.timeout_secs);
    tracing::info!("Serve Stale Catalog: {}", config.catalog.serve_stale_on_error);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("TTS Max Retries: {}", config.tts.max_retries);
    tracing::info!("Output Format: {}", config.tts.output_format);
    tracing::info!("Default Voice: {}", config.voice.default_voice);
    tracing::info!("Playback Enabled: {}", config.playback.enabled);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
