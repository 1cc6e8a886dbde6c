//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（VoiceCatalog、SpeechSynthesis、AudioPlayer）
//! - catalog_cache / selection / synthesis: VoiceProvider 的内部组件
//! - voice_provider: 对外门面
//! - error: 应用层错误定义

pub mod catalog_cache;
pub mod error;
pub mod ports;
pub mod selection;
pub mod synthesis;
pub mod voice_provider;

pub use catalog_cache::{CacheStats, CatalogCache, CatalogCacheConfig, CatalogSnapshot};
pub use error::ProviderError;
pub use selection::{SelectionState, DEFAULT_VOICE_ID};
pub use synthesis::{SynthesisEngine, SynthesisEngineConfig};
pub use voice_provider::{VoiceProvider, VoiceProviderConfig};

pub use ports::{
    // Audio player
    AudioPlayerPort,
    PlaybackError,
    // TTS engine
    AudioChunkStream,
    SpeechOptions,
    SpeechSynthesisPort,
    SynthesisRequest,
    SynthesisResult,
    TtsError,
    // Voice catalog
    CatalogError,
    VoiceCatalogPort,
};
