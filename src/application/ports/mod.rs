//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_player;
mod tts_engine;
mod voice_catalog;

pub use audio_player::{AudioPlayerPort, PlaybackError};
pub use tts_engine::{
    AudioChunkStream, SpeechOptions, SpeechSynthesisPort, SynthesisRequest, SynthesisResult,
    TtsError,
};
pub use voice_catalog::{CatalogError, VoiceCatalogPort};
