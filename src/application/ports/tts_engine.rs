//! TTS Engine Port - 语音合成后端抽象
//!
//! 定义远端合成服务的抽象接口，具体实现在 infrastructure/adapters/tts

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::AudioFormat;

/// TTS 错误
#[derive(Debug, Clone, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),
}

impl TtsError {
    /// 是否为可重试的瞬时错误（网络、超时、5xx、429）
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkError(_) | Self::Timeout => true,
            Self::ServiceError { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidResponse(_) | Self::VoiceNotFound(_) => false,
        }
    }
}

/// 韵律参数，原样写入 SSML `<prosody>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechOptions {
    /// 语速，例如 "+0%"、"-10%"
    pub rate: String,
    /// 音调，例如 "+0Hz"
    pub pitch: String,
    /// 音量，例如 "+0%"
    pub volume: String,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            rate: "+0%".to_string(),
            pitch: "+0Hz".to_string(),
            volume: "+0%".to_string(),
        }
    }
}

/// 合成请求（每次调用创建，用后即弃）
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本（已去除首尾空白）
    pub text: String,
    /// 音色短标识
    pub voice_id: String,
    /// 输出格式
    pub format: AudioFormat,
    /// 韵律参数
    pub options: SpeechOptions,
}

/// 合成结果：完整音频缓冲区
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    pub audio: Vec<u8>,
    pub format: AudioFormat,
}

impl SynthesisResult {
    pub fn len(&self) -> usize {
        self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}

/// 后端返回的音频分块流
pub type AudioChunkStream = BoxStream<'static, Result<Vec<u8>, TtsError>>;

/// Speech Synthesis Port
///
/// 外部合成服务的抽象接口。返回的流被丢弃时，底层连接随之释放
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// 发起合成请求，返回音频分块流
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioChunkStream, TtsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(TtsError::Timeout.is_transient());
        assert!(TtsError::NetworkError("reset".into()).is_transient());
        assert!(TtsError::ServiceError {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(TtsError::ServiceError {
            status: 429,
            message: String::new()
        }
        .is_transient());
        assert!(!TtsError::ServiceError {
            status: 401,
            message: String::new()
        }
        .is_transient());
        assert!(!TtsError::VoiceNotFound("x".into()).is_transient());
    }
}
