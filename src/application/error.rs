//! 应用层错误定义
//!
//! VoiceProvider 对外暴露的统一错误类型

use thiserror::Error;

use super::ports::{CatalogError, PlaybackError, SynthesisResult, TtsError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 远端目录不可用（已有缓存保持不变）
    #[error("Catalog fetch failed: {0}")]
    CatalogFetch(#[from] CatalogError),

    /// 目录已加载，但其中不存在该音色
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    /// 输入无效（如空白文本）
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 合成失败（已用尽重试）
    #[error("Synthesis failed for voice {voice_id}: {source}")]
    Synthesis {
        voice_id: String,
        #[source]
        source: TtsError,
    },

    /// 播放失败；若合成已完成，音频随错误一并返回
    #[error("Playback failed: {source}")]
    Playback {
        #[source]
        source: PlaybackError,
        synthesized: Option<SynthesisResult>,
    },

    /// 调用方取消
    #[error("Operation cancelled")]
    Cancelled,
}

impl ProviderError {
    /// 创建输入无效错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// 创建合成错误
    pub fn synthesis(voice_id: impl Into<String>, source: TtsError) -> Self {
        Self::Synthesis {
            voice_id: voice_id.into(),
            source,
        }
    }

    /// 创建播放错误（未附带合成结果）
    pub fn playback(source: PlaybackError) -> Self {
        Self::Playback {
            source,
            synthesized: None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// 播放失败时已合成的音频
    pub fn synthesized_audio(&self) -> Option<&SynthesisResult> {
        match self {
            Self::Playback { synthesized, .. } => synthesized.as_ref(),
            _ => None,
        }
    }
}
