//! Audio Player Port - 本地音频输出抽象

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::SynthesisResult;

/// 播放错误
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Audio output device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Failed to decode audio: {0}")]
    DecodeError(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Audio Player Port
///
/// 播放期间独占输出设备；无论正常结束、出错还是取消，返回前都必须释放设备
#[async_trait]
pub trait AudioPlayerPort: Send + Sync {
    /// 播放完整音频，直到结束或 `cancel` 被触发
    ///
    /// 被取消时返回 `Ok(())`，由调用方根据 token 状态区分
    async fn play(
        &self,
        audio: &SynthesisResult,
        cancel: &CancellationToken,
    ) -> Result<(), PlaybackError>;
}
