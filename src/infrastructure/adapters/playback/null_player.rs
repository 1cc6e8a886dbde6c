//! Null Audio Player - 关闭播放时使用

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{AudioPlayerPort, PlaybackError, SynthesisResult};

/// 丢弃音频，不打开任何设备
#[derive(Debug, Default)]
pub struct NullAudioPlayer;

#[async_trait]
impl AudioPlayerPort for NullAudioPlayer {
    async fn play(
        &self,
        audio: &SynthesisResult,
        _cancel: &CancellationToken,
    ) -> Result<(), PlaybackError> {
        tracing::info!(
            audio_size = audio.len(),
            format = %audio.format,
            "Playback disabled, discarding audio"
        );
        Ok(())
    }
}
