//! Fake Audio Player - 记录播放内容，不占用音频设备

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{AudioPlayerPort, PlaybackError, SynthesisResult};

/// Fake Audio Player
pub struct FakeAudioPlayer {
    duration: Duration,
    failure: Mutex<Option<PlaybackError>>,
    played: Mutex<Vec<SynthesisResult>>,
}

impl FakeAudioPlayer {
    pub fn new() -> Self {
        Self {
            duration: Duration::ZERO,
            failure: Mutex::new(None),
            played: Mutex::new(Vec::new()),
        }
    }

    /// 模拟的播放时长
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// 设置后每次播放都返回该错误
    pub fn set_failure(&self, failure: Option<PlaybackError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = failure;
    }

    /// 完整播放完毕的音频
    pub fn played(&self) -> Vec<SynthesisResult> {
        self.played.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for FakeAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayerPort for FakeAudioPlayer {
    async fn play(
        &self,
        audio: &SynthesisResult,
        cancel: &CancellationToken,
    ) -> Result<(), PlaybackError> {
        let failure = self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(error) = failure {
            return Err(error);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("FakeAudioPlayer: playback cancelled");
                return Ok(());
            }
            _ = tokio::time::sleep(self.duration) => {}
        }

        self.played
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(audio.clone());
        Ok(())
    }
}
