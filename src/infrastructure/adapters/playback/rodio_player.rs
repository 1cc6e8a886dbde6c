//! Rodio Audio Player - 本地音频设备播放
//!
//! rodio 的输出流必须留在创建它的线程上，因此整个播放过程放在阻塞线程池中执行。
//! 输出设备在阻塞任务内打开，任务结束（正常、出错或取消）时随作用域释放。

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{AudioPlayerPort, PlaybackError, SynthesisResult};

/// Rodio 播放器配置
#[derive(Debug, Clone)]
pub struct RodioPlayerConfig {
    /// 音量倍数（1.0 为原始音量）
    pub volume: f32,
    /// 检查播放结束/取消的间隔
    pub poll_interval: Duration,
}

impl Default for RodioPlayerConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// Rodio 播放器
///
/// 同一实例上的播放串行执行，同一时刻只有一个播放持有输出设备
pub struct RodioAudioPlayer {
    config: RodioPlayerConfig,
    device: Arc<Mutex<()>>,
}

impl RodioAudioPlayer {
    pub fn new(config: RodioPlayerConfig) -> Self {
        Self {
            config,
            device: Arc::new(Mutex::new(())),
        }
    }
}

impl Default for RodioAudioPlayer {
    fn default() -> Self {
        Self::new(RodioPlayerConfig::default())
    }
}

#[async_trait]
impl AudioPlayerPort for RodioAudioPlayer {
    async fn play(
        &self,
        audio: &SynthesisResult,
        cancel: &CancellationToken,
    ) -> Result<(), PlaybackError> {
        let audio = audio.audio.clone();
        let config = self.config.clone();
        tracing::debug!(audio_size = audio.len(), "Starting playback");

        self.run_on_device(cancel, move |stop| play_blocking(audio, &config, stop))
            .await
    }
}

impl RodioAudioPlayer {
    /// 独占输出设备执行阻塞任务
    ///
    /// 设备锁随阻塞任务一起移动，任务结束才释放；即使本 future 被提前丢弃，
    /// 下一次播放也要等上一次的输出流关闭后才能开始
    async fn run_on_device<F>(
        &self,
        cancel: &CancellationToken,
        task: F,
    ) -> Result<(), PlaybackError>
    where
        F: FnOnce(&CancellationToken) -> Result<(), PlaybackError> + Send + 'static,
    {
        let device = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            guard = self.device.clone().lock_owned() => guard,
        };

        // 本 future 被丢弃时 stop 随之取消，阻塞线程停止播放并释放设备
        let stop = cancel.child_token();
        let _stop_on_drop = stop.clone().drop_guard();

        tokio::task::spawn_blocking(move || {
            let _device = device;
            task(&stop)
        })
        .await
        .map_err(|e| PlaybackError::PlaybackFailed(format!("playback task aborted: {}", e)))?
    }
}

fn play_blocking(
    audio: Vec<u8>,
    config: &RodioPlayerConfig,
    stop: &CancellationToken,
) -> Result<(), PlaybackError> {
    let (_stream, handle) = OutputStream::try_default()
        .map_err(|e| PlaybackError::DeviceUnavailable(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| PlaybackError::DeviceUnavailable(e.to_string()))?;
    let source = Decoder::new(Cursor::new(audio)).map_err(|e| PlaybackError::DecodeError(e.to_string()))?;

    sink.set_volume(config.volume);
    sink.append(source);

    while !sink.empty() {
        if stop.is_cancelled() {
            sink.stop();
            tracing::debug!("Playback stopped by cancellation");
            return Ok(());
        }
        std::thread::sleep(config.poll_interval);
    }

    tracing::debug!("Playback finished");
    Ok(())
}
