//! Fake TTS Client - 用于测试的合成后端
//!
//! 始终返回固定的音频分块，不实际调用合成服务

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::ports::{
    AudioChunkStream, SpeechSynthesisPort, SynthesisRequest, TtsError,
};

/// 流存活期间计数，流被丢弃时归还
struct ActiveStream(Arc<AtomicUsize>);

impl ActiveStream {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ActiveStream {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Fake TTS Client
///
/// - 按顺序返回预设分块，每块之前等待 `chunk_delay`
/// - `push_failure` 排队的错误依次在后续调用中返回
pub struct FakeTtsClient {
    chunks: Vec<Vec<u8>>,
    chunk_delay: Duration,
    failures: Mutex<VecDeque<TtsError>>,
    requests: Mutex<Vec<SynthesisRequest>>,
    calls: AtomicUsize,
    active: Arc<AtomicUsize>,
}

impl FakeTtsClient {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks,
            chunk_delay: Duration::ZERO,
            failures: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn push_failure(&self, error: TtsError) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(error);
    }

    /// 后端被调用的次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 尚未被消费完或丢弃的音频流数量
    pub fn active_streams(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl SpeechSynthesisPort for FakeTtsClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioChunkStream, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        tracing::debug!(
            text_len = request.text.len(),
            voice_id = %request.voice_id,
            "FakeTtsClient: returning fixed audio"
        );

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(error) = failure {
            return Err(error);
        }

        let delay = self.chunk_delay;
        let state = (self.chunks.clone().into_iter(), ActiveStream::new(self.active.clone()));
        let chunks = stream::unfold(state, move |(mut chunks, guard)| async move {
            let chunk = chunks.next()?;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Some((Ok::<_, TtsError>(chunk), (chunks, guard)))
        });

        Ok(chunks.boxed())
    }
}
