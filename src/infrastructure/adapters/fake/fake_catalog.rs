//! Fake Voice Catalog - 固定目录

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{CatalogError, VoiceCatalogPort};
use crate::domain::VoiceRecord;

/// Fake Voice Catalog
///
/// 返回预设的音色列表，并记录实际拉取次数
pub struct FakeVoiceCatalog {
    voices: Mutex<Vec<VoiceRecord>>,
    delay: Duration,
    failing: AtomicBool,
    fetch_count: AtomicUsize,
}

impl FakeVoiceCatalog {
    pub fn new(voices: Vec<VoiceRecord>) -> Self {
        Self {
            voices: Mutex::new(voices),
            delay: Duration::ZERO,
            failing: AtomicBool::new(false),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// 每次拉取前的模拟网络延迟
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 切换为模拟故障
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_voices(&self, voices: Vec<VoiceRecord>) {
        *self.voices.lock().unwrap_or_else(|e| e.into_inner()) = voices;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceCatalogPort for FakeVoiceCatalog {
    async fn fetch_voices(&self) -> Result<Vec<VoiceRecord>, CatalogError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::NetworkError("simulated outage".to_string()));
        }

        let voices = self.voices.lock().unwrap_or_else(|e| e.into_inner()).clone();
        tracing::debug!(count = voices.len(), "FakeVoiceCatalog: returning fixed catalog");
        Ok(voices)
    }
}
