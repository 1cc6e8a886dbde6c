//! Voice Provider - 对外唯一入口
//!
//! 组合目录缓存、音色筛选、当前选择、合成与播放。
//! 缓存与选择状态只在此处修改。

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::catalog_cache::{CacheStats, CatalogCache, CatalogCacheConfig};
use super::error::ProviderError;
use super::ports::{AudioPlayerPort, SpeechSynthesisPort, SynthesisResult, VoiceCatalogPort};
use super::selection::{SelectionState, DEFAULT_VOICE_ID};
use super::synthesis::{SynthesisEngine, SynthesisEngineConfig};
use crate::domain::{filter_voices, VoiceCriteria, VoiceRecord};

/// VoiceProvider 配置
#[derive(Debug, Clone)]
pub struct VoiceProviderConfig {
    /// 未设置音色时使用的回退音色
    pub default_voice: String,
    pub cache: CatalogCacheConfig,
    pub synthesis: SynthesisEngineConfig,
}

impl Default for VoiceProviderConfig {
    fn default() -> Self {
        Self {
            default_voice: DEFAULT_VOICE_ID.to_string(),
            cache: CatalogCacheConfig::default(),
            synthesis: SynthesisEngineConfig::default(),
        }
    }
}

/// 音色提供者
pub struct VoiceProvider {
    cache: CatalogCache,
    selection: SelectionState,
    engine: SynthesisEngine,
    player: Arc<dyn AudioPlayerPort>,
}

impl VoiceProvider {
    pub fn new(
        catalog: Arc<dyn VoiceCatalogPort>,
        tts_engine: Arc<dyn SpeechSynthesisPort>,
        player: Arc<dyn AudioPlayerPort>,
        config: VoiceProviderConfig,
    ) -> Self {
        Self {
            cache: CatalogCache::new(catalog, config.cache),
            selection: SelectionState::new(config.default_voice),
            engine: SynthesisEngine::new(tts_engine, config.synthesis),
            player,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 获取全部音色（默认走缓存）
    pub async fn get_available_voices(
        &self,
        force_refresh: bool,
    ) -> Result<Arc<[VoiceRecord]>, ProviderError> {
        Ok(self.cache.get_voices(force_refresh).await?)
    }

    /// 按条件筛选音色；目录为空时先拉取
    pub async fn get_filtered_voices(
        &self,
        criteria: &VoiceCriteria,
    ) -> Result<Vec<VoiceRecord>, ProviderError> {
        let voices = self.cache.get_voices(false).await?;
        let filtered = filter_voices(&voices, criteria);
        tracing::debug!(
            total = voices.len(),
            matched = filtered.len(),
            criteria = ?criteria,
            "Voices filtered"
        );
        Ok(filtered)
    }

    /// 在已缓存的目录中查找音色，不触发网络访问
    pub fn find_voice(&self, voice_id: &str) -> Option<VoiceRecord> {
        self.cache.find(voice_id)
    }

    pub fn current_voice(&self) -> String {
        self.selection.current()
    }

    /// 切换当前音色；目录已加载时校验 id，否则乐观接受
    pub fn set_voice(&self, voice_id: &str) -> Result<(), ProviderError> {
        self.selection.set(voice_id, &self.cache)
    }

    /// 清空目录缓存
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// 合成音频；`voice_id` 为 None 时使用当前音色
    pub async fn synthesize(
        &self,
        text: &str,
        voice_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<SynthesisResult, ProviderError> {
        let voice_id = voice_id
            .map(str::to_string)
            .unwrap_or_else(|| self.selection.current());
        self.engine.synthesize(text, &voice_id, cancel).await
    }

    /// 播放一段已合成的音频
    pub async fn play_audio(
        &self,
        audio: &SynthesisResult,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        self.player
            .play(audio, cancel)
            .await
            .map_err(ProviderError::playback)?;

        if cancel.is_cancelled() {
            tracing::info!("Playback cancelled");
            return Err(ProviderError::Cancelled);
        }
        Ok(())
    }

    /// 合成并播放
    ///
    /// 返回合成的音频；播放失败时音频随 `ProviderError::Playback` 返回
    pub async fn synthesize_and_play(
        &self,
        text: &str,
        voice_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<SynthesisResult, ProviderError> {
        let audio = self.synthesize(text, voice_id, cancel).await?;

        match self.play_audio(&audio, cancel).await {
            Ok(()) => Ok(audio),
            Err(ProviderError::Playback { source, .. }) => {
                tracing::error!(error = %source, audio_size = audio.len(), "Playback failed after synthesis");
                Err(ProviderError::Playback {
                    source,
                    synthesized: Some(audio),
                })
            }
            Err(e) => Err(e),
        }
    }
}
