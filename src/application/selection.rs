//! Selection State - 当前音色选择

use std::sync::RwLock;

use super::catalog_cache::CatalogCache;
use super::error::ProviderError;

/// 内置回退音色
pub const DEFAULT_VOICE_ID: &str = "zh-CN-XiaoxiaoNeural";

/// 当前音色选择
///
/// 目录已加载时只接受目录中存在的 id；目录为空时乐观接受
pub struct SelectionState {
    current: RwLock<String>,
}

impl SelectionState {
    pub fn new(default_voice: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(default_voice.into()),
        }
    }

    pub fn current(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 设置当前音色，失败时状态不变
    pub fn set(&self, voice_id: &str, cache: &CatalogCache) -> Result<(), ProviderError> {
        let voice_id = voice_id.trim();
        if voice_id.is_empty() {
            return Err(ProviderError::invalid_input("voice id must not be empty"));
        }

        // 持写锁完成校验与写入，保证同一调用方的 set/get 顺序
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        if cache.is_populated() {
            if cache.find(voice_id).is_none() {
                tracing::warn!(voice_id = %voice_id, "Rejecting unknown voice");
                return Err(ProviderError::VoiceNotFound(voice_id.to_string()));
            }
        } else {
            tracing::debug!(voice_id = %voice_id, "Catalog not loaded, accepting voice optimistically");
        }

        *current = voice_id.to_string();
        tracing::info!(voice_id = %voice_id, "Current voice changed");
        Ok(())
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(DEFAULT_VOICE_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::catalog_cache::CatalogCacheConfig;
    use crate::domain::{Gender, VoiceRecord};
    use crate::infrastructure::adapters::FakeVoiceCatalog;
    use std::sync::Arc;

    fn cache() -> CatalogCache {
        let catalog = Arc::new(FakeVoiceCatalog::new(vec![VoiceRecord::new(
            "zh-TW-HsiaoYuNeural",
            "HsiaoYu",
            "zh-TW",
            Gender::Female,
        )]));
        CatalogCache::new(catalog, CatalogCacheConfig::default())
    }

    #[test]
    fn test_default_voice() {
        assert_eq!(SelectionState::default().current(), DEFAULT_VOICE_ID);
        assert_eq!(SelectionState::new("en-US-AriaNeural").current(), "en-US-AriaNeural");
    }

    #[test]
    fn test_optimistic_set_without_catalog() {
        let selection = SelectionState::default();
        let cache = cache();

        assert!(selection.set("zh-TW-HsiaoChenNeural", &cache).is_ok());
        assert_eq!(selection.current(), "zh-TW-HsiaoChenNeural");
    }

    #[tokio::test]
    async fn test_set_validated_against_catalog() {
        let selection = SelectionState::default();
        let cache = cache();
        cache.get_voices(false).await.unwrap();

        let err = selection.set("zh-TW-HsiaoChenNeural", &cache).unwrap_err();
        assert!(matches!(err, ProviderError::VoiceNotFound(_)));
        assert_eq!(selection.current(), DEFAULT_VOICE_ID);

        selection.set("zh-TW-HsiaoYuNeural", &cache).unwrap();
        assert_eq!(selection.current(), "zh-TW-HsiaoYuNeural");
    }

    #[test]
    fn test_blank_id_rejected() {
        let selection = SelectionState::default();
        let err = selection.set("  ", &cache()).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidInput(_)));
        assert_eq!(selection.current(), DEFAULT_VOICE_ID);
    }
}
