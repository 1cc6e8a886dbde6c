//! Catalog Cache - 音色目录缓存
//!
//! 状态只有两种：从未拉取（空），或由一次完整成功的拉取填充。
//! 并发的刷新请求合并为同一次远端拉取（single-flight）。

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use super::ports::{CatalogError, VoiceCatalogPort};
use crate::domain::VoiceRecord;

type FetchResult = Result<Arc<[VoiceRecord]>, CatalogError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// 目录缓存配置
#[derive(Debug, Clone)]
pub struct CatalogCacheConfig {
    /// 单次拉取超时
    pub fetch_timeout: Duration,
    /// 强制刷新失败且已有缓存时，是否返回旧数据而不是错误
    pub serve_stale_on_error: bool,
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            serve_stale_on_error: false,
        }
    }
}

/// 一次成功拉取得到的目录快照
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub voices: Arc<[VoiceRecord]>,
    pub fetched_at: DateTime<Utc>,
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub populated: bool,
    pub voice_count: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    /// 实际发起的远端拉取次数
    pub fetch_count: u64,
    pub in_flight: bool,
}

#[derive(Default)]
struct CacheState {
    snapshot: RwLock<Option<CatalogSnapshot>>,
    in_flight: Mutex<Option<SharedFetch>>,
    fetch_count: AtomicU64,
}

impl CacheState {
    // 锁内不执行可能 panic 的代码，中毒时直接取回数据
    fn snapshot(&self) -> RwLockReadGuard<'_, Option<CatalogSnapshot>> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn snapshot_mut(&self) -> RwLockWriteGuard<'_, Option<CatalogSnapshot>> {
        self.snapshot.write().unwrap_or_else(|e| e.into_inner())
    }

    fn in_flight(&self) -> MutexGuard<'_, Option<SharedFetch>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// 音色目录缓存
pub struct CatalogCache {
    catalog: Arc<dyn VoiceCatalogPort>,
    config: CatalogCacheConfig,
    state: Arc<CacheState>,
}

impl CatalogCache {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>, config: CatalogCacheConfig) -> Self {
        Self {
            catalog,
            config,
            state: Arc::new(CacheState::default()),
        }
    }

    /// 获取音色列表
    ///
    /// - 未强制刷新且已缓存：直接返回，不访问网络
    /// - 否则加入（或发起）唯一的一次远端拉取
    pub async fn get_voices(&self, force_refresh: bool) -> FetchResult {
        if !force_refresh {
            if let Some(snapshot) = self.snapshot() {
                tracing::debug!(count = snapshot.voices.len(), "Catalog cache hit");
                return Ok(snapshot.voices);
            }
        }

        match self.join_or_start_fetch().await {
            Ok(voices) => Ok(voices),
            Err(e) => match (self.config.serve_stale_on_error, self.snapshot()) {
                (true, Some(stale)) => {
                    tracing::warn!(
                        error = %e,
                        fetched_at = %stale.fetched_at,
                        "Catalog refresh failed, serving stale cache"
                    );
                    Ok(stale.voices)
                }
                _ => Err(e),
            },
        }
    }

    /// 当前快照（未拉取时为 None）
    pub fn snapshot(&self) -> Option<CatalogSnapshot> {
        self.state.snapshot().clone()
    }

    pub fn is_populated(&self) -> bool {
        self.state.snapshot().is_some()
    }

    /// 在缓存中按 id 查找音色；缓存为空时返回 None
    pub fn find(&self, voice_id: &str) -> Option<VoiceRecord> {
        self.state
            .snapshot()
            .as_ref()
            .and_then(|s| s.voices.iter().find(|v| v.id() == voice_id).cloned())
    }

    /// 清空缓存，下一次 get_voices 将重新拉取
    pub fn invalidate(&self) {
        if self.state.snapshot_mut().take().is_some() {
            tracing::info!("Voice catalog cache invalidated");
        }
    }

    pub fn stats(&self) -> CacheStats {
        let snapshot = self.state.snapshot();
        CacheStats {
            populated: snapshot.is_some(),
            voice_count: snapshot.as_ref().map_or(0, |s| s.voices.len()),
            fetched_at: snapshot.as_ref().map(|s| s.fetched_at),
            fetch_count: self.state.fetch_count.load(Ordering::Relaxed),
            in_flight: self.state.in_flight().is_some(),
        }
    }

    fn join_or_start_fetch(&self) -> SharedFetch {
        let mut slot = self.state.in_flight();
        if let Some(fetch) = slot.as_ref() {
            tracing::debug!("Joining in-flight catalog fetch");
            return fetch.clone();
        }

        let fetch = fetch_and_store(
            self.catalog.clone(),
            self.state.clone(),
            self.config.fetch_timeout,
        )
        .boxed()
        .shared();
        *slot = Some(fetch.clone());
        fetch
    }
}

/// 执行一次远端拉取，成功时整体替换快照；无论成败都清除 in-flight 标记
async fn fetch_and_store(
    catalog: Arc<dyn VoiceCatalogPort>,
    state: Arc<CacheState>,
    timeout: Duration,
) -> FetchResult {
    state.fetch_count.fetch_add(1, Ordering::Relaxed);
    tracing::info!(timeout = ?timeout, "Fetching voice catalog");

    let result = match tokio::time::timeout(timeout, catalog.fetch_voices()).await {
        Ok(result) => result,
        Err(_) => Err(CatalogError::Timeout(timeout)),
    };

    let outcome = match result {
        Ok(voices) => {
            let voices: Arc<[VoiceRecord]> = voices.into();
            *state.snapshot_mut() = Some(CatalogSnapshot {
                voices: voices.clone(),
                fetched_at: Utc::now(),
            });
            tracing::info!(count = voices.len(), "Voice catalog updated");
            Ok(voices)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Voice catalog fetch failed");
            Err(e)
        }
    };

    state.in_flight().take();
    outcome
}
