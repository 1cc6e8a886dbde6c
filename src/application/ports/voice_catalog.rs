//! Voice Catalog Port - 远端音色目录抽象
//!
//! 具体实现在 infrastructure/adapters/catalog

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::VoiceRecord;

/// 目录拉取错误
///
/// 需要 Clone：同一次拉取的结果会分发给所有并发等待者
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Catalog fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Service error: HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Voice Catalog Port
///
/// 返回一次完整拉取的目录；实现方负责在边界处把远端记录规范化为 VoiceRecord
#[async_trait]
pub trait VoiceCatalogPort: Send + Sync {
    async fn fetch_voices(&self) -> Result<Vec<VoiceRecord>, CatalogError>;
}
