//! edge-voice - 远端音色选择、语音合成与播放
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: VoiceRecord、VoiceCriteria、筛选规则
//!
//! 应用层 (application/):
//! - Ports: VoiceCatalogPort, SpeechSynthesisPort, AudioPlayerPort
//! - CatalogCache / SelectionState / SynthesisEngine
//! - VoiceProvider: 对外门面
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP 目录客户端、HTTP 合成客户端、rodio 播放器、测试用 Fake

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{ProviderError, VoiceProvider, VoiceProviderConfig};
pub use config::{load_config, AppConfig};
pub use domain::{Gender, VoiceCriteria, VoiceRecord};
