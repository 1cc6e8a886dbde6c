//! Domain Layer - 领域层
//!
//! Voice Context: 音色记录与筛选规则

pub mod voice;

pub use voice::{filter_voices, locale_from_voice_id, AudioFormat, Gender, VoiceCriteria, VoiceRecord};
