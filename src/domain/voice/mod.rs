//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 音色记录的规范化表示
//! - 按语言/性别筛选音色

mod filter;
mod value_objects;

pub use filter::{filter_voices, VoiceCriteria};
pub use value_objects::{locale_from_voice_id, AudioFormat, Gender, VoiceRecord};
