//! Playback Adapter - 音频输出实现

mod null_player;
mod rodio_player;

pub use null_player::NullAudioPlayer;
pub use rodio_player::{RodioAudioPlayer, RodioPlayerConfig};
