//! Fake Adapters - 用于测试的端口实现
//!
//! 不访问网络和音频设备，行为可由测试控制

mod fake_catalog;
mod fake_player;
mod fake_tts_client;

pub use fake_catalog::FakeVoiceCatalog;
pub use fake_player::FakeAudioPlayer;
pub use fake_tts_client::FakeTtsClient;
