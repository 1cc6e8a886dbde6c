//! TTS Adapter - HTTP 语音合成客户端实现

mod http_tts_client;

pub use http_tts_client::*;
