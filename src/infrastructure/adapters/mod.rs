//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod catalog;
pub mod fake;
pub mod playback;
pub mod tts;

pub use catalog::*;
pub use fake::*;
pub use playback::*;
pub use tts::*;
