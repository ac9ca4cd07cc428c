//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 加载 / 合成 / 解析的错误分类
//! - 音色与语言的解析协议

mod errors;
mod resolution;

pub use errors::{ModelLoadError, ResolutionError, SynthesisError};
pub use resolution::{resolve_voice, Resolution, VoiceDirectory};
