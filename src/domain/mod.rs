//! Domain Layer - 领域层
//!
//! - Catalog: 音色声明与校验
//! - Voice: 音色解析与加载错误
//! - Text: 文本规范化
//! - Audio: 音频片段与拼接

pub mod audio;
pub mod catalog;
pub mod text;
pub mod voice;
