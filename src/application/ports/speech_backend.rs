//! Speech Backend Port - 合成后端抽象
//!
//! 每种引擎类型一个实现，统一 load / synthesize / sample_rate 契约

use async_trait::async_trait;

use crate::domain::audio::AudioSegment;
use crate::domain::voice::{ModelLoadError, SynthesisError};

/// Speech Backend Port
///
/// 生命周期：构造 -> `load()` 成功 -> 可并发调用 `synthesize()`。
/// `load()` 之前调用 `synthesize()` 返回 NotInitialized
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// 引擎类型标签
    fn engine_type(&self) -> &'static str;

    /// 音色 ID
    fn voice(&self) -> &str;

    /// 解析模型文件并初始化引擎
    async fn load(&mut self) -> Result<(), ModelLoadError>;

    /// 合成一段文本
    async fn synthesize(&self, text: &str) -> Result<AudioSegment, SynthesisError>;

    /// 加载时记录的原生采样率
    fn sample_rate(&self) -> Result<u32, ModelLoadError>;
}
