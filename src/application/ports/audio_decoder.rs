//! Audio Decoder Port - 合成片段解码抽象
//!
//! 长文本拼接前把后端返回的片段（WAV 或裸 PCM）统一解码为单声道样本

use crate::application::ports::TranscodeError;
use crate::domain::audio::AudioSegment;

/// 单声道 f32 样本
#[derive(Debug, Clone, PartialEq)]
pub struct MonoAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Audio Decoder Port
pub trait AudioDecoderPort: Send + Sync {
    /// 解码片段并下混为单声道，容器头不会出现在样本中
    fn decode_mono(&self, segment: &AudioSegment) -> Result<MonoAudio, TranscodeError>;
}
