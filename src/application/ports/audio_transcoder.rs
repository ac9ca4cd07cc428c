//! Audio Transcoder Port - 音频转码抽象
//!
//! 长文本合成结果的输出编码：WAV 或 Opus (OGG 容器)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::audio::AudioSegment;

/// 转码错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// 音频输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// 原始 WAV，不压缩
    Wav,
    /// Opus (OGG 容器)
    #[default]
    Opus,
}

impl AudioFormat {
    /// HTTP Content-Type
    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Opus => "audio/ogg",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Wav => write!(f, "wav"),
            AudioFormat::Opus => write!(f, "opus"),
        }
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wav" => Ok(AudioFormat::Wav),
            "opus" | "ogg" => Ok(AudioFormat::Opus),
            _ => Err(TranscodeError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// 转码配置
#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    /// 输出格式
    pub format: AudioFormat,
    /// 目标比特率（bps），仅对 Opus 生效
    pub bitrate: Option<u32>,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            format: AudioFormat::Opus,
            bitrate: Some(32000), // 32kbps，语音足够
        }
    }
}

/// 转码结果
#[derive(Debug, Clone)]
pub struct TranscodeResult {
    pub audio_data: Vec<u8>,
    pub format: AudioFormat,
    pub duration_ms: u64,
    pub sample_rate: u32,
    pub original_size: usize,
    pub transcoded_size: usize,
}

/// Audio Transcoder Port
#[async_trait]
pub trait AudioTranscoderPort: Send + Sync {
    /// 把音频片段编码为目标格式
    async fn transcode(
        &self,
        segment: AudioSegment,
        config: &TranscodeConfig,
    ) -> Result<TranscodeResult, TranscodeError>;

    /// 检查是否支持指定格式
    fn supports_format(&self, format: AudioFormat) -> bool;
}
