//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::{AudioFormat, TranscodeConfig};
use crate::application::LongFormConfig;
use crate::domain::text::SegmentConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 音色目录配置
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// 推理运行时配置
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// 长文本合成配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 音频输出配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 单个请求的超时时间（秒），长文本合成需要足够长
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 音色目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// 音色文档路径（环境变量 TTS_API_CONFIG 优先）
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,

    /// 模型根目录（文档中的 models_root 与环境变量 MODELS_ROOT 优先）
    #[serde(default = "default_models_root")]
    pub models_root: PathBuf,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("config.json")
}

fn default_models_root() -> PathBuf {
    PathBuf::from("models")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            models_root: default_models_root(),
        }
    }
}

/// 推理运行时类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    /// 外部推理 sidecar
    #[default]
    Http,
    /// 确定性的假运行时（开发 / 测试）
    Fake,
}

/// 推理运行时配置
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub kind: RuntimeKind,

    /// Sidecar 基础 URL
    #[serde(default = "default_runtime_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_runtime_timeout")]
    pub timeout_secs: u64,

    /// 最大重试次数
    #[serde(default)]
    pub max_retries: u32,

    /// Fake 运行时的输出采样率
    #[serde(default = "default_fake_sample_rate")]
    pub sample_rate: u32,
}

fn default_runtime_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_runtime_timeout() -> u64 {
    120
}

fn default_fake_sample_rate() -> u32 {
    22050
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            kind: RuntimeKind::default(),
            url: default_runtime_url(),
            timeout_secs: default_runtime_timeout(),
            max_retries: 0,
            sample_rate: default_fake_sample_rate(),
        }
    }
}

/// 长文本合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 句间静音（毫秒）
    #[serde(default = "default_sentence_silence")]
    pub sentence_silence_ms: u32,

    /// 段间静音（毫秒）
    #[serde(default = "default_paragraph_silence")]
    pub paragraph_silence_ms: u32,

    /// 超过该长度的句子在弱分隔符处再切分
    #[serde(default = "default_max_sentence_chars")]
    pub max_sentence_chars: usize,
}

fn default_sentence_silence() -> u32 {
    crate::application::long_form::DEFAULT_SENTENCE_SILENCE_MS
}

fn default_paragraph_silence() -> u32 {
    crate::application::long_form::DEFAULT_PARAGRAPH_SILENCE_MS
}

fn default_max_sentence_chars() -> usize {
    crate::domain::text::DEFAULT_MAX_CHARS
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            sentence_silence_ms: default_sentence_silence(),
            paragraph_silence_ms: default_paragraph_silence(),
            max_sentence_chars: default_max_sentence_chars(),
        }
    }
}

impl SynthesisConfig {
    pub fn long_form_config(&self) -> LongFormConfig {
        LongFormConfig {
            sentence_silence_ms: self.sentence_silence_ms,
            paragraph_silence_ms: self.paragraph_silence_ms,
            segment: SegmentConfig {
                max_chars: self.max_sentence_chars,
                ..SegmentConfig::default()
            },
        }
    }
}

/// 音频输出配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 长文本输出格式: opus, wav
    #[serde(default)]
    pub long_format: AudioFormat,

    /// 目标比特率（bps），仅对 Opus 生效
    #[serde(default = "default_bitrate")]
    pub bitrate: u32,
}

fn default_bitrate() -> u32 {
    32000 // 32kbps，语音足够
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            long_format: AudioFormat::default(),
            bitrate: default_bitrate(),
        }
    }
}

impl AudioConfig {
    pub fn transcode_config(&self) -> TranscodeConfig {
        TranscodeConfig {
            format: self.long_format,
            bitrate: Some(self.bitrate),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.server.request_timeout(), Duration::from_secs(300));
        assert_eq!(config.runtime.kind, RuntimeKind::Http);
        assert_eq!(config.catalog.path, PathBuf::from("config.json"));
        assert_eq!(config.catalog.models_root, PathBuf::from("models"));
        assert_eq!(config.audio.long_format, AudioFormat::Opus);
    }

    #[test]
    fn test_long_form_config() {
        let synthesis = SynthesisConfig {
            sentence_silence_ms: 100,
            paragraph_silence_ms: 500,
            max_sentence_chars: 80,
        };
        let config = synthesis.long_form_config();
        assert_eq!(config.sentence_silence_ms, 100);
        assert_eq!(config.paragraph_silence_ms, 500);
        assert_eq!(config.segment.max_chars, 80);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"runtime": {"kind": "fake"}}"#).unwrap();
        assert_eq!(config.runtime.kind, RuntimeKind::Fake);
        assert_eq!(config.runtime.sample_rate, 22050);
        assert_eq!(config.synthesis.paragraph_silence_ms, 700);
    }
}
