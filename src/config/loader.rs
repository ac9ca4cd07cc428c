//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, RuntimeKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "VOXGATE";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOXGATE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOXGATE_SERVER__PORT=8080`
/// - `VOXGATE_RUNTIME__KIND=fake`
/// - `VOXGATE_RUNTIME__URL=http://inference:8000`
/// - `VOXGATE_AUDIO__LONG_FORMAT=wav`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.request_timeout_secs", 300)?
        .set_default("catalog.path", "config.json")?
        .set_default("catalog.models_root", "models")?
        .set_default("runtime.kind", "http")?
        .set_default("runtime.url", "http://localhost:8000")?
        .set_default("runtime.timeout_secs", 120)?
        .set_default("runtime.max_retries", 0)?
        .set_default("runtime.sample_rate", 22050)?
        .set_default("synthesis.sentence_silence_ms", 200)?
        .set_default("synthesis.paragraph_silence_ms", 700)?
        .set_default("synthesis.max_sentence_chars", 250)?
        .set_default("audio.long_format", "opus")?
        .set_default("audio.bitrate", 32000)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.server.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Request timeout cannot be 0".to_string(),
        ));
    }

    if config.runtime.kind == RuntimeKind::Http && config.runtime.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Runtime URL cannot be empty".to_string(),
        ));
    }

    if config.runtime.kind == RuntimeKind::Fake && config.runtime.sample_rate == 0 {
        return Err(ConfigError::ValidationError(
            "Fake runtime sample rate cannot be 0".to_string(),
        ));
    }

    if config.synthesis.max_sentence_chars == 0 {
        return Err(ConfigError::ValidationError(
            "max_sentence_chars cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Request Timeout: {}s", config.server.request_timeout_secs);
    tracing::info!("Voice Catalog: {}", config.catalog.path.display());
    tracing::info!("Models Root: {}", config.catalog.models_root.display());
    match config.runtime.kind {
        RuntimeKind::Http => {
            tracing::info!("Runtime: http {}", config.runtime.url);
            tracing::info!("Runtime Timeout: {}s", config.runtime.timeout_secs);
        }
        RuntimeKind::Fake => {
            tracing::info!("Runtime: fake @ {}Hz", config.runtime.sample_rate);
        }
    }
    tracing::info!(
        "Silence: sentence {}ms, paragraph {}ms",
        config.synthesis.sentence_silence_ms,
        config.synthesis.paragraph_silence_ms
    );
    tracing::info!("Long-form Output: {} @ {}bps", config.audio.long_format, config.audio.bitrate);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::AudioFormat;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_request_timeout() {
        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_runtime_url() {
        let mut config = AppConfig::default();
        config.runtime.url = String::new();
        assert!(validate_config(&config).is_err());

        config.runtime.kind = RuntimeKind::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxgate.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9000
request_timeout_secs = 600

[runtime]
kind = "fake"
sample_rate = 16000

[audio]
long_format = "wav"
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.request_timeout_secs, 600);
        assert_eq!(config.runtime.kind, RuntimeKind::Fake);
        assert_eq!(config.runtime.sample_rate, 16000);
        assert_eq!(config.audio.long_format, AudioFormat::Wav);
        assert_eq!(config.synthesis.sentence_silence_ms, 200);
    }
}
