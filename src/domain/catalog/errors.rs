//! Catalog Context - Errors

use thiserror::Error;

use super::FieldType;

/// 配置错误
///
/// 启动阶段致命：任何一条出现都会中止进程
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config: {0}")]
    Unreadable(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(String),

    #[error("Configuration must be an object")]
    NotAnObject,

    #[error("Configuration must contain '{0}' section")]
    MissingSection(&'static str),

    #[error("Section '{section}' must be {expected}")]
    InvalidSection {
        section: &'static str,
        expected: &'static str,
    },

    #[error("Model {voice} must specify 'model_type'")]
    MissingModelType { voice: String },

    #[error("Unknown model_type '{model_type}' for model {voice}")]
    UnknownModelType { voice: String, model_type: String },

    #[error("Model {voice} missing required field: {field}")]
    MissingField { voice: String, field: String },

    #[error("Field '{field}' in model {voice} must be of type {expected}")]
    InvalidFieldType {
        voice: String,
        field: String,
        expected: FieldType,
    },

    #[error("Duplicate voice id: {0}")]
    DuplicateVoice(String),

    #[error("Language '{lang}' has more than one default voice: {}", voices.join(", "))]
    MultipleDefaults { lang: String, voices: Vec<String> },
}
