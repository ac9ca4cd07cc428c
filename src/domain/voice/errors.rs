//! Voice Context - Errors

use std::path::PathBuf;

use thiserror::Error;

/// 模型加载错误
///
/// 单个音色加载失败时记录并跳过；全部失败才升级为致命错误
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Model {voice}: required file not found: {}", path.display())]
    MissingResource { voice: String, path: PathBuf },

    #[error("Model {voice}: model directory not found at {}", path.display())]
    MissingDirectory { voice: String, path: PathBuf },

    #[error("Model {voice}: failed to read {}: {reason}", path.display())]
    InvalidResource {
        voice: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Model {voice}: cannot initialize engine ({reason})")]
    Initialization { voice: String, reason: String },

    #[error("Model {0} not loaded. Call load() first")]
    NotLoaded(String),

    #[error("No models were successfully loaded")]
    NoModelsLoaded,
}

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Synthesizer for {0} not initialized. Call load() first")]
    NotInitialized(String),

    #[error("Inference failed for {voice}: {reason}")]
    Inference { voice: String, reason: String },

    #[error("Invalid audio from {voice}: {reason}")]
    InvalidAudio { voice: String, reason: String },
}

/// 音色 / 语言选择失败
///
/// 全部属于客户端错误（4xx）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Must specify voice or language")]
    MissingSelector,

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Voice {voice} is not available for language {requested} (voice language: {voice_lang})")]
    VoiceLanguageMismatch {
        voice: String,
        voice_lang: String,
        requested: String,
    },

    #[error("Language not supported: {0}")]
    LanguageNotSupported(String),
}
