//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::TranscodeError;
use crate::domain::voice::{ResolutionError, SynthesisError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 文本为空（或规范化后为空）
    #[error("Text must not be empty")]
    EmptyText,

    /// 音色 / 语言选择失败
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// 合成失败
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// 输出编码失败
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}
