//! Inference Runtime Port - 神经推理运行时抽象
//!
//! 模型数学计算不在本服务内实现，由运行时负责：
//! 后端把解析好的模型文件交给运行时初始化出一个引擎，再逐句推理

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// 运行时错误
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Runtime error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unsupported engine family: {0}")]
    UnsupportedFamily(String),
}

/// 引擎初始化参数
#[derive(Debug, Clone)]
pub struct EngineInit {
    /// 音色 ID（用于日志和追踪）
    pub voice: String,
    /// 引擎类型标签（coqui / mms / ...）
    pub family: String,
    /// 已解析并确认存在的模型文件，键为声明中的字段名
    pub files: BTreeMap<String, PathBuf>,
    /// 是否使用加速器
    pub use_accelerator: bool,
}

/// 推理得到的单声道波形
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// 一个已初始化的推理引擎
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// 合成一段文本
    async fn infer(&self, text: &str) -> Result<Waveform, RuntimeError>;

    /// 引擎的原生输出采样率（未知时为 None）
    fn output_sample_rate(&self) -> Option<u32>;

    /// 是否允许并发调用
    fn is_reentrant(&self) -> bool {
        true
    }
}

/// Inference Runtime Port
#[async_trait]
pub trait InferenceRuntime: Send + Sync {
    /// 初始化引擎
    async fn initialize(&self, init: EngineInit) -> Result<Arc<dyn InferenceEngine>, RuntimeError>;

    /// 检查运行时是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
