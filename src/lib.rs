//! Voxgate - 多音色 TTS 前端服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Catalog Context: 音色 / 语言声明与校验
//! - Voice Context: 音色解析与错误
//! - Text: 语言预处理、通用规范化、分句
//! - Audio: 音频片段与 PCM 拼接
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechBackend, InferenceRuntime, AudioTranscoder）
//! - Registry / Loader: 音色注册表与启动加载
//! - Commands: 短文本 / 长文本合成
//! - Queries: 音色列表与解析检查
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: coqui / mms 后端、推理运行时、音频转码

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
