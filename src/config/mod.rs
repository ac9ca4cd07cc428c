//! Configuration Module
//!
//! 服务配置支持多层级来源：
//! - 环境变量（最高优先级）
//! - 配置文件（TOML 格式）
//! - 默认值（最低优先级）
//!
//! 音色目录是独立的 JSON 文档，由 catalog_loader 读取

mod catalog_loader;
mod loader;
mod types;

pub use catalog_loader::{load_catalog, EnvOverrides};
pub use loader::{load_config, load_config_from_path, print_config, ConfigError};
pub use types::{
    AppConfig, AudioConfig, CatalogConfig, LogConfig, RuntimeConfig, RuntimeKind, ServerConfig,
    SynthesisConfig,
};
