//! Catalog Context - 音色目录限界上下文
//!
//! 职责:
//! - 音色 / 语言声明的强类型表示
//! - 引擎字段模式
//! - 启动前的一次性配置校验

mod declaration;
mod errors;
mod schema;
mod validator;

pub use declaration::{LanguageCatalog, VoiceCatalog, VoiceDeclaration};
pub use errors::ConfigurationError;
pub use schema::{EngineSchema, EngineSchemas, FieldType, COMMON_OPTIONAL_FIELDS};
pub use validator::validate_catalog;
