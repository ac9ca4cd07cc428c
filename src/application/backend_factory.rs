//! Backend Factory - 引擎类型注册表
//!
//! 引擎类型标签 -> (构造函数, 字段模式)。
//! 校验器使用同一份模式，因此两者认可的标签集合永远一致

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{InferenceRuntime, SpeechBackend};
use crate::domain::catalog::{ConfigurationError, EngineSchema, EngineSchemas, VoiceDeclaration};

/// 构造后端所需的共享上下文
#[derive(Clone)]
pub struct BackendContext {
    /// 模型根目录，声明中的相对路径基于此解析
    pub models_root: PathBuf,
    /// 推理运行时
    pub runtime: Arc<dyn InferenceRuntime>,
}

impl BackendContext {
    pub fn new(models_root: impl Into<PathBuf>, runtime: Arc<dyn InferenceRuntime>) -> Self {
        Self {
            models_root: models_root.into(),
            runtime,
        }
    }

    /// 把声明中的路径解析为绝对路径（已是绝对路径时原样返回）
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.models_root.join(path)
        }
    }
}

impl fmt::Debug for BackendContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendContext")
            .field("models_root", &self.models_root)
            .finish_non_exhaustive()
    }
}

/// 后端构造函数
pub type BackendConstructor =
    Arc<dyn Fn(&VoiceDeclaration, &BackendContext) -> Box<dyn SpeechBackend> + Send + Sync>;

/// Backend Factory
pub struct BackendFactory {
    context: BackendContext,
    constructors: HashMap<String, BackendConstructor>,
    schemas: EngineSchemas,
}

impl BackendFactory {
    pub fn new(context: BackendContext) -> Self {
        Self {
            context,
            constructors: HashMap::new(),
            schemas: EngineSchemas::new(),
        }
    }

    /// 注册引擎类型（同名标签会被覆盖）
    pub fn register<F>(&mut self, tag: impl Into<String>, schema: EngineSchema, constructor: F)
    where
        F: Fn(&VoiceDeclaration, &BackendContext) -> Box<dyn SpeechBackend> + Send + Sync + 'static,
    {
        let tag = tag.into();
        tracing::debug!(model_type = %tag, "Backend registered");
        self.schemas.insert(tag.clone(), schema);
        self.constructors.insert(tag, Arc::new(constructor));
    }

    /// 按声明创建（未加载的）后端
    pub fn create_model(
        &self,
        declaration: &VoiceDeclaration,
    ) -> Result<Box<dyn SpeechBackend>, ConfigurationError> {
        if declaration.model_type.trim().is_empty() {
            return Err(ConfigurationError::MissingModelType {
                voice: declaration.voice.clone(),
            });
        }

        let constructor = self.constructors.get(&declaration.model_type).ok_or_else(|| {
            ConfigurationError::UnknownModelType {
                voice: declaration.voice.clone(),
                model_type: declaration.model_type.clone(),
            }
        })?;

        Ok(constructor(declaration, &self.context))
    }

    /// 已注册引擎的字段模式（供校验器使用）
    pub fn schemas(&self) -> &EngineSchemas {
        &self.schemas
    }

    pub fn context(&self) -> &BackendContext {
        &self.context
    }

    /// 替换模型根目录（音色文档读取之后才确定）
    pub fn set_models_root(&mut self, models_root: impl Into<PathBuf>) {
        self.context.models_root = models_root.into();
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }
}

impl fmt::Debug for BackendFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendFactory")
            .field("context", &self.context)
            .field("tags", &self.schemas.tags().collect::<Vec<_>>())
            .finish()
    }
}
