//! Catalog Context - 声明模型

use std::collections::BTreeMap;

/// 音色声明
///
/// 不变量:
/// - voice 在整个文档内唯一
/// - model_type 必须是已注册的引擎类型
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceDeclaration {
    pub voice: String,
    pub lang: String,
    pub model_type: String,
    /// 语言预处理器名称（None 表示约定的 `preprocessor`）
    pub preprocessor: Option<String>,
    pub use_cuda: bool,
    /// 是否为该语言的默认音色
    pub default: bool,
    /// 启动时是否加载
    pub load: bool,
    /// 引擎特有的字符串字段（模型路径等）
    fields: BTreeMap<String, String>,
}

impl VoiceDeclaration {
    pub fn new(
        voice: impl Into<String>,
        lang: impl Into<String>,
        model_type: impl Into<String>,
    ) -> Self {
        Self {
            voice: voice.into(),
            lang: lang.into(),
            model_type: model_type.into(),
            preprocessor: None,
            use_cuda: false,
            default: false,
            load: false,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn loaded(mut self) -> Self {
        self.load = true;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// 读取引擎字段，空字符串视为未设置
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// 语言代码 -> 显示名称
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageCatalog(BTreeMap<String, String>);

impl LanguageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.0.insert(code.into(), name.into());
        self
    }

    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.0.insert(code.into(), name.into());
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(|s| s.as_str())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 校验后的完整音色目录
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    pub languages: LanguageCatalog,
    /// 模型根目录（文档或环境变量中声明时）
    pub models_root: Option<String>,
    pub voices: Vec<VoiceDeclaration>,
}
