//! 文本预处理器
//!
//! 预处理器按 (语言, 名称) 注册，声明里不写名称时用 [`DEFAULT_PREPROCESSOR`]

use std::collections::HashMap;
use std::sync::Arc;

use super::languages::{Catalan, Ladino};
use super::rules::RulePreprocessor;

/// 未指定名称时使用的预处理器名
pub const DEFAULT_PREPROCESSOR: &str = "preprocessor";

/// 语言相关的文本预处理
pub trait TextPreprocessor: Send + Sync {
    fn preprocess(&self, text: &str) -> String;
}

impl<F> TextPreprocessor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn preprocess(&self, text: &str) -> String {
        self(text)
    }
}

/// 预处理器注册表
#[derive(Clone, Default)]
pub struct PreprocessorRegistry {
    table: HashMap<(String, String), Arc<dyn TextPreprocessor>>,
}

impl PreprocessorRegistry {
    /// 空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 带内置预处理器（lad、ca）
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("lad", DEFAULT_PREPROCESSOR, Arc::new(RulePreprocessor::new(Ladino)));
        registry.register("ca", DEFAULT_PREPROCESSOR, Arc::new(RulePreprocessor::new(Catalan)));
        registry
    }

    pub fn register(
        &mut self,
        lang: impl Into<String>,
        name: impl Into<String>,
        preprocessor: Arc<dyn TextPreprocessor>,
    ) {
        self.table.insert((lang.into(), name.into()), preprocessor);
    }

    /// 查找预处理器，`name` 为空时取默认名
    pub fn lookup(&self, lang: &str, name: Option<&str>) -> Option<Arc<dyn TextPreprocessor>> {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_PREPROCESSOR);
        self.table
            .get(&(lang.to_string(), name.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl std::fmt::Debug for PreprocessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<String> = self
            .table
            .keys()
            .map(|(lang, name)| format!("{}/{}", lang, name))
            .collect();
        keys.sort();
        f.debug_struct("PreprocessorRegistry")
            .field("preprocessors", &keys)
            .finish()
    }
}
