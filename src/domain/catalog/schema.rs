//! Catalog Context - 引擎字段模式
//!
//! 每种引擎类型声明自己的必填字段和可选字段类型，
//! 由 BackendFactory 注册，校验器据此检查声明

use std::collections::BTreeMap;
use std::fmt;

/// 可选字段的基本类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Bool,
}

impl FieldType {
    /// 检查 JSON 值是否匹配该类型
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            FieldType::Str => value.is_string(),
            FieldType::Bool => value.is_boolean(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Str => write!(f, "str"),
            FieldType::Bool => write!(f, "bool"),
        }
    }
}

/// 所有引擎共享的可选字段
pub const COMMON_OPTIONAL_FIELDS: &[(&str, FieldType)] = &[
    ("preprocessor", FieldType::Str),
    ("use_cuda", FieldType::Bool),
    ("load", FieldType::Bool),
    ("default", FieldType::Bool),
];

/// 单个引擎类型的字段模式
#[derive(Debug, Clone, Default)]
pub struct EngineSchema {
    /// 必填字段
    pub required: Vec<&'static str>,
    /// 可选字段及期望类型（不含公共字段）
    pub optional: Vec<(&'static str, FieldType)>,
}

impl EngineSchema {
    pub fn new(required: &[&'static str]) -> Self {
        Self {
            required: required.to_vec(),
            optional: Vec::new(),
        }
    }

    pub fn optional(mut self, field: &'static str, field_type: FieldType) -> Self {
        self.optional.push((field, field_type));
        self
    }

    /// 可选字段（引擎特有 + 公共）
    pub fn optional_fields(&self) -> impl Iterator<Item = &(&'static str, FieldType)> {
        self.optional.iter().chain(COMMON_OPTIONAL_FIELDS.iter())
    }
}

/// 已注册引擎类型 -> 字段模式
#[derive(Debug, Clone, Default)]
pub struct EngineSchemas(BTreeMap<String, EngineSchema>);

impl EngineSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model_type: impl Into<String>, schema: EngineSchema) {
        self.0.insert(model_type.into(), schema);
    }

    pub fn get(&self, model_type: &str) -> Option<&EngineSchema> {
        self.0.get(model_type)
    }

    pub fn contains(&self, model_type: &str) -> bool {
        self.0.contains_key(model_type)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}
