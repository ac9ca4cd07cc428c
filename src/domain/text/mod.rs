//! Text - 文本规范化
//!
//! - 语言预处理器（规则引擎 + 语言规则表）
//! - 通用规范化
//! - 长文本的句子切分

pub mod languages;
pub mod numerals;
mod normalizer;
mod preprocessor;
pub mod rules;
mod segmenter;

pub use normalizer::{normalize_for_synthesis, universal_normalize, SENTENCE_TERMINATORS};
pub use preprocessor::{PreprocessorRegistry, TextPreprocessor, DEFAULT_PREPROCESSOR};
pub use rules::{LanguageRules, RulePreprocessor};
pub use segmenter::{split_sentences, SegmentConfig, DEFAULT_MAX_CHARS};
