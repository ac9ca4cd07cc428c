//! Voice Queries

/// 列出所有已加载音色（按语言分组）
#[derive(Debug, Clone)]
pub struct ListVoices;

/// 检查 voice / lang 组合会解析到哪个音色
#[derive(Debug, Clone)]
pub struct CheckVoice {
    pub voice: Option<String>,
    pub lang: Option<String>,
}
