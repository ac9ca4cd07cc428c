//! Data Transfer Objects

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::{LanguageVoices, VoiceListing, VoiceSummary};
use crate::domain::voice::Resolution;

// ============================================================================
// 错误响应
// ============================================================================

/// 失败时的响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

// ============================================================================
// Synthesis DTOs
// ============================================================================

/// POST /api/short 请求体，也用于 GET /api/tts 的查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ShortRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
    pub lang: Option<String>,
}

/// POST /api/long 请求体
#[derive(Debug, Default, Deserialize)]
pub struct LongRequest {
    #[serde(default)]
    pub text_paragraphs: Vec<String>,
    pub voice: Option<String>,
    pub lang: Option<String>,
}

// ============================================================================
// Voice DTOs
// ============================================================================

/// POST /api/check 请求体
#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    pub voice: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResponse {
    pub voice: String,
    pub lang: String,
}

impl From<Resolution> for CheckResponse {
    fn from(r: Resolution) -> Self {
        Self {
            voice: r.voice,
            lang: r.lang,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceEntry {
    pub default: bool,
    pub framerate: u32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageEntry {
    /// 语言显示名称，语言目录中没有时用语言代码
    pub name: String,
    pub voices: BTreeMap<String, VoiceEntry>,
}

/// GET /api/voices 响应体：语言代码 -> 语言条目
pub type VoicesResponse = BTreeMap<String, LanguageEntry>;

impl From<VoiceSummary> for VoiceEntry {
    fn from(v: VoiceSummary) -> Self {
        Self {
            default: v.default,
            framerate: v.framerate,
        }
    }
}

impl LanguageEntry {
    pub fn new(lang: &str, l: LanguageVoices) -> Self {
        Self {
            name: l.name.unwrap_or_else(|| lang.to_string()),
            voices: l.voices.into_iter().map(|(id, v)| (id, v.into())).collect(),
        }
    }
}

pub fn voices_response(listing: VoiceListing) -> VoicesResponse {
    listing
        .into_iter()
        .map(|(lang, l)| {
            let entry = LanguageEntry::new(&lang, l);
            (lang, entry)
        })
        .collect()
}

// ============================================================================
// Ping
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
    pub version: String,
    pub voices: usize,
}
