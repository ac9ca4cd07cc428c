//! Voice Context - 音色 / 语言解析
//!
//! 纯函数：同样的注册表与同样的输入总是给出同样的结果

use super::ResolutionError;

/// 只读音色目录视图（由 VoiceRegistry 实现）
pub trait VoiceDirectory {
    /// 音色所属语言，音色不存在时为 None
    fn voice_language(&self, voice: &str) -> Option<&str>;

    /// 语言的默认音色
    fn default_voice(&self, lang: &str) -> Option<&str>;
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub voice: String,
    pub lang: String,
}

/// 根据可选的 voice 与 lang 选择音色
///
/// 空字符串等同于未提供
pub fn resolve_voice(
    directory: &impl VoiceDirectory,
    voice: Option<&str>,
    lang: Option<&str>,
) -> Result<Resolution, ResolutionError> {
    let voice = voice.map(str::trim).filter(|v| !v.is_empty());
    let lang = lang.map(str::trim).filter(|l| !l.is_empty());

    match (voice, lang) {
        (None, None) => Err(ResolutionError::MissingSelector),
        (Some(voice), requested) => {
            let voice_lang = directory
                .voice_language(voice)
                .ok_or_else(|| ResolutionError::VoiceNotFound(voice.to_string()))?;

            match requested {
                Some(requested) if requested != voice_lang => {
                    Err(ResolutionError::VoiceLanguageMismatch {
                        voice: voice.to_string(),
                        voice_lang: voice_lang.to_string(),
                        requested: requested.to_string(),
                    })
                }
                _ => Ok(Resolution {
                    voice: voice.to_string(),
                    lang: voice_lang.to_string(),
                }),
            }
        }
        (None, Some(lang)) => {
            let voice = directory
                .default_voice(lang)
                .ok_or_else(|| ResolutionError::LanguageNotSupported(lang.to_string()))?;
            Ok(Resolution {
                voice: voice.to_string(),
                lang: lang.to_string(),
            })
        }
    }
}
