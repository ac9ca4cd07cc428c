//! Voice Registry - 已加载音色注册表
//!
//! 启动时通过 [`VoiceRegistryBuilder`] 构建，之后只读，
//! 以 `Arc<VoiceRegistry>` 在请求间共享，无需加锁

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::application::ports::SpeechBackend;
use crate::domain::catalog::LanguageCatalog;
use crate::domain::text::{normalize_for_synthesis, TextPreprocessor};
use crate::domain::voice::{ModelLoadError, VoiceDirectory};

/// 已加载的音色
pub struct LoadedVoice {
    pub id: String,
    pub lang: String,
    /// 语言显示名称（语言目录缺失时为 None）
    pub language_name: Option<String>,
    pub backend: Arc<dyn SpeechBackend>,
    pub preprocessor: Option<Arc<dyn TextPreprocessor>>,
    pub sample_rate: u32,
}

impl LoadedVoice {
    /// 语言预处理 + 通用规范化
    pub fn normalize(&self, text: &str) -> String {
        normalize_for_synthesis(text, self.preprocessor.as_deref())
    }
}

impl fmt::Debug for LoadedVoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedVoice")
            .field("id", &self.id)
            .field("lang", &self.lang)
            .field("language_name", &self.language_name)
            .field("engine", &self.backend.engine_type())
            .field("preprocessor", &self.preprocessor.is_some())
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

/// 音色注册表
///
/// 不变量：defaults 中的每个值都是 voices 的键
#[derive(Debug)]
pub struct VoiceRegistry {
    voices: BTreeMap<String, Arc<LoadedVoice>>,
    defaults: BTreeMap<String, String>,
    languages: LanguageCatalog,
}

impl VoiceRegistry {
    pub fn get(&self, voice: &str) -> Option<Arc<LoadedVoice>> {
        self.voices.get(voice).cloned()
    }

    /// 语言的默认音色 ID
    pub fn default_for(&self, lang: &str) -> Option<&str> {
        self.defaults.get(lang).map(|s| s.as_str())
    }

    pub fn is_default(&self, voice: &LoadedVoice) -> bool {
        self.default_for(&voice.lang) == Some(voice.id.as_str())
    }

    /// 按 ID 排序遍历
    pub fn voices(&self) -> impl Iterator<Item = &Arc<LoadedVoice>> {
        self.voices.values()
    }

    pub fn languages(&self) -> &LanguageCatalog {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

impl VoiceDirectory for VoiceRegistry {
    fn voice_language(&self, voice: &str) -> Option<&str> {
        self.voices.get(voice).map(|v| v.lang.as_str())
    }

    fn default_voice(&self, lang: &str) -> Option<&str> {
        self.default_for(lang)
    }
}

/// 注册表构建器
///
/// 默认音色规则：每种语言第一个加载成功的音色为默认，
/// 之后显式标记 default 的音色取而代之；多个显式标记时最后一个生效
#[derive(Debug, Default)]
pub struct VoiceRegistryBuilder {
    voices: BTreeMap<String, Arc<LoadedVoice>>,
    defaults: BTreeMap<String, String>,
    explicit: HashSet<String>,
    languages: LanguageCatalog,
}

impl VoiceRegistryBuilder {
    pub fn new(languages: LanguageCatalog) -> Self {
        Self {
            languages,
            ..Default::default()
        }
    }

    /// 加入一个音色，ID 重复时忽略并返回 false
    pub fn insert(&mut self, voice: LoadedVoice, flagged_default: bool) -> bool {
        if self.voices.contains_key(&voice.id) {
            tracing::warn!(voice = %voice.id, "Duplicate voice ignored");
            return false;
        }

        let lang = voice.lang.clone();
        let id = voice.id.clone();

        if flagged_default {
            if self.explicit.contains(&lang) {
                tracing::warn!(
                    lang = %lang,
                    previous = ?self.defaults.get(&lang),
                    voice = %id,
                    "Multiple default voices for language, last one wins"
                );
            }
            self.explicit.insert(lang.clone());
            self.defaults.insert(lang, id.clone());
        } else {
            self.defaults.entry(lang).or_insert_with(|| id.clone());
        }

        self.voices.insert(id, Arc::new(voice));
        true
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// 完成构建，没有任何音色时报错
    pub fn build(self) -> Result<VoiceRegistry, ModelLoadError> {
        if self.voices.is_empty() {
            return Err(ModelLoadError::NoModelsLoaded);
        }
        debug_assert!(self.defaults.values().all(|v| self.voices.contains_key(v)));

        Ok(VoiceRegistry {
            voices: self.voices,
            defaults: self.defaults,
            languages: self.languages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{loaded_voice, StubBackend};

    #[test]
    fn test_first_loaded_is_default() {
        let mut builder = VoiceRegistryBuilder::new(LanguageCatalog::new());
        builder.insert(loaded_voice(StubBackend::new("a", 16000), "ca"), false);
        builder.insert(loaded_voice(StubBackend::new("b", 16000), "ca"), false);
        let registry = builder.build().unwrap();

        assert_eq!(registry.default_for("ca"), Some("a"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_explicit_default_wins() {
        let mut builder = VoiceRegistryBuilder::new(LanguageCatalog::new());
        builder.insert(loaded_voice(StubBackend::new("a", 16000), "ca"), false);
        builder.insert(loaded_voice(StubBackend::new("b", 16000), "ca"), true);
        builder.insert(loaded_voice(StubBackend::new("c", 16000), "ca"), false);
        let registry = builder.build().unwrap();

        assert_eq!(registry.default_for("ca"), Some("b"));
    }

    #[test]
    fn test_last_explicit_default_wins() {
        let mut builder = VoiceRegistryBuilder::new(LanguageCatalog::new());
        builder.insert(loaded_voice(StubBackend::new("a", 16000), "ca"), true);
        builder.insert(loaded_voice(StubBackend::new("b", 16000), "ca"), true);
        let registry = builder.build().unwrap();

        assert_eq!(registry.default_for("ca"), Some("b"));
    }

    #[test]
    fn test_duplicate_is_ignored() {
        let mut builder = VoiceRegistryBuilder::new(LanguageCatalog::new());
        assert!(builder.insert(loaded_voice(StubBackend::new("a", 16000), "ca"), false));
        assert!(!builder.insert(loaded_voice(StubBackend::new("a", 22050), "lad"), true));
        let registry = builder.build().unwrap();

        assert_eq!(registry.get("a").unwrap().lang, "ca");
        assert_eq!(registry.default_for("lad"), None);
    }

    #[test]
    fn test_empty_build_fails() {
        let builder = VoiceRegistryBuilder::new(LanguageCatalog::new());
        assert!(matches!(builder.build(), Err(ModelLoadError::NoModelsLoaded)));
    }

    #[test]
    fn test_directory_view() {
        let mut builder = VoiceRegistryBuilder::new(LanguageCatalog::new());
        builder.insert(loaded_voice(StubBackend::new("karen", 16000), "lad"), false);
        let registry = builder.build().unwrap();

        assert_eq!(registry.voice_language("karen"), Some("lad"));
        assert_eq!(registry.default_voice("lad"), Some("karen"));
        assert_eq!(registry.voice_language("nope"), None);
    }
}
