//! Voice Query Handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::queries::{CheckVoice, ListVoices};
use crate::application::registry::VoiceRegistry;
use crate::domain::voice::{resolve_voice, Resolution};

// ============================================================================
// Response DTOs
// ============================================================================

/// 单个音色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSummary {
    pub default: bool,
    pub framerate: u32,
}

/// 一种语言下的音色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageVoices {
    /// 语言显示名称（未在语言目录中声明时为 None）
    pub name: Option<String>,
    pub voices: BTreeMap<String, VoiceSummary>,
}

/// 语言代码 -> 音色列表
pub type VoiceListing = BTreeMap<String, LanguageVoices>;

// ============================================================================
// Handlers
// ============================================================================

/// ListVoices Handler
pub struct ListVoicesHandler {
    registry: Arc<VoiceRegistry>,
}

impl ListVoicesHandler {
    pub fn new(registry: Arc<VoiceRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, _query: ListVoices) -> Result<VoiceListing, ApplicationError> {
        let mut listing = VoiceListing::new();

        for voice in self.registry.voices() {
            let entry = listing
                .entry(voice.lang.clone())
                .or_insert_with(|| LanguageVoices {
                    name: voice.language_name.clone(),
                    voices: BTreeMap::new(),
                });
            entry.voices.insert(
                voice.id.clone(),
                VoiceSummary {
                    default: self.registry.is_default(voice),
                    framerate: voice.sample_rate,
                },
            );
        }

        Ok(listing)
    }
}

/// CheckVoice Handler
pub struct CheckVoiceHandler {
    registry: Arc<VoiceRegistry>,
}

impl CheckVoiceHandler {
    pub fn new(registry: Arc<VoiceRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, query: CheckVoice) -> Result<Resolution, ApplicationError> {
        Ok(resolve_voice(
            self.registry.as_ref(),
            query.voice.as_deref(),
            query.lang.as_deref(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::registry::VoiceRegistryBuilder;
    use crate::application::test_support::{loaded_voice, StubBackend};
    use crate::domain::catalog::LanguageCatalog;
    use crate::domain::voice::ResolutionError;

    fn registry() -> Arc<VoiceRegistry> {
        let mut builder = VoiceRegistryBuilder::new(LanguageCatalog::new());
        let mut karen = loaded_voice(StubBackend::new("karen", 16000), "lad");
        karen.language_name = Some("Ladino".to_string());
        builder.insert(karen, false);
        builder.insert(loaded_voice(StubBackend::new("pau", 22050), "ca"), false);
        builder.insert(loaded_voice(StubBackend::new("anna", 22050), "ca"), true);
        Arc::new(builder.build().unwrap())
    }

    #[tokio::test]
    async fn test_list_voices_groups_by_language() {
        let listing = ListVoicesHandler::new(registry())
            .handle(ListVoices)
            .await
            .unwrap();

        assert_eq!(listing.len(), 2);
        assert_eq!(listing["lad"].name.as_deref(), Some("Ladino"));
        assert_eq!(
            listing["lad"].voices["karen"],
            VoiceSummary {
                default: true,
                framerate: 16000
            }
        );
        assert!(listing["ca"].voices["anna"].default);
        assert!(!listing["ca"].voices["pau"].default);
        assert_eq!(listing["ca"].name, None);
    }

    #[tokio::test]
    async fn test_check_voice() {
        let handler = CheckVoiceHandler::new(registry());

        let resolution = handler
            .handle(CheckVoice {
                voice: None,
                lang: Some("ca".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(resolution.voice, "anna");

        let err = handler
            .handle(CheckVoice {
                voice: Some("karen".to_string()),
                lang: Some("ca".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Resolution(ResolutionError::VoiceLanguageMismatch { .. })
        ));
    }
}
