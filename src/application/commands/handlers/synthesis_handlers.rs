//! Synthesis Command Handlers

use std::sync::Arc;

use crate::application::commands::{SynthesizeLong, SynthesizeShort};
use crate::application::error::ApplicationError;
use crate::application::long_form::{LongFormStats, LongFormSynthesizer};
use crate::application::ports::{AudioTranscoderPort, TranscodeConfig, TranscodeResult};
use crate::application::registry::{LoadedVoice, VoiceRegistry};
use crate::domain::audio::AudioSegment;
use crate::domain::voice::resolve_voice;

/// 解析音色，整个请求只解析一次
fn resolve(
    registry: &VoiceRegistry,
    voice: Option<&str>,
    lang: Option<&str>,
) -> Result<Arc<LoadedVoice>, ApplicationError> {
    let resolution = resolve_voice(registry, voice, lang)?;
    registry.get(&resolution.voice).ok_or_else(|| {
        ApplicationError::internal(format!("resolved voice {} missing from registry", resolution.voice))
    })
}

// ============================================================================
// SynthesizeShort
// ============================================================================

/// 短文本合成响应
#[derive(Debug, Clone)]
pub struct SynthesizeShortResponse {
    pub voice: String,
    pub lang: String,
    /// 完整 WAV 容器
    pub wav: Vec<u8>,
    pub duration_ms: u64,
}

/// SynthesizeShort Handler
pub struct SynthesizeShortHandler {
    registry: Arc<VoiceRegistry>,
}

impl SynthesizeShortHandler {
    pub fn new(registry: Arc<VoiceRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, command: SynthesizeShort) -> Result<SynthesizeShortResponse, ApplicationError> {
        if command.text.trim().is_empty() {
            return Err(ApplicationError::EmptyText);
        }

        let voice = resolve(&self.registry, command.voice.as_deref(), command.lang.as_deref())?;

        let text = voice.normalize(&command.text);
        if text.is_empty() {
            return Err(ApplicationError::EmptyText);
        }

        tracing::debug!(voice = %voice.id, lang = %voice.lang, text = %text, "Synthesizing short text");

        let segment: AudioSegment = voice.backend.synthesize(&text).await?;
        let duration_ms = segment.duration_ms();

        tracing::info!(
            voice = %voice.id,
            chars = text.chars().count(),
            duration_ms = duration_ms,
            "Short synthesis completed"
        );

        Ok(SynthesizeShortResponse {
            voice: voice.id.clone(),
            lang: voice.lang.clone(),
            wav: segment.into_wav(),
            duration_ms,
        })
    }
}

// ============================================================================
// SynthesizeLong
// ============================================================================

/// 长文本合成响应
#[derive(Debug, Clone)]
pub struct SynthesizeLongResponse {
    pub voice: String,
    pub lang: String,
    pub audio: TranscodeResult,
    pub stats: LongFormStats,
}

/// SynthesizeLong Handler
pub struct SynthesizeLongHandler {
    registry: Arc<VoiceRegistry>,
    synthesizer: Arc<LongFormSynthesizer>,
    transcoder: Arc<dyn AudioTranscoderPort>,
    transcode_config: TranscodeConfig,
}

impl SynthesizeLongHandler {
    pub fn new(
        registry: Arc<VoiceRegistry>,
        synthesizer: Arc<LongFormSynthesizer>,
        transcoder: Arc<dyn AudioTranscoderPort>,
        transcode_config: TranscodeConfig,
    ) -> Self {
        Self {
            registry,
            synthesizer,
            transcoder,
            transcode_config,
        }
    }

    pub async fn handle(&self, command: SynthesizeLong) -> Result<SynthesizeLongResponse, ApplicationError> {
        if command.paragraphs.iter().all(|p| p.trim().is_empty()) {
            return Err(ApplicationError::EmptyText);
        }

        let voice = resolve(&self.registry, command.voice.as_deref(), command.lang.as_deref())?;

        let (segment, stats) = self.synthesizer.synthesize(&command.paragraphs, &voice).await;
        let audio = self.transcoder.transcode(segment, &self.transcode_config).await?;

        tracing::info!(
            voice = %voice.id,
            format = %audio.format,
            duration_ms = audio.duration_ms,
            size = audio.transcoded_size,
            "Long synthesis completed"
        );

        Ok(SynthesizeLongResponse {
            voice: voice.id.clone(),
            lang: voice.lang.clone(),
            audio,
            stats,
        })
    }
}
