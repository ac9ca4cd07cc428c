//! Long-Form Synthesis - 长文本合成
//!
//! 段落 -> 句子 -> 逐句规范化与合成 -> PCM 拼接（句间 / 段间静音）。
//! 单句失败只记录日志，不影响其余句子

use std::fmt;
use std::sync::Arc;

use crate::application::ports::AudioDecoderPort;
use crate::application::registry::LoadedVoice;
use crate::domain::audio::{AudioSegment, PcmBuffer};
use crate::domain::text::{split_sentences, SegmentConfig};

/// 默认句间静音（毫秒）
pub const DEFAULT_SENTENCE_SILENCE_MS: u32 = 200;
/// 默认段间静音（毫秒）
pub const DEFAULT_PARAGRAPH_SILENCE_MS: u32 = 700;

/// 长文本合成配置
#[derive(Debug, Clone)]
pub struct LongFormConfig {
    pub sentence_silence_ms: u32,
    pub paragraph_silence_ms: u32,
    pub segment: SegmentConfig,
}

impl Default for LongFormConfig {
    fn default() -> Self {
        Self {
            sentence_silence_ms: DEFAULT_SENTENCE_SILENCE_MS,
            paragraph_silence_ms: DEFAULT_PARAGRAPH_SILENCE_MS,
            segment: SegmentConfig::default(),
        }
    }
}

/// 单次长文本合成的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongFormStats {
    pub sentences: usize,
    pub synthesized: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 长文本合成器
#[derive(Clone)]
pub struct LongFormSynthesizer {
    config: LongFormConfig,
    decoder: Arc<dyn AudioDecoderPort>,
}

impl LongFormSynthesizer {
    pub fn new(config: LongFormConfig, decoder: Arc<dyn AudioDecoderPort>) -> Self {
        Self { config, decoder }
    }

    pub fn config(&self) -> &LongFormConfig {
        &self.config
    }

    /// 合成全部段落，返回音色采样率下的单声道 16 位裸 PCM
    pub async fn synthesize(&self, paragraphs: &[String], voice: &LoadedVoice) -> (AudioSegment, LongFormStats) {
        let mut buffer = PcmBuffer::new(voice.sample_rate);
        let mut stats = LongFormStats::default();

        for (index, paragraph) in paragraphs.iter().enumerate() {
            for sentence in split_sentences(paragraph, &self.config.segment) {
                stats.sentences += 1;

                let text = voice.normalize(&sentence);
                if text.is_empty() {
                    tracing::debug!(paragraph = index, sentence = %sentence, "Sentence empty after normalization, skipped");
                    stats.skipped += 1;
                    continue;
                }

                let segment = match voice.backend.synthesize(&text).await {
                    Ok(segment) => segment,
                    Err(e) => {
                        tracing::warn!(voice = %voice.id, text = %text, error = %e, "Sentence synthesis failed, skipped");
                        stats.failed += 1;
                        continue;
                    }
                };

                match self.decoder.decode_mono(&segment) {
                    Ok(mono) => {
                        buffer.append_samples(&mono.samples, mono.sample_rate);
                        buffer.append_silence(self.config.sentence_silence_ms);
                        stats.synthesized += 1;
                    }
                    Err(e) => {
                        tracing::warn!(voice = %voice.id, text = %text, error = %e, "Invalid audio segment, skipped");
                        stats.failed += 1;
                    }
                }
            }

            buffer.append_silence(self.config.paragraph_silence_ms);
        }

        tracing::info!(
            voice = %voice.id,
            paragraphs = paragraphs.len(),
            sentences = stats.sentences,
            synthesized = stats.synthesized,
            skipped = stats.skipped,
            failed = stats.failed,
            samples = buffer.len(),
            "Long-form synthesis finished"
        );

        (buffer.into_segment(), stats)
    }
}

impl fmt::Debug for LongFormSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongFormSynthesizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
