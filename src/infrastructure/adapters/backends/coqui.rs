//! Coqui Backend - 检查点 + 配置文件对，可选声码器对
//!
//! 输出 16 位 PCM WAV 容器

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;

use super::engine::{read_json_u32, EngineHandle};
use crate::application::backend_factory::BackendContext;
use crate::application::ports::{EngineInit, SpeechBackend};
use crate::domain::audio::AudioSegment;
use crate::domain::catalog::{EngineSchema, FieldType, VoiceDeclaration};
use crate::domain::voice::{ModelLoadError, SynthesisError};

pub const MODEL_TYPE: &str = "coqui";

const TTS_MODEL_PATH: &str = "tts_model_path";
const TTS_CONFIG_PATH: &str = "tts_config_path";
const VOCODER_MODEL_PATH: &str = "vocoder_model_path";
const VOCODER_CONFIG_PATH: &str = "vocoder_config_path";

/// 字段模式
pub fn schema() -> EngineSchema {
    EngineSchema::new(&["voice", "lang", "model_type", TTS_CONFIG_PATH, TTS_MODEL_PATH])
        .optional(VOCODER_MODEL_PATH, FieldType::Str)
        .optional(VOCODER_CONFIG_PATH, FieldType::Str)
}

struct Loaded {
    engine: EngineHandle,
    sample_rate: u32,
}

/// Coqui 后端
pub struct CoquiBackend {
    declaration: VoiceDeclaration,
    context: BackendContext,
    loaded: Option<Loaded>,
}

impl CoquiBackend {
    pub fn new(declaration: &VoiceDeclaration, context: &BackendContext) -> Self {
        Self {
            declaration: declaration.clone(),
            context: context.clone(),
            loaded: None,
        }
    }

    /// 解析必需文件，不存在时报错
    fn required_file(&self, field: &str) -> Result<PathBuf, ModelLoadError> {
        let voice = &self.declaration.voice;
        let declared = self
            .declaration
            .field(field)
            .ok_or_else(|| ModelLoadError::Initialization {
                voice: voice.clone(),
                reason: format!("{} not declared", field),
            })?;

        let path = self.context.resolve(declared);
        if !path.is_file() {
            return Err(ModelLoadError::MissingResource {
                voice: voice.clone(),
                path,
            });
        }
        Ok(path)
    }

    /// 声码器对：两个路径都声明且都存在时才使用
    fn vocoder_files(&self) -> Option<(PathBuf, PathBuf)> {
        let voice = &self.declaration.voice;
        let model = self.declaration.field(VOCODER_MODEL_PATH);
        let config = self.declaration.field(VOCODER_CONFIG_PATH);

        let (model, config) = match (model, config) {
            (Some(model), Some(config)) => (self.context.resolve(model), self.context.resolve(config)),
            (None, None) => {
                tracing::warn!(voice = %voice, "No vocoder declared, using the engine default vocoder");
                return None;
            }
            _ => {
                tracing::warn!(voice = %voice, "Incomplete vocoder pair, using the engine default vocoder");
                return None;
            }
        };

        for path in [&model, &config] {
            if !path.is_file() {
                tracing::warn!(
                    voice = %voice,
                    path = %path.display(),
                    "Vocoder file not found, using the engine default vocoder"
                );
                return None;
            }
        }
        Some((model, config))
    }
}

#[async_trait]
impl SpeechBackend for CoquiBackend {
    fn engine_type(&self) -> &'static str {
        MODEL_TYPE
    }

    fn voice(&self) -> &str {
        &self.declaration.voice
    }

    async fn load(&mut self) -> Result<(), ModelLoadError> {
        let voice = self.declaration.voice.clone();
        let model_path = self.required_file(TTS_MODEL_PATH)?;
        let config_path = self.required_file(TTS_CONFIG_PATH)?;

        let mut files = BTreeMap::new();
        files.insert(TTS_MODEL_PATH.to_string(), model_path);
        files.insert(TTS_CONFIG_PATH.to_string(), config_path.clone());
        if let Some((vocoder_model, vocoder_config)) = self.vocoder_files() {
            files.insert(VOCODER_MODEL_PATH.to_string(), vocoder_model);
            files.insert(VOCODER_CONFIG_PATH.to_string(), vocoder_config);
        }

        let engine = self
            .context
            .runtime
            .initialize(EngineInit {
                voice: voice.clone(),
                family: MODEL_TYPE.to_string(),
                files,
                use_accelerator: self.declaration.use_cuda,
            })
            .await
            .map_err(|e| ModelLoadError::Initialization {
                voice: voice.clone(),
                reason: e.to_string(),
            })?;
        let engine = EngineHandle::new(engine);

        let sample_rate = match engine.output_sample_rate() {
            Some(rate) => rate,
            None => read_json_u32(&voice, &config_path, &["audio", "sample_rate"])?.ok_or_else(|| {
                ModelLoadError::InvalidResource {
                    voice: voice.clone(),
                    path: config_path.clone(),
                    reason: "audio.sample_rate missing".to_string(),
                }
            })?,
        };

        tracing::info!(voice = %voice, sample_rate = sample_rate, "Coqui model loaded");
        self.loaded = Some(Loaded { engine, sample_rate });
        Ok(())
    }

    async fn synthesize(&self, text: &str) -> Result<AudioSegment, SynthesisError> {
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| SynthesisError::NotInitialized(self.declaration.voice.clone()))?;

        let waveform = loaded.engine.infer(&self.declaration.voice, text).await?;
        Ok(AudioSegment::wav_from_samples(&waveform.samples, waveform.sample_rate))
    }

    fn sample_rate(&self) -> Result<u32, ModelLoadError> {
        self.loaded
            .as_ref()
            .map(|l| l.sample_rate)
            .ok_or_else(|| ModelLoadError::NotLoaded(self.declaration.voice.clone()))
    }
}
