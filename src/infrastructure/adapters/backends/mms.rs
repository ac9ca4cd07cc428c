//! MMS Backend - 自包含的预训练目录，可选微调检查点
//!
//! 输出单声道 16 位裸 PCM

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::engine::{read_json_u32, EngineHandle};
use crate::application::backend_factory::BackendContext;
use crate::application::ports::{EngineInit, SpeechBackend};
use crate::domain::audio::AudioSegment;
use crate::domain::catalog::{EngineSchema, FieldType, VoiceDeclaration};
use crate::domain::voice::{ModelLoadError, SynthesisError};

pub const MODEL_TYPE: &str = "mms";

const BASE_MODEL_PATH: &str = "base_model_path";
const CHECKPOINT_NAME: &str = "checkpoint_name";
const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// 字段模式
pub fn schema() -> EngineSchema {
    EngineSchema::new(&["voice", "lang", "model_type", BASE_MODEL_PATH])
        .optional(CHECKPOINT_NAME, FieldType::Str)
}

struct Loaded {
    engine: EngineHandle,
    sample_rate: u32,
}

/// MMS 后端
pub struct MmsBackend {
    declaration: VoiceDeclaration,
    context: BackendContext,
    loaded: Option<Loaded>,
}

impl MmsBackend {
    pub fn new(declaration: &VoiceDeclaration, context: &BackendContext) -> Self {
        Self {
            declaration: declaration.clone(),
            context: context.clone(),
            loaded: None,
        }
    }

    fn base_dir(&self) -> Result<PathBuf, ModelLoadError> {
        let voice = &self.declaration.voice;
        let declared = self
            .declaration
            .field(BASE_MODEL_PATH)
            .ok_or_else(|| ModelLoadError::Initialization {
                voice: voice.clone(),
                reason: format!("{} not declared", BASE_MODEL_PATH),
            })?;

        let path = self.context.resolve(declared);
        if !path.is_dir() {
            return Err(ModelLoadError::MissingDirectory {
                voice: voice.clone(),
                path,
            });
        }
        Ok(path)
    }

    /// 微调检查点，不存在时回退到基础模型
    fn checkpoint(&self, base_dir: &Path) -> Option<PathBuf> {
        let name = self.declaration.field(CHECKPOINT_NAME)?;
        let path = base_dir.join(name);
        if path.exists() {
            Some(path)
        } else {
            tracing::warn!(
                voice = %self.declaration.voice,
                path = %path.display(),
                "Checkpoint not found, using the base model"
            );
            None
        }
    }
}

#[async_trait]
impl SpeechBackend for MmsBackend {
    fn engine_type(&self) -> &'static str {
        MODEL_TYPE
    }

    fn voice(&self) -> &str {
        &self.declaration.voice
    }

    async fn load(&mut self) -> Result<(), ModelLoadError> {
        let voice = self.declaration.voice.clone();
        let base_dir = self.base_dir()?;

        let mut files = BTreeMap::new();
        files.insert(BASE_MODEL_PATH.to_string(), base_dir.clone());
        if let Some(checkpoint) = self.checkpoint(&base_dir) {
            files.insert(CHECKPOINT_NAME.to_string(), checkpoint);
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
            None => {
                let config_path = base_dir.join("config.json");
                if config_path.is_file() {
                    read_json_u32(&voice, &config_path, &["sampling_rate"])?.unwrap_or(DEFAULT_SAMPLE_RATE)
                } else {
                    DEFAULT_SAMPLE_RATE
                }
            }
        };

        tracing::info!(voice = %voice, sample_rate = sample_rate, "MMS model loaded");
        self.loaded = Some(Loaded { engine, sample_rate });
        Ok(())
    }

    async fn synthesize(&self, text: &str) -> Result<AudioSegment, SynthesisError> {
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| SynthesisError::NotInitialized(self.declaration.voice.clone()))?;

        let waveform = loaded.engine.infer(&self.declaration.voice, text).await?;
        Ok(AudioSegment::pcm_from_samples(&waveform.samples, waveform.sample_rate))
    }

    fn sample_rate(&self) -> Result<u32, ModelLoadError> {
        self.loaded
            .as_ref()
            .map(|l| l.sample_rate)
            .ok_or_else(|| ModelLoadError::NotLoaded(self.declaration.voice.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{InferenceEngine, InferenceRuntime, RuntimeError, Waveform};
    use crate::domain::audio::SegmentFormat;
    use crate::infrastructure::adapters::runtime::FakeRuntime;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingRuntime {
        inits: Mutex<Vec<EngineInit>>,
    }

    struct UnknownRateEngine;

    #[async_trait]
    impl InferenceEngine for UnknownRateEngine {
        async fn infer(&self, _text: &str) -> Result<Waveform, RuntimeError> {
            Err(RuntimeError::ServiceError("out of memory".to_string()))
        }

        fn output_sample_rate(&self) -> Option<u32> {
            None
        }
    }

    #[async_trait]
    impl InferenceRuntime for RecordingRuntime {
        async fn initialize(&self, init: EngineInit) -> Result<Arc<dyn InferenceEngine>, RuntimeError> {
            self.inits.lock().unwrap().push(init);
            Ok(Arc::new(UnknownRateEngine))
        }
    }

    fn declaration() -> VoiceDeclaration {
        VoiceDeclaration::new("pau", "ca", MODEL_TYPE)
            .with_field(BASE_MODEL_PATH, "mms-cat")
            .loaded()
    }

    #[tokio::test]
    async fn test_load_and_synthesize_raw_pcm() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("mms-cat")).unwrap();
        let context = BackendContext::new(root.path(), Arc::new(FakeRuntime::default()));
        let mut backend = MmsBackend::new(&declaration(), &context);

        backend.load().await.unwrap();
        assert_eq!(backend.sample_rate().unwrap(), 22050);

        let segment = backend.synthesize("bon dia").await.unwrap();
        assert_eq!(segment.format, SegmentFormat::RawPcm);
        assert_eq!(segment.channels, 1);
        assert_eq!(segment.sample_width, 2);
        assert!(!segment.is_empty());
    }

    #[tokio::test]
    async fn test_sample_rate_from_config_or_default() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("mms-cat");
        std::fs::create_dir(&base).unwrap();
        let runtime = Arc::new(RecordingRuntime::default());
        let context = BackendContext::new(root.path(), runtime.clone());

        let mut backend = MmsBackend::new(&declaration(), &context);
        backend.load().await.unwrap();
        assert_eq!(backend.sample_rate().unwrap(), DEFAULT_SAMPLE_RATE);

        std::fs::write(base.join("config.json"), r#"{"sampling_rate": 24000}"#).unwrap();
        let mut backend = MmsBackend::new(&declaration(), &context);
        backend.load().await.unwrap();
        assert_eq!(backend.sample_rate().unwrap(), 24000);
    }

    #[tokio::test]
    async fn test_missing_checkpoint_falls_back_to_base() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("mms-cat");
        std::fs::create_dir(&base).unwrap();
        std::fs::write(base.join("ft.safetensors"), b"w").unwrap();
        let runtime = Arc::new(RecordingRuntime::default());
        let context = BackendContext::new(root.path(), runtime.clone());

        let present = declaration().with_field(CHECKPOINT_NAME, "ft.safetensors");
        MmsBackend::new(&present, &context).load().await.unwrap();
        let absent = declaration().with_field(CHECKPOINT_NAME, "nope.safetensors");
        MmsBackend::new(&absent, &context).load().await.unwrap();

        let inits = runtime.inits.lock().unwrap();
        assert_eq!(inits[0].files[CHECKPOINT_NAME], base.join("ft.safetensors"));
        assert!(!inits[1].files.contains_key(CHECKPOINT_NAME));
    }

    #[tokio::test]
    async fn test_base_path_must_be_directory() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("mms-cat"), b"not a dir").unwrap();
        let context = BackendContext::new(root.path(), Arc::new(FakeRuntime::default()));

        let err = MmsBackend::new(&declaration(), &context).load().await.unwrap_err();
        assert!(matches!(err, ModelLoadError::MissingDirectory { .. }));
    }

    #[tokio::test]
    async fn test_runtime_failure_keeps_cause() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("mms-cat")).unwrap();
        let context = BackendContext::new(root.path(), Arc::new(RecordingRuntime::default()));
        let mut backend = MmsBackend::new(&declaration(), &context);
        backend.load().await.unwrap();

        let err = backend.synthesize("hola").await.unwrap_err();
        assert!(err.to_string().contains("out of memory"));
    }
}
