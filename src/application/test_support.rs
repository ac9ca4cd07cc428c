//! 测试用的后端桩

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::backend_factory::{BackendContext, BackendFactory};
use crate::application::long_form::{LongFormConfig, LongFormSynthesizer};
use crate::application::ports::{EngineInit, InferenceEngine, InferenceRuntime, RuntimeError, SpeechBackend};
use crate::application::registry::LoadedVoice;
use crate::domain::audio::{AudioSegment, SegmentFormat};
use crate::domain::catalog::EngineSchema;
use crate::domain::voice::{ModelLoadError, SynthesisError};
use crate::infrastructure::adapters::AudioTranscoder;

/// 每个字符 10ms 的确定性后端
pub struct StubBackend {
    voice: String,
    rate: u32,
    loaded: bool,
    fail_load: bool,
    fail_on: Vec<String>,
    format: SegmentFormat,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubBackend {
    pub fn new(voice: &str, rate: u32) -> Self {
        Self {
            voice: voice.to_string(),
            rate,
            loaded: false,
            fail_load: false,
            fail_on: Vec::new(),
            format: SegmentFormat::Wav,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// 文本包含 `needle` 时合成失败
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    pub fn with_format(mut self, format: SegmentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl SpeechBackend for StubBackend {
    fn engine_type(&self) -> &'static str {
        "stub"
    }

    fn voice(&self) -> &str {
        &self.voice
    }

    async fn load(&mut self) -> Result<(), ModelLoadError> {
        if self.fail_load {
            return Err(ModelLoadError::Initialization {
                voice: self.voice.clone(),
                reason: "stub failure".to_string(),
            });
        }
        self.loaded = true;
        Ok(())
    }

    async fn synthesize(&self, text: &str) -> Result<AudioSegment, SynthesisError> {
        self.calls.lock().unwrap().push(text.to_string());

        if self.fail_on.iter().any(|n| text.contains(n.as_str())) {
            return Err(SynthesisError::Inference {
                voice: self.voice.clone(),
                reason: "stub failure".to_string(),
            });
        }

        let samples = vec![0.25f32; text.chars().count() * self.rate as usize / 100];
        Ok(match self.format {
            SegmentFormat::Wav => AudioSegment::wav_from_samples(&samples, self.rate),
            SegmentFormat::RawPcm => AudioSegment::pcm_from_samples(&samples, self.rate),
        })
    }

    fn sample_rate(&self) -> Result<u32, ModelLoadError> {
        if self.loaded {
            Ok(self.rate)
        } else {
            Err(ModelLoadError::NotLoaded(self.voice.clone()))
        }
    }
}

/// 直接包装为 LoadedVoice（不经过 load）
pub fn loaded_voice(backend: StubBackend, lang: &str) -> LoadedVoice {
    LoadedVoice {
        id: backend.voice.clone(),
        lang: lang.to_string(),
        language_name: None,
        sample_rate: backend.rate,
        preprocessor: None,
        backend: Arc::new(backend),
    }
}

struct NoRuntime;

#[async_trait]
impl InferenceRuntime for NoRuntime {
    async fn initialize(&self, init: EngineInit) -> Result<Arc<dyn InferenceEngine>, RuntimeError> {
        Err(RuntimeError::UnsupportedFamily(init.family))
    }
}

/// 注册了 `stub` 类型的工厂
///
/// 声明字段 `fail = "load"` 使加载失败，`rate` 指定采样率
pub fn stub_factory() -> BackendFactory {
    let context = BackendContext::new("/nonexistent", Arc::new(NoRuntime));
    let mut factory = BackendFactory::new(context);
    factory.register(
        "stub",
        EngineSchema::new(&["voice", "lang", "model_type"]),
        |declaration, _context| {
            let rate = declaration
                .field("rate")
                .and_then(|r| r.parse().ok())
                .unwrap_or(16000);
            let mut backend = StubBackend::new(&declaration.voice, rate);
            if declaration.field("fail") == Some("load") {
                backend = backend.failing_load();
            }
            Box::new(backend) as Box<dyn SpeechBackend>
        },
    );
    factory
}

/// 使用 symphonia 解码器的长文本合成器
pub fn long_form_synthesizer(config: LongFormConfig) -> LongFormSynthesizer {
    LongFormSynthesizer::new(config, Arc::new(AudioTranscoder::new()))
}
