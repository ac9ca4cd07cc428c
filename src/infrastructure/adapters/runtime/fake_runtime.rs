//! Fake Inference Runtime - 用于开发和测试的运行时
//!
//! 不做任何模型计算，按文本长度生成确定性的正弦波

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{EngineInit, InferenceEngine, InferenceRuntime, RuntimeError, Waveform};

/// Fake Runtime 配置
#[derive(Debug, Clone)]
pub struct FakeRuntimeConfig {
    /// 输出采样率
    pub sample_rate: u32,
    /// 每个字符对应的音频时长（毫秒）
    pub ms_per_char: u32,
    /// 是否报告为可重入
    pub reentrant: bool,
}

impl Default for FakeRuntimeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            ms_per_char: 60,
            reentrant: true,
        }
    }
}

/// Fake Runtime
#[derive(Debug, Clone, Default)]
pub struct FakeRuntime {
    config: FakeRuntimeConfig,
}

impl FakeRuntime {
    pub fn new(config: FakeRuntimeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl InferenceRuntime for FakeRuntime {
    async fn initialize(&self, init: EngineInit) -> Result<Arc<dyn InferenceEngine>, RuntimeError> {
        let engine_id = format!("fake-{}", uuid::Uuid::new_v4());
        tracing::info!(
            voice = %init.voice,
            family = %init.family,
            engine_id = %engine_id,
            files = init.files.len(),
            "FakeRuntime: engine initialized"
        );

        Ok(Arc::new(FakeEngine {
            engine_id,
            config: self.config.clone(),
        }))
    }
}

struct FakeEngine {
    engine_id: String,
    config: FakeRuntimeConfig,
}

#[async_trait]
impl InferenceEngine for FakeEngine {
    async fn infer(&self, text: &str) -> Result<Waveform, RuntimeError> {
        let rate = self.config.sample_rate;
        let chars = text.chars().count() as u64;
        let len = (chars * self.config.ms_per_char as u64 * rate as u64 / 1000) as usize;

        // 440Hz，幅度 0.3
        let step = 2.0 * std::f32::consts::PI * 440.0 / rate as f32;
        let samples = (0..len).map(|i| (i as f32 * step).sin() * 0.3).collect();

        tracing::debug!(engine_id = %self.engine_id, chars = chars, samples = len, "FakeRuntime: inference");

        Ok(Waveform {
            samples,
            sample_rate: rate,
        })
    }

    fn output_sample_rate(&self) -> Option<u32> {
        Some(self.config.sample_rate)
    }

    fn is_reentrant(&self) -> bool {
        self.config.reentrant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn init() -> EngineInit {
        EngineInit {
            voice: "karen".to_string(),
            family: "mms".to_string(),
            files: BTreeMap::new(),
            use_accelerator: false,
        }
    }

    #[tokio::test]
    async fn test_waveform_length_follows_text() {
        let runtime = FakeRuntime::new(FakeRuntimeConfig {
            sample_rate: 16000,
            ms_per_char: 10,
            reentrant: false,
        });
        let engine = runtime.initialize(init()).await.unwrap();

        let waveform = engine.infer("hola").await.unwrap();
        assert_eq!(waveform.sample_rate, 16000);
        assert_eq!(waveform.samples.len(), 4 * 160);
        assert!(waveform.samples.iter().all(|s| s.abs() <= 0.3));
        assert!(!engine.is_reentrant());
    }

    #[tokio::test]
    async fn test_output_is_deterministic() {
        let runtime = FakeRuntime::default();
        let a = runtime.initialize(init()).await.unwrap().infer("abc").await.unwrap();
        let b = runtime.initialize(init()).await.unwrap().infer("abc").await.unwrap();
        assert_eq!(a, b);
    }
}
