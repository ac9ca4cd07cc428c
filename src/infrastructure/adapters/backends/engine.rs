//! 已初始化引擎的句柄

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::application::ports::{InferenceEngine, Waveform};
use crate::domain::voice::{ModelLoadError, SynthesisError};

/// 引擎句柄
///
/// 不可重入的引擎由实例内的互斥锁串行化，不同音色之间仍可并发
pub(super) struct EngineHandle {
    engine: Arc<dyn InferenceEngine>,
    lock: Option<Mutex<()>>,
}

impl EngineHandle {
    pub(super) fn new(engine: Arc<dyn InferenceEngine>) -> Self {
        let lock = if engine.is_reentrant() {
            None
        } else {
            Some(Mutex::new(()))
        };
        Self { engine, lock }
    }

    pub(super) fn output_sample_rate(&self) -> Option<u32> {
        self.engine.output_sample_rate()
    }

    pub(super) async fn infer(&self, voice: &str, text: &str) -> Result<Waveform, SynthesisError> {
        let _guard = match &self.lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let waveform = self
            .engine
            .infer(text)
            .await
            .map_err(|e| SynthesisError::Inference {
                voice: voice.to_string(),
                reason: e.to_string(),
            })?;

        if waveform.sample_rate == 0 {
            return Err(SynthesisError::InvalidAudio {
                voice: voice.to_string(),
                reason: "engine returned a zero sample rate".to_string(),
            });
        }
        Ok(waveform)
    }
}

/// 读取 JSON 文件中的整数键（`keys` 为逐层路径）
pub(super) fn read_json_u32(voice: &str, path: &Path, keys: &[&str]) -> Result<Option<u32>, ModelLoadError> {
    let invalid = |reason: String| ModelLoadError::InvalidResource {
        voice: voice.to_string(),
        path: path.to_path_buf(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let document: serde_json::Value = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

    let value = keys.iter().try_fold(&document, |node, key| node.get(key));
    match value {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(format!("{} is not a sample rate", keys.join(".")))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_u32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"audio": {"sample_rate": 22050}, "name": "x"}"#).unwrap();

        assert_eq!(read_json_u32("v", &path, &["audio", "sample_rate"]).unwrap(), Some(22050));
        assert_eq!(read_json_u32("v", &path, &["sampling_rate"]).unwrap(), None);
        assert!(read_json_u32("v", &path, &["name"]).is_err());
        assert!(read_json_u32("v", &dir.path().join("missing.json"), &["a"]).is_err());
    }
}
