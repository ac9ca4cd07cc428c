//! Voice Catalog Loader
//!
//! 读取音色 JSON 文档，应用环境变量覆盖后交给校验器

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::catalog::{validate_catalog, ConfigurationError, EngineSchemas, VoiceCatalog};

/// 环境变量覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// USE_CUDA=1|0，强制所有模型的 use_cuda
    pub use_cuda: Option<bool>,
    /// MODELS_ROOT，替换文档中的 models_root
    pub models_root: Option<String>,
    /// TTS_API_CONFIG，音色文档路径
    pub catalog_path: Option<PathBuf>,
}

impl EnvOverrides {
    /// 从进程环境读取
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            use_cuda: lookup("USE_CUDA").map(|v| v == "1"),
            models_root: lookup("MODELS_ROOT").filter(|v| !v.is_empty()),
            catalog_path: lookup("TTS_API_CONFIG")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// 应用到解析后的文档（校验之前）
    pub fn apply(&self, document: &mut Value) {
        let Some(root) = document.as_object_mut() else {
            return;
        };

        if let Some(use_cuda) = self.use_cuda {
            if let Some(Value::Array(models)) = root.get_mut("models") {
                for model in models.iter_mut().filter_map(Value::as_object_mut) {
                    model.insert("use_cuda".to_string(), Value::Bool(use_cuda));
                }
            }
        }

        if let Some(models_root) = &self.models_root {
            root.insert("models_root".to_string(), Value::String(models_root.clone()));
        }
    }
}

/// 读取并校验音色文档
pub fn load_catalog(
    path: &Path,
    overrides: &EnvOverrides,
    schemas: &EngineSchemas,
) -> Result<VoiceCatalog, ConfigurationError> {
    if !path.exists() {
        return Err(ConfigurationError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigurationError::Unreadable(format!("{}: {}", path.display(), e)))?;
    let mut document: Value =
        serde_json::from_str(&content).map_err(|e| ConfigurationError::InvalidJson(e.to_string()))?;

    overrides.apply(&mut document);

    let catalog = validate_catalog(&document, schemas)?;
    tracing::info!(
        path = %path.display(),
        languages = catalog.languages.len(),
        models = catalog.voices.len(),
        "Voice catalog loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::EngineSchema;
    use std::collections::HashMap;

    fn schemas() -> EngineSchemas {
        let mut schemas = EngineSchemas::new();
        schemas.insert(
            "mms",
            EngineSchema::new(&["voice", "lang", "model_type", "base_model_path"]),
        );
        schemas
    }

    const DOCUMENT: &str = r#"{
        "languages": {"ca": "Català"},
        "models": [
            {"voice": "pau", "lang": "ca", "model_type": "mms",
             "base_model_path": "mms-cat", "load": true, "use_cuda": true}
        ]
    }"#;

    fn write(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, DOCUMENT);

        let catalog = load_catalog(&path, &EnvOverrides::default(), &schemas()).unwrap();
        assert_eq!(catalog.voices.len(), 1);
        assert!(catalog.voices[0].use_cuda);
        assert!(catalog.voices[0].load);
        assert_eq!(catalog.models_root, None);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("USE_CUDA", "0"),
            ("MODELS_ROOT", "/srv/models"),
            ("TTS_API_CONFIG", "/etc/voxgate/voices.json"),
        ]);
        let overrides = EnvOverrides::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(overrides.use_cuda, Some(false));
        assert_eq!(overrides.catalog_path, Some(PathBuf::from("/etc/voxgate/voices.json")));

        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, DOCUMENT);
        let catalog = load_catalog(&path, &overrides, &schemas()).unwrap();
        assert!(!catalog.voices[0].use_cuda);
        assert_eq!(catalog.models_root.as_deref(), Some("/srv/models"));
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(&dir.path().join("none.json"), &EnvOverrides::default(), &schemas()).unwrap_err();
        assert!(matches!(err, ConfigurationError::FileNotFound(_)));

        let path = write(&dir, "{ not json");
        let err = load_catalog(&path, &EnvOverrides::default(), &schemas()).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidJson(_)));
    }

    #[test]
    fn test_validation_errors_are_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"{"languages": {}, "models": [{"voice": "x", "lang": "ca", "model_type": "piper"}]}"#,
        );
        let err = load_catalog(&path, &EnvOverrides::default(), &schemas()).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownModelType { .. }));
    }
}
