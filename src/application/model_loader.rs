//! Model Loader - 启动时加载全部音色
//!
//! 单个音色失败只影响它自己：记录错误并跳过。
//! 一个都没加载成功时才是致命错误

use std::sync::Arc;

use crate::application::backend_factory::BackendFactory;
use crate::application::registry::{LoadedVoice, VoiceRegistry, VoiceRegistryBuilder};
use crate::domain::catalog::{LanguageCatalog, VoiceDeclaration};
use crate::domain::text::PreprocessorRegistry;
use crate::domain::voice::ModelLoadError;

/// 加载结果汇总
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// 加载成功的音色
    pub loaded: Vec<String>,
    /// `load = false` 被跳过的音色
    pub skipped: Vec<String>,
    /// 失败的音色及原因
    pub failed: Vec<(String, String)>,
}

/// 加载所有 `load = true` 的声明并构建注册表
pub async fn load_models(
    declarations: &[VoiceDeclaration],
    factory: &BackendFactory,
    preprocessors: &PreprocessorRegistry,
    languages: &LanguageCatalog,
) -> Result<(VoiceRegistry, LoadReport), ModelLoadError> {
    let mut builder = VoiceRegistryBuilder::new(languages.clone());
    let mut report = LoadReport::default();

    for declaration in declarations {
        let voice = declaration.voice.as_str();

        if !declaration.load {
            tracing::info!(voice = %voice, "Model not marked for loading, skipped");
            report.skipped.push(voice.to_string());
            continue;
        }

        match load_one(declaration, factory, preprocessors, languages).await {
            Ok(loaded) => {
                tracing::info!(
                    voice = %voice,
                    lang = %loaded.lang,
                    engine = loaded.backend.engine_type(),
                    sample_rate = loaded.sample_rate,
                    preprocessor = loaded.preprocessor.is_some(),
                    "Model loaded"
                );
                if builder.insert(loaded, declaration.default) {
                    report.loaded.push(voice.to_string());
                }
            }
            Err(reason) => {
                tracing::error!(voice = %voice, error = %reason, "Failed to load model");
                report.failed.push((voice.to_string(), reason));
            }
        }
    }

    tracing::info!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Model loading finished"
    );

    let registry = builder.build()?;
    Ok((registry, report))
}

async fn load_one(
    declaration: &VoiceDeclaration,
    factory: &BackendFactory,
    preprocessors: &PreprocessorRegistry,
    languages: &LanguageCatalog,
) -> Result<LoadedVoice, String> {
    let mut backend = factory
        .create_model(declaration)
        .map_err(|e| e.to_string())?;
    backend.load().await.map_err(|e| e.to_string())?;
    let sample_rate = backend.sample_rate().map_err(|e| e.to_string())?;

    let language_name = languages.name(&declaration.lang).map(str::to_string);
    if language_name.is_none() {
        tracing::warn!(
            voice = %declaration.voice,
            lang = %declaration.lang,
            "Language code not found in languages catalog"
        );
    }

    let preprocessor = preprocessors.lookup(&declaration.lang, declaration.preprocessor.as_deref());
    if preprocessor.is_none() {
        tracing::warn!(
            voice = %declaration.voice,
            lang = %declaration.lang,
            preprocessor = ?declaration.preprocessor,
            "No text preprocessor registered, using universal normalization only"
        );
    }

    Ok(LoadedVoice {
        id: declaration.voice.clone(),
        lang: declaration.lang.clone(),
        language_name,
        backend: Arc::from(backend),
        preprocessor,
        sample_rate,
    })
}
