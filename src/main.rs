//! Voxgate - 多音色 TTS 前端服务
//!
//! 启动流程：服务配置 -> 日志 -> 推理运行时 -> 音色目录校验 -> 模型加载 -> HTTP 服务

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use voxgate::application::{load_models, BackendContext, InferenceRuntime, LongFormSynthesizer};
use voxgate::config::{load_catalog, load_config, print_config, EnvOverrides, LogConfig, RuntimeConfig, RuntimeKind};
use voxgate::domain::text::PreprocessorRegistry;
use voxgate::infrastructure::adapters::{
    with_builtin_backends, AudioTranscoder, FakeRuntime, FakeRuntimeConfig, HttpRuntime, HttpRuntimeConfig,
};
use voxgate::infrastructure::http::{AppState, HttpServer};

fn init_logging(log: &LogConfig) {
    let log_filter = format!("{},voxgate={},tower_http=debug", log.level, log.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_runtime(config: &RuntimeConfig) -> anyhow::Result<Arc<dyn InferenceRuntime>> {
    let runtime: Arc<dyn InferenceRuntime> = match config.kind {
        RuntimeKind::Http => {
            let runtime = HttpRuntime::new(
                HttpRuntimeConfig::new(&config.url)
                    .with_timeout(config.timeout_secs)
                    .with_retries(config.max_retries),
            )?;
            if !runtime.health_check().await {
                tracing::warn!(url = %config.url, "Inference runtime is not reachable yet");
            }
            Arc::new(runtime)
        }
        RuntimeKind::Fake => {
            tracing::warn!("Using the fake inference runtime, audio is synthetic");
            Arc::new(FakeRuntime::new(FakeRuntimeConfig {
                sample_rate: config.sample_rate,
                ..FakeRuntimeConfig::default()
            }))
        }
    };
    Ok(runtime)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config.log);

    tracing::info!("Voxgate - 多音色 TTS 前端服务");
    print_config(&config);

    // 推理运行时与后端工厂
    let runtime = build_runtime(&config.runtime).await?;
    let mut factory = with_builtin_backends(BackendContext::new(&config.catalog.models_root, runtime));

    // 音色目录（任何模型加载之前一次性校验）
    let overrides = EnvOverrides::from_env();
    let catalog_path = overrides
        .catalog_path
        .clone()
        .unwrap_or_else(|| config.catalog.path.clone());
    let catalog = load_catalog(&catalog_path, &overrides, factory.schemas())
        .map_err(|e| anyhow::anyhow!("Invalid voice catalog {}: {}", catalog_path.display(), e))?;

    if let Some(models_root) = &catalog.models_root {
        factory.set_models_root(PathBuf::from(models_root));
    }
    tracing::info!(models_root = %factory.context().models_root.display(), "Models root resolved");

    // 加载模型，单个失败只跳过该音色
    let preprocessors = PreprocessorRegistry::with_builtin();
    let (registry, report) = load_models(&catalog.voices, &factory, &preprocessors, &catalog.languages).await?;

    tracing::info!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Model loading finished"
    );
    for (voice, reason) in &report.failed {
        tracing::warn!(voice = %voice, reason = %reason, "Voice unavailable");
    }

    // 创建 HTTP 服务器
    let transcoder = Arc::new(AudioTranscoder::new());
    let state = AppState::new(
        Arc::new(registry),
        Arc::new(LongFormSynthesizer::new(config.synthesis.long_form_config(), transcoder.clone())),
        transcoder,
        config.audio.transcode_config(),
    );
    let server = HttpServer::new(config.server.clone(), state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
