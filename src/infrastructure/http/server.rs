//! HTTP Server
//!
//! 路由外层：CORS、请求体上限、请求超时、追踪与合成日志

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use http::header::CONTENT_TYPE;
use http::{HeaderName, Method};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{LANG_HEADER, VOICE_HEADER};
use super::middleware::synthesis_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::ServerConfig;

/// 长文本段落的请求体上限
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// 浏览器客户端只用 GET / POST JSON，并需要读取解析出的音色头
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([
            HeaderName::from_static(VOICE_HEADER),
            HeaderName::from_static(LANG_HEADER),
        ])
        .max_age(Duration::from_secs(3600))
}

/// 给路由套上服务层；超时返回 408，且被合成日志记录
fn with_service_layers<S>(router: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(synthesis_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    fn build_router(&self) -> Router {
        with_service_layers(create_routes(), self.config.request_timeout()).with_state(self.state.clone())
    }

    /// 启动日志：逐个列出可用音色
    fn announce_voices(&self) {
        let registry = &self.state.registry;
        for voice in registry.voices() {
            info!(
                voice = %voice.id,
                lang = %voice.lang,
                sample_rate = voice.sample_rate,
                default = registry.is_default(voice),
                preprocessor = voice.preprocessor.is_some(),
                "Voice ready"
            );
        }
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.announce_voices();

        let router = self.build_router();
        let addr = self.config.addr();
        info!(
            addr = %addr,
            voices = self.state.registry.len(),
            request_timeout_secs = self.config.request_timeout_secs,
            "Starting HTTP server"
        );

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}
