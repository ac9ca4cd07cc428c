//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping      GET   健康检查
//! - /api/short     POST  短文本合成（WAV）
//! - /api/long      POST  长文本合成（Opus / WAV）
//! - /api/tts       GET   短文本合成（查询参数）
//! - /api/voices    GET   列出已加载音色
//! - /api/check     POST  检查 voice / lang 的解析结果

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/short", post(handlers::synthesize_short))
        .route("/long", post(handlers::synthesize_long))
        .route("/tts", get(handlers::synthesize_query))
        .route("/voices", get(handlers::list_voices))
        .route("/check", post(handlers::check_voice))
}
