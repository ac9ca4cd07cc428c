//! Ping Handler
//!
//! 健康检查，返回版本和已加载音色数

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::infrastructure::http::dto::PingResponse;
use crate::infrastructure::http::state::AppState;

/// Ping endpoint - 健康检查
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        voices: state.registry.len(),
    })
}
