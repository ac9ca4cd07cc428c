//! Voice HTTP Handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::application::{CheckVoice, ListVoices};
use crate::infrastructure::http::dto::{voices_response, CheckRequest, CheckResponse, VoicesResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出已加载音色（按语言分组）
pub async fn list_voices(State(state): State<Arc<AppState>>) -> Result<Json<VoicesResponse>, ApiError> {
    let listing = state.list_voices_handler.handle(ListVoices).await?;
    Ok(Json(voices_response(listing)))
}

/// 检查 voice / lang 会解析到哪个音色
pub async fn check_voice(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>, ApiError> {
    let Json(req) = payload?;

    let resolution = state
        .check_voice_handler
        .handle(CheckVoice {
            voice: req.voice,
            lang: req.lang,
        })
        .await?;

    Ok(Json(resolution.into()))
}
