//! Synthesis HTTP Handlers

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{SynthesizeLong, SynthesizeShort};
use crate::infrastructure::http::dto::{LongRequest, ShortRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

const CONTENT_TYPE_HEADER: &str = "content-type";
/// 解析后的音色
pub const VOICE_HEADER: &str = "x-voice";
/// 解析后的语言
pub const LANG_HEADER: &str = "x-lang";

fn audio_response(content_type: &'static str, voice: String, lang: String, body: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE_HEADER, content_type.to_string()),
            (VOICE_HEADER, voice),
            (LANG_HEADER, lang),
        ],
        body,
    )
        .into_response()
}

async fn short(state: &AppState, req: ShortRequest) -> Result<Response, ApiError> {
    let response = state
        .synthesize_short_handler
        .handle(SynthesizeShort {
            text: req.text.unwrap_or_default(),
            voice: req.voice,
            lang: req.lang,
        })
        .await?;

    Ok(audio_response("audio/wav", response.voice, response.lang, response.wav))
}

// ============================================================================
// Handlers
// ============================================================================

/// 短文本合成，返回 WAV
pub async fn synthesize_short(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ShortRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    short(&state, req).await
}

/// 短文本合成（查询参数形式）
pub async fn synthesize_query(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ShortRequest>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(req) = query?;
    short(&state, req).await
}

/// 长文本合成，返回压缩音频
pub async fn synthesize_long(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LongRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;

    let response = state
        .synthesize_long_handler
        .handle(SynthesizeLong {
            paragraphs: req.text_paragraphs,
            voice: req.voice,
            lang: req.lang,
        })
        .await?;

    Ok(audio_response(
        response.audio.format.content_type(),
        response.voice,
        response.lang,
        response.audio.audio_data,
    ))
}
