//! HTTP Middleware
//!
//! 合成请求日志：成功的音频响应记录解析出的音色、语言、大小与耗时，
//! 失败响应按状态码分级记录（具体原因由 ApiError::into_response() 记录）

use std::time::Instant;

use axum::{
    body::HttpBody,
    extract::Request,
    http::header::CONTENT_TYPE,
    middleware::Next,
    response::Response,
};

use super::handlers::{LANG_HEADER, VOICE_HEADER};

/// 音频响应摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSummary {
    pub voice: String,
    pub lang: String,
    pub content_type: String,
    /// 响应体大小（已知时）
    pub bytes: Option<u64>,
}

impl AudioSummary {
    /// 从合成响应头提取；非合成响应返回 None
    pub fn from_response(response: &Response) -> Option<Self> {
        let headers = response.headers();
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);

        Some(Self {
            voice: header(VOICE_HEADER)?,
            lang: header(LANG_HEADER)?,
            content_type: header(CONTENT_TYPE.as_str()).unwrap_or_default(),
            bytes: response.body().size_hint().exact(),
        })
    }
}

pub async fn synthesis_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "Synthesis request failed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            "Synthesis request rejected"
        );
    } else if let Some(audio) = AudioSummary::from_response(&response) {
        tracing::info!(
            path = %path,
            voice = %audio.voice,
            lang = %audio.lang,
            content_type = %audio.content_type,
            bytes = audio.bytes,
            elapsed_ms,
            "Audio delivered"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        response::IntoResponse,
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    fn wav_response() -> Response {
        (
            [
                ("content-type", "audio/wav"),
                (VOICE_HEADER, "karen"),
                (LANG_HEADER, "lad"),
            ],
            vec![0u8; 64],
        )
            .into_response()
    }

    #[test]
    fn test_summary_of_audio_response() {
        let summary = AudioSummary::from_response(&wav_response()).unwrap();
        assert_eq!(
            summary,
            AudioSummary {
                voice: "karen".to_string(),
                lang: "lad".to_string(),
                content_type: "audio/wav".to_string(),
                bytes: Some(64),
            }
        );
    }

    #[test]
    fn test_non_audio_response_has_no_summary() {
        let response = axum::Json(serde_json::json!({"status": "ok"})).into_response();
        assert_eq!(AudioSummary::from_response(&response), None);

        // 缺少语言头的响应不算合成结果
        let response = ([(VOICE_HEADER, "karen")], "x").into_response();
        assert_eq!(AudioSummary::from_response(&response), None);
    }

    fn router() -> Router {
        Router::new()
            .route("/api/short", get(|| async { wav_response() }))
            .route("/api/check", get(|| async { StatusCode::NOT_FOUND }))
            .route("/api/long", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(axum::middleware::from_fn(synthesis_logging_middleware))
    }

    async fn status_and_headers(uri: &str) -> (StatusCode, Option<String>) {
        let request = HttpRequest::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        let voice = response
            .headers()
            .get(VOICE_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        (response.status(), voice)
    }

    #[tokio::test]
    async fn test_audio_response_passes_through() {
        let (status, voice) = status_and_headers("/api/short").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(voice.as_deref(), Some("karen"));
    }

    #[tokio::test]
    async fn test_error_statuses_pass_through() {
        assert_eq!(status_and_headers("/api/check").await.0, StatusCode::NOT_FOUND);
        assert_eq!(
            status_and_headers("/api/long").await.0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
