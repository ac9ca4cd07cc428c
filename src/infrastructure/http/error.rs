//! HTTP Error Handling
//!
//! 业务错误映射为真实的 HTTP 状态码，响应体为 `{"message": ...}`

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::ErrorBody;
use crate::application::ApplicationError;
use crate::domain::voice::ResolutionError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// 内部原因只写日志，不返回给客户端
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Bad request");
                msg
            }
            ApiError::NotFound(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Resource not found");
                msg
            }
            ApiError::Internal(cause) => {
                tracing::error!(status = status.as_u16(), error = %cause, "Internal server error");
                INTERNAL_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::EmptyText => ApiError::BadRequest(e.to_string()),
            ApplicationError::Resolution(r) => match r {
                ResolutionError::MissingSelector | ResolutionError::VoiceLanguageMismatch { .. } => {
                    ApiError::BadRequest(r.to_string())
                }
                ResolutionError::VoiceNotFound(_) | ResolutionError::LanguageNotSupported(_) => {
                    ApiError::NotFound(r.to_string())
                }
            },
            ApplicationError::Synthesis(_)
            | ApplicationError::Transcode(_)
            | ApplicationError::InternalError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::SynthesisError;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApplicationError, StatusCode)> = vec![
            (ApplicationError::EmptyText, StatusCode::BAD_REQUEST),
            (ResolutionError::MissingSelector.into(), StatusCode::BAD_REQUEST),
            (
                ResolutionError::VoiceLanguageMismatch {
                    voice: "karen".into(),
                    voice_lang: "lad".into(),
                    requested: "ca".into(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (ResolutionError::VoiceNotFound("x".into()).into(), StatusCode::NOT_FOUND),
            (ResolutionError::LanguageNotSupported("gl".into()).into(), StatusCode::NOT_FOUND),
            (
                SynthesisError::NotInitialized("karen".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_empty_text_message() {
        match ApiError::from(ApplicationError::EmptyText) {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Text must not be empty"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
