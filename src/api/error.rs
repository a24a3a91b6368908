//! API error handling for consistent JSON error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::stt::SttError;
use crate::tts::TtsError;

/// API error type that converts to `{"ok": false, "error": {"code", "message"}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    retry_after: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "ok": false,
            "error": {
                "code": self.code,
                "message": self.message,
            },
        }));

        let mut response = (self.status, body).into_response();
        if let Some(seconds) = self.retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<SttError> for ApiError {
    fn from(err: SttError) -> Self {
        let status = match &err {
            SttError::RequestTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            SttError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            SttError::Validation(_) => StatusCode::BAD_REQUEST,
            SttError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            SttError::Failure(_) => StatusCode::BAD_GATEWAY,
            SttError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        };
        let retry_after = match &err {
            SttError::RateLimited {
                retry_after_seconds,
            } => Some(*retry_after_seconds),
            _ => None,
        };

        Self {
            status,
            code: err.code(),
            message: err.to_string(),
            retry_after,
        }
    }
}

impl From<TtsError> for ApiError {
    fn from(err: TtsError) -> Self {
        let status = match &err {
            TtsError::TextTooLong | TtsError::Validation(_) => StatusCode::BAD_REQUEST,
            TtsError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            TtsError::Failure(_) => StatusCode::BAD_GATEWAY,
        };

        Self::new(status, err.code(), err.to_string())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
