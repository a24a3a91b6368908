//! Speech-to-text upload route.

use crate::api::error::ApiResult;
use crate::api::AppState;
use crate::rate_limit::client_ip;
use crate::stt::{validate_audio, SttError, SttResult, MAX_AUDIO_SIZE_BYTES};
use axum::{
    body::{to_bytes, Bytes},
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    response::Json,
    routing::post,
    Router,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Browsers record webm/opus unless told otherwise
const DEFAULT_MIME_TYPE: &str = "audio/webm";

/// Room for multipart boundaries and part headers around the audio.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub result: SttResult,
}

/// Create the speech-to-text router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stt/transcribe", post(transcribe))
        .layer(DefaultBodyLimit::max(
            MAX_AUDIO_SIZE_BYTES + MULTIPART_OVERHEAD_BYTES,
        ))
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// POST /stt/transcribe - Transcribe an uploaded recording.
///
/// Accepts either a multipart form with an `audio` field or the raw audio
/// bytes with their MIME type in `Content-Type`.
async fn transcribe(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<TranscribeResponse>> {
    let headers = request.headers().clone();

    if declared_length(&headers).is_some_and(|length| length > MAX_AUDIO_SIZE_BYTES) {
        return Err(SttError::RequestTooLarge.into());
    }

    let client = client_ip(&headers);
    let decision = state.rate_limiter.check(&client);
    if !decision.allowed {
        warn!("Rejecting transcription from {}: rate limited", client);
        return Err(SttError::RateLimited {
            retry_after_seconds: decision.retry_after_seconds.unwrap_or(60),
        }
        .into());
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .trim()
        .to_string();

    let (audio, mime_type) = if content_type.contains("multipart/form-data") {
        read_multipart(request, &state).await?
    } else {
        let audio = to_bytes(request.into_body(), MAX_AUDIO_SIZE_BYTES)
            .await
            .map_err(|e| {
                debug!("Failed to read audio body: {}", e);
                SttError::RequestTooLarge
            })?;
        let mime_type = if content_type.is_empty() {
            DEFAULT_MIME_TYPE.to_string()
        } else {
            content_type
        };
        (audio, mime_type)
    };

    validate_audio(&audio, &mime_type)?;

    let result = state.stt.transcribe(&audio, &mime_type).await?;
    info!(
        "Transcribed {} bytes of {} with {} (confidence {:.2})",
        audio.len(),
        mime_type,
        state.stt.name(),
        result.confidence
    );

    Ok(Json(TranscribeResponse { ok: true, result }))
}

async fn read_multipart(request: Request, state: &AppState) -> Result<(Bytes, String), SttError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|_| SttError::Validation("Invalid multipart form data".to_string()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| SttError::Validation("Invalid multipart form data".to_string()))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let mime_type = field
            .content_type()
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        let audio = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                SttError::RequestTooLarge
            } else {
                SttError::Validation("Invalid multipart form data".to_string())
            }
        })?;

        return Ok((audio, mime_type));
    }

    Err(SttError::Validation(
        "Missing \"audio\" field in form data".to_string(),
    ))
}
