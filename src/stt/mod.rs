//! Speech-to-text boundary.
//!
//! The service only depends on the [`SttService`] capability; which provider
//! backs it is decided once from configuration by [`create_stt_service`].

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::info;

use crate::config::SttConfig;

mod deepgram;
mod error;
mod mock;

pub use deepgram::DeepgramSttService;
pub use error::SttError;
pub use mock::MockSttService;

pub const ACCEPTED_MIME_TYPES: [&str; 5] = [
    "audio/webm",
    "audio/webm;codecs=opus",
    "audio/mp4",
    "audio/ogg",
    "audio/wav",
];

/// 5 MiB
pub const MAX_AUDIO_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Result returned by every speech-to-text provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SttResult {
    /// Raw transcript from the provider
    pub transcript: String,
    /// Transcript after normalization
    pub normalized_transcript: String,
    /// Provider confidence in [0, 1]
    pub confidence: f64,
    /// BCP-47 language code, e.g. "el"
    pub language_code: String,
}

pub trait SttService: Send + Sync {
    fn name(&self) -> &'static str;

    fn transcribe<'a>(
        &'a self,
        audio: &'a [u8],
        mime_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<SttResult, SttError>> + Send + 'a>>;
}

/// Whether the MIME type, or its base type before any `;` parameters, is accepted.
pub fn is_accepted_mime(mime_type: &str) -> bool {
    let base = mime_type.split(';').next().unwrap_or_default().trim();
    ACCEPTED_MIME_TYPES
        .iter()
        .any(|accepted| *accepted == mime_type || *accepted == base)
}

/// Check an uploaded audio payload before it is sent to a provider.
pub fn validate_audio(audio: &[u8], mime_type: &str) -> Result<(), SttError> {
    if audio.is_empty() {
        return Err(SttError::Validation("Empty audio body".to_string()));
    }

    if audio.len() > MAX_AUDIO_SIZE_BYTES {
        return Err(SttError::RequestTooLarge);
    }

    if !is_accepted_mime(mime_type) {
        return Err(SttError::UnsupportedFormat(mime_type.to_string()));
    }

    Ok(())
}

/// Build the configured provider.
pub fn create_stt_service(config: &SttConfig) -> Result<Arc<dyn SttService>> {
    let service: Arc<dyn SttService> = match config.provider.as_str() {
        "mock" => Arc::new(MockSttService::new()?),
        "deepgram" => {
            let api_key = config
                .api_key
                .clone()
                .context("api_key is required for the Deepgram provider (set STT_API_KEY)")?;
            Arc::new(DeepgramSttService::new(
                api_key,
                config.api_endpoint.clone(),
                config.language.clone(),
            )?)
        }
        other => bail!(
            "Unknown STT provider '{}'. Supported providers: mock, deepgram",
            other
        ),
    };

    info!("Using {} for speech-to-text", service.name());
    Ok(service)
}
