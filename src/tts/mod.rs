//! Text-to-speech boundary: lets learners hear the target phrase.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::info;

use crate::config::TtsConfig;

mod google;
mod mock;

pub use google::GoogleTtsService;
pub use mock::MockTtsService;

pub const TTS_MAX_TEXT_LENGTH: usize = 500;

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Text exceeds maximum length of {} characters", TTS_MAX_TEXT_LENGTH)]
    TextTooLong,

    #[error("{0}")]
    Validation(String),

    #[error("TTS service timed out")]
    Timeout,

    #[error("TTS service failed: {0}")]
    Failure(String),
}

impl TtsError {
    pub fn code(&self) -> &'static str {
        match self {
            TtsError::TextTooLong => "TEXT_TOO_LONG",
            TtsError::Validation(_) => "VALIDATION_ERROR",
            TtsError::Timeout => "TTS_TIMEOUT",
            TtsError::Failure(_) => "TTS_FAILURE",
        }
    }
}

impl From<reqwest::Error> for TtsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Failure(err.to_string())
        }
    }
}

/// Synthesizes speech as MP3 bytes.
#[async_trait]
pub trait TtsService: Send + Sync {
    fn name(&self) -> &'static str;

    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, TtsError>;
}

/// Reject empty or overlong text before it reaches a provider.
pub fn validate_text(text: &str) -> Result<(), TtsError> {
    if text.trim().is_empty() {
        return Err(TtsError::Validation(
            "Missing required 'text' query parameter".to_string(),
        ));
    }

    if text.chars().count() > TTS_MAX_TEXT_LENGTH {
        return Err(TtsError::TextTooLong);
    }

    Ok(())
}

/// In-memory cache of synthesized audio keyed by language and text.
#[derive(Clone, Default)]
pub struct AudioCache {
    entries: Arc<Mutex<HashMap<String, Arc<Vec<u8>>>>>,
}

impl AudioCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(text: &str, language_code: &str) -> String {
        format!("{:x}", Sha256::digest(format!("{}:{}", language_code, text)))
    }

    pub fn get(&self, text: &str, language_code: &str) -> Option<Arc<Vec<u8>>> {
        let entries = self.entries.lock().ok()?;
        entries.get(&Self::key(text, language_code)).cloned()
    }

    pub fn insert(&self, text: &str, language_code: &str, audio: Vec<u8>) -> Arc<Vec<u8>> {
        let audio = Arc::new(audio);
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(Self::key(text, language_code), audio.clone());
        }
        audio
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the configured provider.
pub fn create_tts_service(config: &TtsConfig) -> Result<Arc<dyn TtsService>> {
    let service: Arc<dyn TtsService> = match config.provider.as_str() {
        "mock" => Arc::new(MockTtsService::new()),
        "google" => {
            let api_key = config
                .api_key
                .clone()
                .context("api_key is required for the Google provider (set TTS_API_KEY)")?;
            Arc::new(GoogleTtsService::new(api_key, config.api_endpoint.clone())?)
        }
        other => bail!(
            "Unknown TTS provider '{}'. Supported providers: mock, google",
            other
        ),
    };

    info!("Using {} for text-to-speech", service.name());
    Ok(service)
}
