use anyhow::{bail, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::{SttError, SttResult, SttService};
use crate::normalizer::{GreekTranscriptNormalizer, TranscriptionNormalizer};

const DEFAULT_ENDPOINT: &str = "https://api.deepgram.com/v1/listen";
const MODEL: &str = "nova-3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 1;
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: ListenResults,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
    #[serde(default)]
    detected_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f64,
}

/// Prerecorded transcription through the Deepgram REST API.
pub struct DeepgramSttService {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    language: String,
    normalizer: GreekTranscriptNormalizer,
}

impl DeepgramSttService {
    pub fn new(api_key: String, endpoint: Option<String>, language: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            bail!("Missing API key for the Deepgram provider. Set STT_API_KEY in your environment.");
        }

        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        info!("Initialized Deepgram provider with endpoint: {}", endpoint);

        Ok(Self {
            client,
            api_key,
            endpoint,
            language,
            normalizer: GreekTranscriptNormalizer::new()?,
        })
    }

    async fn attempt_transcribe(&self, audio: &[u8], mime_type: &str) -> Result<SttResult, SttError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("model", MODEL),
                ("language", self.language.as_str()),
                ("punctuate", "true"),
                ("smart_format", "false"),
            ])
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, mime_type)
            .body(audio.to_vec())
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                "Deepgram request failed with status {}: {}",
                status, response_text
            );
            return Err(SttError::Failure(format!(
                "Deepgram returned status {}",
                status
            )));
        }

        let listen: ListenResponse = serde_json::from_str(&response_text)
            .map_err(|e| SttError::Failure(format!("Failed to parse Deepgram response: {}", e)))?;

        let channel = listen.results.channels.into_iter().next();
        let language_code = channel
            .as_ref()
            .and_then(|c| c.detected_language.clone())
            .unwrap_or_else(|| self.language.clone());
        let (transcript, confidence) = channel
            .and_then(|c| c.alternatives.into_iter().next())
            .map(|alt| (alt.transcript, alt.confidence))
            .unwrap_or_else(|| (String::new(), 0.0));

        debug!("Raw transcription: {}", transcript);

        Ok(SttResult {
            normalized_transcript: self.normalizer.normalize(&transcript),
            transcript,
            confidence,
            language_code,
        })
    }
}

impl SttService for DeepgramSttService {
    fn name(&self) -> &'static str {
        "Deepgram"
    }

    fn transcribe<'a>(
        &'a self,
        audio: &'a [u8],
        mime_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<SttResult, SttError>> + Send + 'a>> {
        Box::pin(async move {
            info!(
                "Transcribing {} bytes of {} via Deepgram",
                audio.len(),
                mime_type
            );

            let mut attempt = 0;
            loop {
                match self.attempt_transcribe(audio, mime_type).await {
                    Ok(result) => {
                        info!(
                            "Transcription complete: {} chars, confidence {:.2}",
                            result.transcript.len(),
                            result.confidence
                        );
                        return Ok(result);
                    }
                    Err(e) if attempt < MAX_RETRIES => {
                        warn!("Deepgram attempt {} failed: {}, retrying", attempt + 1, e);
                        attempt += 1;
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                    Err(e) => return Err(e),
                }
            }
        })
    }
}
