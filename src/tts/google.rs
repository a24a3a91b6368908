use anyhow::{bail, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use super::{TtsError, TtsService};

const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SPEAKING_RATE: f64 = 0.9;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    language_code: String,
    name: String,
    ssml_gender: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech (Wavenet voices, MP3 output).
pub struct GoogleTtsService {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GoogleTtsService {
    pub fn new(api_key: String, endpoint: Option<String>) -> Result<Self> {
        if api_key.trim().is_empty() {
            bail!("Google TTS API key is required");
        }

        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        info!("Initialized Google TTS provider with endpoint: {}", endpoint);

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }
}

fn request_body<'a>(text: &'a str, language_code: &str) -> SynthesizeRequest<'a> {
    SynthesizeRequest {
        input: SynthesisInput { text },
        voice: VoiceSelection {
            language_code: language_code.to_string(),
            name: format!("{}-Wavenet-A", language_code),
            ssml_gender: "FEMALE",
        },
        audio_config: AudioConfig {
            audio_encoding: "MP3",
            speaking_rate: SPEAKING_RATE,
        },
    }
}

#[async_trait]
impl TtsService for GoogleTtsService {
    fn name(&self) -> &'static str {
        "Google TTS"
    }

    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, TtsError> {
        info!("Synthesizing {} chars ({}) via Google TTS", text.len(), language_code);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(text, language_code))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                "Google TTS request failed with status {}: {}",
                status, response_text
            );
            return Err(TtsError::Failure(format!(
                "Google TTS API error ({}): {}",
                status, response_text
            )));
        }

        let synthesized: SynthesizeResponse = serde_json::from_str(&response_text)
            .map_err(|e| TtsError::Failure(format!("Failed to parse Google TTS response: {}", e)))?;

        BASE64
            .decode(synthesized.audio_content)
            .map_err(|e| TtsError::Failure(format!("Invalid audio content: {}", e)))
    }
}
