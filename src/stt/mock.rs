use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

use super::{SttError, SttResult, SttService};
use crate::normalizer::{GreekTranscriptNormalizer, TranscriptionNormalizer};

const MOCK_LATENCY: Duration = Duration::from_millis(200);
const MOCK_TRANSCRIPT: &str = "Γεια σου με λένε Μαρία";
const MOCK_CONFIDENCE: f64 = 0.95;

/// Offline provider for development and tests. Always hears the same phrase.
pub struct MockSttService {
    latency: Duration,
    normalizer: GreekTranscriptNormalizer,
}

impl MockSttService {
    pub fn new() -> Result<Self> {
        Ok(Self {
            latency: MOCK_LATENCY,
            normalizer: GreekTranscriptNormalizer::new()?,
        })
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl SttService for MockSttService {
    fn name(&self) -> &'static str {
        "Mock STT"
    }

    fn transcribe<'a>(
        &'a self,
        audio: &'a [u8],
        mime_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<SttResult, SttError>> + Send + 'a>> {
        Box::pin(async move {
            debug!("Mock transcription of {} bytes ({})", audio.len(), mime_type);
            tokio::time::sleep(self.latency).await;

            Ok(SttResult {
                transcript: MOCK_TRANSCRIPT.to_string(),
                normalized_transcript: self.normalizer.normalize(MOCK_TRANSCRIPT),
                confidence: MOCK_CONFIDENCE,
                language_code: "el".to_string(),
            })
        })
    }
}
