use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::{TtsError, TtsService};

const MOCK_LATENCY: Duration = Duration::from_millis(50);

// Start of a silent MPEG1 Layer 3 frame, enough for players in dev and tests
const SILENT_MP3: [u8; 42] = [
    0xFF, 0xFB, 0x90, 0xC4, 0x00, 0x00, 0x00, 0x00, 0x0D, 0x20, 0x00, 0x00, 0x00, 0x01, 0x31,
    0x05, 0x35, 0x14, 0xCC, 0xB8, 0xC4, 0xC0, 0xC1, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55,
    0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55,
];

pub struct MockTtsService {
    latency: Duration,
}

impl Default for MockTtsService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTtsService {
    pub fn new() -> Self {
        Self {
            latency: MOCK_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl TtsService for MockTtsService {
    fn name(&self) -> &'static str {
        "Mock TTS"
    }

    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, TtsError> {
        debug!("Mock synthesis of {} chars ({})", text.len(), language_code);
        tokio::time::sleep(self.latency).await;

        Ok(SILENT_MP3.to_vec())
    }
}
