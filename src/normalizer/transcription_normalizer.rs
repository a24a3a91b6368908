/// Trait for turning provider or learner text into a comparable canonical form
pub trait TranscriptionNormalizer: Send + Sync {
    /// Normalize the raw transcript text
    fn normalize(&self, raw_output: &str) -> String;

    /// Get the name of this normalizer for logging
    fn name(&self) -> &'static str;
}
