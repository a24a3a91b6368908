mod greek;
mod transcription_normalizer;

pub use greek::{GreekTranscriptNormalizer, NormalizeOptions};
pub use transcription_normalizer::TranscriptionNormalizer;
