//! API route modules.

pub mod attempts;
pub mod lessons;
pub mod provider;
pub mod stt;
pub mod tts;
