pub mod analyzer;
pub mod api;
pub mod cli;
pub mod config;
pub mod global;
pub mod lessons;
pub mod normalizer;
pub mod rate_limit;
pub mod stt;
pub mod tts;
