use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::normalizer::TranscriptionNormalizer;

/// Options for [`GreekTranscriptNormalizer::normalize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// Strip diacritics (tonos, dialytika, ...). Default: true
    pub strip_diacritics: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_diacritics: true,
        }
    }
}

impl NormalizeOptions {
    pub fn keep_diacritics() -> Self {
        Self {
            strip_diacritics: false,
        }
    }
}

/// Deterministic normalization of Greek (or any other) transcript text.
///
/// Pipeline: lowercase, NFD decomposition with combining marks removed
/// (optional), punctuation stripped, whitespace collapsed and trimmed.
///
/// The result is idempotent: normalizing an already normalized string returns
/// it unchanged.
pub struct GreekTranscriptNormalizer {
    punctuation_regex: Regex,
    whitespace_regex: Regex,
}

impl GreekTranscriptNormalizer {
    pub fn new() -> Result<Self> {
        // Anything that is not a letter, a digit, whitespace or a hyphen
        let punctuation_regex = Regex::new(r"[^\p{L}\p{N}\s-]")?;
        let whitespace_regex = Regex::new(r"\s+")?;

        Ok(Self {
            punctuation_regex,
            whitespace_regex,
        })
    }

    pub fn normalize_with(&self, text: &str, options: &NormalizeOptions) -> String {
        let mut result = text.to_lowercase();

        if options.strip_diacritics {
            result = result.nfd().filter(|c| !is_combining_mark(*c)).collect();
        }

        let result = self.punctuation_regex.replace_all(&result, "");
        let result = self.whitespace_regex.replace_all(&result, " ");

        result.trim().to_string()
    }
}

impl TranscriptionNormalizer for GreekTranscriptNormalizer {
    fn normalize(&self, raw_output: &str) -> String {
        self.normalize_with(raw_output, &NormalizeOptions::default())
    }

    fn name(&self) -> &'static str {
        "GreekTranscriptNormalizer"
    }
}
