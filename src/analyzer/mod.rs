//! Deterministic analysis of a learner's attempt at a speaking exercise.
//!
//! The analyzer takes a transcript (typed or produced by a speech-to-text
//! provider) and decides whether it satisfies the exercise. Stages run in a
//! fixed order and stop at the first failure:
//!
//! 1. empty transcript
//! 2. speech-to-text confidence below [`CONFIDENCE_THRESHOLD`]
//! 3. exact match against an allowed variant (passes immediately)
//! 4. required words present as substrings
//! 5. word order against the expected phrase, tolerating one inversion
//!
//! Every comparison happens on normalized text.

mod word_order;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::normalizer::{GreekTranscriptNormalizer, TranscriptionNormalizer};

pub use word_order::count_inversions;

/// Attempts below this confidence are rejected before their content is checked.
pub const CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Word order is only checked with at least this many required words.
pub const MIN_WORDS_FOR_ORDER_CHECK: usize = 3;

/// Inversions tolerated before the word order is rejected.
pub const MAX_TOLERATED_INVERSIONS: usize = 1;

pub const EMPTY_TRANSCRIPT_REASON: &str = "Try again — say the phrase out loud!";
pub const LOW_CONFIDENCE_REASON: &str = "Could not understand clearly — please try again.";
pub const WORD_ORDER_REASON: &str = "Try again — check the word order.";
const MISSING_WORDS_PREFIX: &str = "Try again — include: ";

fn default_confidence() -> f64 {
    1.0
}

/// Input for a single analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeParams {
    /// Raw transcript as typed or returned by the provider
    pub transcript: String,
    /// Pre-normalized transcript; used verbatim when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_transcript: Option<String>,
    /// Provider confidence in [0, 1]; typed input uses 1.0
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub required_words: Vec<String>,
    #[serde(default)]
    pub allowed_variants: Vec<String>,
    /// Canonical target sentence, used only for word order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_phrase: Option<String>,
}

impl AnalyzeParams {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            normalized_transcript: None,
            confidence: default_confidence(),
            required_words: Vec::new(),
            allowed_variants: Vec::new(),
            expected_phrase: None,
        }
    }

    pub fn with_normalized_transcript(mut self, normalized: impl Into<String>) -> Self {
        self.normalized_transcript = Some(normalized.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_required_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_allowed_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_variants = variants.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_expected_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.expected_phrase = Some(phrase.into());
        self
    }
}

/// Verdict for one attempt. Serialized as `{"outcome": "pass"}` or
/// `{"outcome": "retry", "reason": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum AnalyzerResult {
    Pass,
    Retry { reason: String },
}

impl AnalyzerResult {
    pub fn retry(reason: impl Into<String>) -> Self {
        AnalyzerResult::Retry {
            reason: reason.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, AnalyzerResult::Pass)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            AnalyzerResult::Pass => None,
            AnalyzerResult::Retry { reason } => Some(reason.as_str()),
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            AnalyzerResult::Pass => "pass",
            AnalyzerResult::Retry { .. } => "retry",
        }
    }
}

/// Stateless analyzer. Cheap to share behind an `Arc`.
pub struct Analyzer {
    normalizer: GreekTranscriptNormalizer,
}

impl Analyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            normalizer: GreekTranscriptNormalizer::new()?,
        })
    }

    pub fn normalizer(&self) -> &GreekTranscriptNormalizer {
        &self.normalizer
    }

    pub fn analyze(&self, params: &AnalyzeParams) -> AnalyzerResult {
        let normalized = match &params.normalized_transcript {
            Some(normalized) => normalized.clone(),
            None => self.normalizer.normalize(&params.transcript),
        };

        if normalized.is_empty() {
            return AnalyzerResult::retry(EMPTY_TRANSCRIPT_REASON);
        }

        if params.confidence < CONFIDENCE_THRESHOLD {
            return AnalyzerResult::retry(LOW_CONFIDENCE_REASON);
        }

        let variant_match = params
            .allowed_variants
            .iter()
            .any(|variant| self.normalizer.normalize(variant) == normalized);
        if variant_match {
            return AnalyzerResult::Pass;
        }

        let normalized_words: Vec<String> = params
            .required_words
            .iter()
            .map(|word| self.normalizer.normalize(word))
            .collect();

        let missing: Vec<&str> = params
            .required_words
            .iter()
            .zip(&normalized_words)
            .filter(|(_, normalized_word)| !normalized.contains(normalized_word.as_str()))
            .map(|(word, _)| word.as_str())
            .collect();

        if !missing.is_empty() {
            return AnalyzerResult::retry(format!("{}{}", MISSING_WORDS_PREFIX, missing.join(", ")));
        }

        if let Some(expected) = &params.expected_phrase {
            if normalized_words.len() >= MIN_WORDS_FOR_ORDER_CHECK {
                let expected = self.normalizer.normalize(expected);
                let inversions = count_inversions(&normalized, &expected, &normalized_words);
                if inversions.is_some_and(|count| count > MAX_TOLERATED_INVERSIONS) {
                    return AnalyzerResult::retry(WORD_ORDER_REASON);
                }
            }
        }

        AnalyzerResult::Pass
    }
}
