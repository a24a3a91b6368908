//! Lesson content and attempt submission.
//!
//! Exercises store their required words and allowed variants as JSON text.
//! This module decodes those columns, runs the analyzer for a learner's
//! attempt and produces the record a caller would persist.

mod catalog;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analyzer::{AnalyzeParams, Analyzer, AnalyzerResult};
use crate::normalizer::TranscriptionNormalizer;

pub use catalog::{builtin_catalog, load_catalog, Catalog, Exercise, Lesson};

/// Unreadable JSON is an error. Valid JSON that is not a list of strings
/// decodes to an empty list.
fn parse_string_list(raw: &str, column: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .with_context(|| format!("Invalid JSON in {} column: {:?}", column, raw))?;

    match serde_json::from_value::<Vec<String>>(value) {
        Ok(list) => Ok(list),
        Err(e) => {
            warn!("Unexpected {} shape ({}), treating as empty: {}", column, e, raw);
            Ok(Vec::new())
        }
    }
}

/// Decode a stored `requiredWords` column.
pub fn parse_required_words(raw: &str) -> Result<Vec<String>> {
    parse_string_list(raw, "requiredWords")
}

/// Decode a stored `allowedVariants` column.
pub fn parse_allowed_variants(raw: &str) -> Result<Vec<String>> {
    parse_string_list(raw, "allowedVariants")
}

pub fn serialize_required_words(words: &[String]) -> Result<String> {
    serde_json::to_string(words).context("Failed to serialize required words")
}

pub fn serialize_allowed_variants(variants: &[String]) -> Result<String> {
    serde_json::to_string(variants).context("Failed to serialize allowed variants")
}

/// A learner's attempt at one exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSubmission {
    pub exercise_id: String,
    pub transcript: String,
    /// Set when the transcript came from speech-to-text
    #[serde(default)]
    pub normalized_transcript: Option<String>,
    /// Absent for typed input
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Outcome of an attempt, ready to be stored by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub exercise_id: String,
    pub transcript: String,
    pub outcome: String,
    pub stt_confidence: f64,
    /// Serialized [`AnalyzerResult`]
    pub analyzer_output: String,
    pub result: AnalyzerResult,
}

/// Analyze an attempt against its exercise.
pub fn submit_attempt(
    analyzer: &Analyzer,
    exercise: &Exercise,
    submission: &AttemptSubmission,
) -> Result<AttemptRecord> {
    // Typed input has no pre-normalized form
    let normalized = submission
        .normalized_transcript
        .clone()
        .unwrap_or_else(|| analyzer.normalizer().normalize(&submission.transcript));
    let confidence = submission.confidence.unwrap_or(1.0);

    let params = AnalyzeParams {
        transcript: submission.transcript.clone(),
        normalized_transcript: Some(normalized),
        confidence,
        required_words: exercise.required_words()?,
        allowed_variants: exercise.allowed_variants()?,
        expected_phrase: Some(exercise.expected_phrase.clone()),
    };

    let result = analyzer.analyze(&params);
    debug!(
        "Attempt on exercise {} judged {}",
        exercise.id,
        result.outcome()
    );

    let analyzer_output =
        serde_json::to_string(&result).context("Failed to serialize analyzer output")?;

    Ok(AttemptRecord {
        exercise_id: exercise.id.clone(),
        transcript: submission.transcript.clone(),
        outcome: result.outcome().to_string(),
        stt_confidence: confidence,
        analyzer_output,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(exercise_id: &str, transcript: &str) -> AttemptSubmission {
        AttemptSubmission {
            exercise_id: exercise_id.to_string(),
            transcript: transcript.to_string(),
            normalized_transcript: None,
            confidence: None,
        }
    }

    #[test]
    fn test_parse_lists() {
        assert_eq!(
            parse_required_words(r#"["Γεια","λένε"]"#).unwrap(),
            vec!["Γεια", "λένε"]
        );
        assert_eq!(parse_allowed_variants("[]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_parse_wrong_shape_falls_back_to_empty() {
        assert!(parse_required_words("[1, 2]").unwrap().is_empty());
        assert!(parse_allowed_variants(r#"{"a": "b"}"#).unwrap().is_empty());
        assert!(parse_required_words("null").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_required_words("not json").is_err());
        assert!(parse_allowed_variants(r#"["Γεια""#).is_err());
        assert!(parse_required_words("").is_err());
    }

    #[test]
    fn test_submit_fails_on_truncated_word_list() {
        let analyzer = Analyzer::new().unwrap();
        let mut exercise = builtin_catalog().exercise("greetings-1").unwrap().clone();
        exercise.expected_phrase = "ναι".to_string();
        exercise.required_words_json = r#"["ναι""#.to_string();
        exercise.allowed_variants_json = r#"["ναι"]"#.to_string();

        // A wrong answer must not be judged against an empty word list
        let result = submit_attempt(&analyzer, &exercise, &submission("greetings-1", "όχι"));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_lists() {
        let words = vec!["Γεια".to_string(), "λένε".to_string()];
        let raw = serialize_required_words(&words).unwrap();
        assert_eq!(raw, r#"["Γεια","λένε"]"#);
        assert_eq!(parse_required_words(&raw).unwrap(), words);
        assert_eq!(serialize_allowed_variants(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_submit_typed_attempt_passes() {
        let analyzer = Analyzer::new().unwrap();
        let catalog = builtin_catalog();
        let exercise = catalog.exercise("greetings-1").unwrap();

        let record =
            submit_attempt(&analyzer, exercise, &submission("greetings-1", "Γεια, με λένε Μαρία"))
                .unwrap();

        assert_eq!(record.outcome, "pass");
        assert_eq!(record.stt_confidence, 1.0);
        assert_eq!(record.analyzer_output, r#"{"outcome":"pass"}"#);
        assert_eq!(record.transcript, "Γεια, με λένε Μαρία");
    }

    #[test]
    fn test_submit_spoken_attempt_with_low_confidence() {
        let analyzer = Analyzer::new().unwrap();
        let catalog = builtin_catalog();
        let exercise = catalog.exercise("greetings-3").unwrap();

        let mut attempt = submission("greetings-3", "Είμαι καλά, ευχαριστώ");
        attempt.normalized_transcript = Some("ειμαι καλα ευχαριστω".to_string());
        attempt.confidence = Some(0.4);

        let record = submit_attempt(&analyzer, exercise, &attempt).unwrap();
        assert_eq!(record.outcome, "retry");
        assert_eq!(record.stt_confidence, 0.4);
        let stored: AnalyzerResult = serde_json::from_str(&record.analyzer_output).unwrap();
        assert_eq!(stored, record.result);
    }

    #[test]
    fn test_submit_reports_missing_words() {
        let analyzer = Analyzer::new().unwrap();
        let catalog = builtin_catalog();
        let exercise = catalog.exercise("greetings-2").unwrap();

        let record =
            submit_attempt(&analyzer, exercise, &submission("greetings-2", "Πώς πάει;")).unwrap();
        assert_eq!(
            record.result.reason(),
            Some("Try again — include: Τι, κάνεις")
        );
    }
}
