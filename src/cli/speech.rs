use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use super::args::{SpeakCliArgs, TranscribeCliArgs};
use super::print_result;
use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::lessons::{load_catalog, submit_attempt, AttemptSubmission};
use crate::stt::{create_stt_service, validate_audio};
use crate::tts::{create_tts_service, validate_text};

fn mime_from_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("wav") => "audio/wav",
        Some("ogg" | "oga" | "opus") => "audio/ogg",
        Some("mp4" | "m4a") => "audio/mp4",
        _ => "audio/webm",
    }
}

pub async fn handle_transcribe_command(args: TranscribeCliArgs) -> Result<()> {
    let config = Config::load()?;

    let audio = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read audio file {:?}", args.file))?;
    let mime_type = args
        .mime
        .unwrap_or_else(|| mime_from_extension(&args.file).to_string());
    debug!("Uploading {} bytes as {}", audio.len(), mime_type);

    validate_audio(&audio, &mime_type)?;

    let service = create_stt_service(&config.stt)?;
    let result = service.transcribe(&audio, &mime_type).await?;

    println!("Transcript: {}", result.transcript);
    println!("Normalized: {}", result.normalized_transcript);
    println!("Confidence: {:.2}", result.confidence);

    let Some(exercise_id) = args.exercise else {
        return Ok(());
    };

    let catalog = load_catalog(config.server.lessons_path.as_deref())?;
    let exercise = catalog
        .exercise(&exercise_id)
        .with_context(|| format!("Exercise {} not found", exercise_id))?;

    let analyzer = Analyzer::new()?;
    let record = submit_attempt(
        &analyzer,
        exercise,
        &AttemptSubmission {
            exercise_id: exercise_id.clone(),
            transcript: result.transcript,
            normalized_transcript: Some(result.normalized_transcript),
            confidence: Some(result.confidence),
        },
    )?;

    print_result(&record.result, false)
}

pub async fn handle_speak_command(args: SpeakCliArgs) -> Result<()> {
    let config = Config::load()?;
    validate_text(&args.text)?;

    let language = args
        .lang
        .unwrap_or_else(|| config.tts.default_language.clone());
    let service = create_tts_service(&config.tts)?;
    let audio = service.synthesize(&args.text, &language).await?;

    std::fs::write(&args.output, &audio)
        .with_context(|| format!("Failed to write {:?}", args.output))?;

    println!(
        "Wrote {} bytes of {} speech to {}",
        audio.len(),
        language,
        args.output.display()
    );
    Ok(())
}
