use anyhow::{anyhow, Result};

use super::args::AttemptCliArgs;
use super::print_result;
use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::lessons::{load_catalog, submit_attempt, AttemptSubmission};

pub fn handle_lessons_command() -> Result<()> {
    let config = Config::load()?;
    let catalog = load_catalog(config.server.lessons_path.as_deref())?;

    if catalog.lessons().is_empty() {
        println!("No lessons available.");
        return Ok(());
    }

    for lesson in catalog.lessons() {
        println!("{} ({})", lesson.title, lesson.id);
        println!("  {}", lesson.description);
        for exercise in &lesson.exercises {
            println!("  [{}] {}", exercise.id, exercise.prompt);
            println!("      Target: {}", exercise.expected_phrase);
        }
        println!();
    }

    println!("To practice an exercise, use: glossa attempt <EXERCISE_ID> \"<transcript>\"");
    Ok(())
}

pub fn handle_attempt_command(args: AttemptCliArgs) -> Result<()> {
    let config = Config::load()?;
    let catalog = load_catalog(config.server.lessons_path.as_deref())?;
    let exercise = catalog
        .exercise(&args.exercise_id)
        .ok_or_else(|| anyhow!("Exercise {} not found", args.exercise_id))?;

    let analyzer = Analyzer::new()?;
    let record = submit_attempt(
        &analyzer,
        exercise,
        &AttemptSubmission {
            exercise_id: args.exercise_id.clone(),
            transcript: args.transcript,
            normalized_transcript: None,
            confidence: args.confidence,
        },
    )?;

    println!("Target: {}", exercise.expected_phrase);
    print_result(&record.result, false)
}
