use crate::analyzer::AnalyzerResult;
use crate::api::ApiServer;
use crate::config::Config;
use anyhow::{Context, Result};
use tracing::info;

mod args;
mod lessons;
mod speech;
mod text;

pub use args::{
    AnalyzeCliArgs, AttemptCliArgs, Cli, CliCommand, NormalizeCliArgs, ServeCliArgs,
    SpeakCliArgs, TranscribeCliArgs,
};
pub use lessons::{handle_attempt_command, handle_lessons_command};
pub use speech::{handle_speak_command, handle_transcribe_command};
pub use text::{handle_analyze_command, handle_normalize_command};

pub async fn handle_serve_command(args: ServeCliArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!("Starting Glossa service");
    ApiServer::new(&config)?.start().await
}

/// Print a verdict either as JSON or as a one-line summary.
pub(crate) fn print_result(result: &AnalyzerResult, as_json: bool) -> Result<()> {
    if as_json {
        let json = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
        println!("{}", json);
        return Ok(());
    }

    match result {
        AnalyzerResult::Pass => println!("PASS"),
        AnalyzerResult::Retry { reason } => println!("RETRY: {}", reason),
    }
    Ok(())
}
