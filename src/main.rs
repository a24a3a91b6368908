use anyhow::Result;
use clap::Parser;
use glossa::cli::{
    handle_analyze_command, handle_attempt_command, handle_lessons_command,
    handle_normalize_command, handle_serve_command, handle_speak_command,
    handle_transcribe_command, Cli, CliCommand, ServeCliArgs,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("Glossa {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Normalize(args)) => handle_normalize_command(args),
        Some(CliCommand::Analyze(args)) => handle_analyze_command(args),
        Some(CliCommand::Lessons) => handle_lessons_command(),
        Some(CliCommand::Attempt(args)) => handle_attempt_command(args),
        Some(CliCommand::Transcribe(args)) => handle_transcribe_command(args).await,
        Some(CliCommand::Speak(args)) => handle_speak_command(args).await,
        Some(CliCommand::Serve(args)) => handle_serve_command(args).await,
        None => handle_serve_command(ServeCliArgs::default()).await,
    }
}
