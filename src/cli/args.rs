use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "glossa")]
#[command(about = "Speaking practice for language lessons", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the HTTP API server (default)
    Serve(ServeCliArgs),
    /// Print version information
    Version,
    /// Normalize a transcript the way the analyzer sees it
    Normalize(NormalizeCliArgs),
    /// Judge a transcript against required words and variants
    Analyze(AnalyzeCliArgs),
    /// List lessons and their exercises
    Lessons,
    /// Submit a typed attempt at a catalog exercise
    Attempt(AttemptCliArgs),
    /// Transcribe an audio file with the configured provider
    Transcribe(TranscribeCliArgs),
    /// Synthesize a phrase to an MP3 file
    Speak(SpeakCliArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct ServeCliArgs {
    /// Override the configured port
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(ClapArgs, Debug)]
pub struct NormalizeCliArgs {
    pub text: String,
    /// Keep accents and other diacritics
    #[arg(long)]
    pub keep_diacritics: bool,
}

#[derive(ClapArgs, Debug)]
pub struct AnalyzeCliArgs {
    /// Transcript to judge
    pub transcript: String,
    /// Word that must appear (repeatable)
    #[arg(short, long = "required")]
    pub required: Vec<String>,
    /// Accepted whole-phrase alternative (repeatable)
    #[arg(long = "variant")]
    pub variants: Vec<String>,
    /// Target sentence used for the word-order check
    #[arg(short, long)]
    pub expected: Option<String>,
    /// Provider confidence in [0, 1]
    #[arg(short, long, default_value_t = 1.0)]
    pub confidence: f64,
    /// Pre-normalized transcript, used verbatim
    #[arg(long)]
    pub normalized: Option<String>,
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct AttemptCliArgs {
    /// Exercise ID, e.g. greetings-1
    pub exercise_id: String,
    pub transcript: String,
    /// Provider confidence; omit for typed input
    #[arg(short, long)]
    pub confidence: Option<f64>,
}

#[derive(ClapArgs, Debug)]
pub struct TranscribeCliArgs {
    /// Audio file to upload
    pub file: PathBuf,
    /// MIME type; guessed from the extension when omitted
    #[arg(short, long)]
    pub mime: Option<String>,
    /// Judge the transcript against this exercise
    #[arg(short, long)]
    pub exercise: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct SpeakCliArgs {
    pub text: String,
    /// Language code; the configured default when omitted
    #[arg(short, long)]
    pub lang: Option<String>,
    /// Where to write the MP3
    #[arg(short, long)]
    pub output: PathBuf,
}
