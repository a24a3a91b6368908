use anyhow::Result;

use super::args::{AnalyzeCliArgs, NormalizeCliArgs};
use super::print_result;
use crate::analyzer::{AnalyzeParams, Analyzer};
use crate::normalizer::{GreekTranscriptNormalizer, NormalizeOptions};

pub fn handle_normalize_command(args: NormalizeCliArgs) -> Result<()> {
    let normalizer = GreekTranscriptNormalizer::new()?;
    let options = if args.keep_diacritics {
        NormalizeOptions::keep_diacritics()
    } else {
        NormalizeOptions::default()
    };

    println!("{}", normalizer.normalize_with(&args.text, &options));
    Ok(())
}

pub fn handle_analyze_command(args: AnalyzeCliArgs) -> Result<()> {
    let analyzer = Analyzer::new()?;

    let mut params = AnalyzeParams::new(args.transcript)
        .with_confidence(args.confidence)
        .with_required_words(args.required)
        .with_allowed_variants(args.variants);
    if let Some(expected) = args.expected {
        params = params.with_expected_phrase(expected);
    }
    if let Some(normalized) = args.normalized {
        params = params.with_normalized_transcript(normalized);
    }

    print_result(&analyzer.analyze(&params), args.json)
}
