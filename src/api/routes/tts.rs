//! Text-to-speech route.

use crate::api::error::ApiResult;
use crate::api::AppState;
use crate::tts::validate_text;
use axum::{
    extract::{Query, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{debug, error};

const AUDIO_CACHE_CONTROL: &str = "public, max-age=86400, immutable";

#[derive(Debug, Deserialize, Default)]
pub struct SynthesizeParams {
    /// Phrase to speak
    #[serde(default)]
    pub text: String,
    /// Language code; the configured default when absent
    pub lang: Option<String>,
}

/// Create the text-to-speech router.
pub fn router() -> Router<AppState> {
    Router::new().route("/tts/synthesize", get(synthesize))
}

/// GET /tts/synthesize?text=...&lang=el-GR - Speak a phrase as MP3.
async fn synthesize(
    State(state): State<AppState>,
    Query(params): Query<SynthesizeParams>,
) -> ApiResult<Response> {
    validate_text(&params.text)?;
    let lang = params
        .lang
        .unwrap_or_else(|| state.tts_default_language.clone());

    let audio = match state.audio_cache.get(&params.text, &lang) {
        Some(cached) => {
            debug!("Serving cached audio for {}", lang);
            cached
        }
        None => {
            let audio = state
                .tts
                .synthesize(&params.text, &lang)
                .await
                .map_err(|e| {
                    error!("Synthesis failed: {}", e);
                    e
                })?;
            state.audio_cache.insert(&params.text, &lang, audio)
        }
    };

    Ok((
        [
            (CONTENT_TYPE, "audio/mpeg"),
            (CACHE_CONTROL, AUDIO_CACHE_CONTROL),
        ],
        audio.to_vec(),
    )
        .into_response())
}
