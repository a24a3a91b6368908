//! Provider API routes.

use crate::api::AppState;
use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;

/// Names of the speech providers behind this server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub stt: &'static str,
    pub tts: &'static str,
    pub tts_default_language: String,
}

/// Create the provider router.
pub fn router() -> Router<AppState> {
    Router::new().route("/provider", get(get_config))
}

/// GET /provider - Get provider configuration.
async fn get_config(State(state): State<AppState>) -> Json<ProviderInfo> {
    Json(ProviderInfo {
        stt: state.stt.name(),
        tts: state.tts.name(),
        tts_default_language: state.tts_default_language.clone(),
    })
}
