//! REST API server for Glossa.
//!
//! Provides HTTP endpoints for:
//! - Lesson browsing
//! - Attempt analysis
//! - Speech-to-text transcription (rate limited)
//! - Text-to-speech synthesis (cached)

pub mod error;
pub mod routes;

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::lessons::{load_catalog, Catalog};
use crate::rate_limit::RateLimiter;
use crate::stt::{create_stt_service, SttService};
use crate::tts::{create_tts_service, AudioCache, TtsService};
use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handles every route can reach.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub catalog: Arc<Catalog>,
    pub stt: Arc<dyn SttService>,
    pub tts: Arc<dyn TtsService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub audio_cache: AudioCache,
    pub tts_default_language: String,
}

impl AppState {
    /// Wire up providers, catalog and limiter from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = load_catalog(config.server.lessons_path.as_deref())?;

        Ok(Self {
            analyzer: Arc::new(Analyzer::new()?),
            catalog: Arc::new(catalog),
            stt: create_stt_service(&config.stt)?,
            tts: create_tts_service(&config.tts)?,
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit.clone())),
            audio_cache: AudioCache::new(),
            tts_default_language: config.tts.default_language.clone(),
        })
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Root and version endpoints
        .route("/", get(status))
        .route("/version", get(version))
        .merge(routes::lessons::router())
        .merge(routes::attempts::router())
        .merge(routes::stt::router())
        .merge(routes::tts::router())
        .merge(routes::provider::router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

pub struct ApiServer {
    host: String,
    port: u16,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            host: config.server.host.clone(),
            port: config.server.port,
            state: AppState::from_config(config)?,
        })
    }

    pub async fn start(self) -> Result<()> {
        let app = router(self.state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("API server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  GET  /                   - Service info");
        info!("  GET  /version            - Get version info");
        info!("  GET  /lessons            - List lessons");
        info!("  GET  /lessons/:id        - Get a lesson with its exercises");
        info!("  POST /analyze            - Analyze a transcript");
        info!("  POST /attempts           - Submit an exercise attempt");
        info!("  POST /stt/transcribe     - Transcribe recorded audio");
        info!("  GET  /tts/synthesize     - Synthesize a phrase as MP3");
        info!("  GET  /provider           - Show configured speech providers");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "glossa",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "glossa"
    }))
}
