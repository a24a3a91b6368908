//! Router tests against mock speech providers.

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use glossa::analyzer::Analyzer;
use glossa::api::{router, AppState};
use glossa::config::RateLimitConfig;
use glossa::lessons::{builtin_catalog, Catalog, Exercise, Lesson};
use glossa::rate_limit::RateLimiter;
use glossa::stt::{MockSttService, MAX_AUDIO_SIZE_BYTES};
use glossa::tts::{AudioCache, MockTtsService, TTS_MAX_TEXT_LENGTH};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const BOUNDARY: &str = "glossa-test-boundary";

fn test_state_with_limits(limits: RateLimitConfig) -> AppState {
    AppState {
        analyzer: Arc::new(Analyzer::new().unwrap()),
        catalog: Arc::new(builtin_catalog()),
        stt: Arc::new(
            MockSttService::new()
                .unwrap()
                .with_latency(Duration::ZERO),
        ),
        tts: Arc::new(MockTtsService::new().with_latency(Duration::ZERO)),
        rate_limiter: Arc::new(RateLimiter::new(limits)),
        audio_cache: AudioCache::new(),
        tts_default_language: "el-GR".to_string(),
    }
}

fn test_state() -> AppState {
    test_state_with_limits(RateLimitConfig::default())
}

fn app(state: &AppState) -> Router {
    router(state.clone())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_audio(body: Vec<u8>, mime_type: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/stt/transcribe")
        .header(header::CONTENT_TYPE, mime_type)
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::from(body))
        .unwrap()
}

fn post_multipart(field_name: &str, part_type: &str, audio: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"clip\"\r\n",
            field_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part_type).as_bytes());
    body.extend_from_slice(audio);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/stt/transcribe")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_service_info() {
    let state = test_state();
    let (status, body) = send_json(app(&state), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "glossa");
    assert_eq!(body["status"], "running");

    let (status, body) = send_json(app(&state), get("/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_list_and_get_lessons() {
    let state = test_state();
    let (status, body) = send_json(app(&state), get("/lessons")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "greetings");
    assert_eq!(body[0]["exerciseCount"], 3);

    let (status, body) = send_json(app(&state), get("/lessons/greetings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exercises"][0]["id"], "greetings-1");
    assert_eq!(body["exercises"][0]["type"], "speaking");
    assert_eq!(body["exercises"][0]["requiredWords"], r#"["Γεια","λένε"]"#);
}

#[tokio::test]
async fn test_unknown_lesson_is_not_found() {
    let state = test_state();
    let (status, body) = send_json(app(&state), get("/lessons/cooking")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_analyze() {
    let state = test_state();
    let (status, body) = send_json(
        app(&state),
        post_json(
            "/analyze",
            json!({
                "transcript": "Γεια σου, με λένε Νίκο",
                "requiredWords": ["Γεια", "λένε"],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "outcome": "pass" }));

    let (_, body) = send_json(
        app(&state),
        post_json(
            "/analyze",
            json!({
                "transcript": "Καλημέρα",
                "confidence": 0.95,
                "requiredWords": ["Γεια", "λένε"],
            }),
        ),
    )
    .await;
    assert_eq!(body["outcome"], "retry");
    assert_eq!(body["reason"], "Try again — include: Γεια, λένε");
}

#[tokio::test]
async fn test_submit_attempt() {
    let state = test_state();
    let (status, body) = send_json(
        app(&state),
        post_json(
            "/attempts",
            json!({ "exerciseId": "greetings-2", "transcript": "Τι κάνεις;" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exerciseId"], "greetings-2");
    assert_eq!(body["outcome"], "pass");
    assert_eq!(body["sttConfidence"], 1.0);
}

#[tokio::test]
async fn test_attempt_on_unknown_exercise() {
    let state = test_state();
    let (status, body) = send_json(
        app(&state),
        post_json(
            "/attempts",
            json!({ "exerciseId": "greetings-99", "transcript": "Γεια" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_json_body_gets_error_envelope() {
    let state = test_state();
    for uri in ["/analyze", "/attempts"] {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"transcript\": "))
            .unwrap();

        let (status, body) = send_json(app(&state), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_attempt_on_corrupt_exercise_is_an_error() {
    let mut state = test_state();
    state.catalog = Arc::new(Catalog::new(vec![Lesson {
        id: "broken".to_string(),
        title: "Broken".to_string(),
        description: "Truncated word list.".to_string(),
        order: 1,
        exercises: vec![Exercise {
            id: "broken-1".to_string(),
            kind: "speaking".to_string(),
            prompt: "Say yes.".to_string(),
            expected_phrase: "ναι".to_string(),
            required_words_json: r#"["ναι""#.to_string(),
            allowed_variants_json: r#"["ναι"]"#.to_string(),
            order: 1,
        }],
    }]));

    let (status, body) = send_json(
        app(&state),
        post_json(
            "/attempts",
            json!({ "exerciseId": "broken-1", "transcript": "όχι" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_transcribe_raw_body() {
    let state = test_state();
    let (status, body) = send_json(app(&state), post_audio(vec![1, 2, 3, 4], "audio/webm")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["transcript"], "Γεια σου με λένε Μαρία");
    assert_eq!(body["normalizedTranscript"], "γεια σου με λενε μαρια");
    assert_eq!(body["confidence"], 0.95);
    assert_eq!(body["languageCode"], "el");
}

#[tokio::test]
async fn test_transcribe_accepts_codec_parameters() {
    let state = test_state();
    let (status, _) = send_json(
        app(&state),
        post_audio(vec![1, 2, 3], "audio/ogg; codecs=opus"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_transcribe_multipart() {
    let state = test_state();
    let (status, body) = send_json(app(&state), post_multipart("audio", "audio/wav", b"RIFF")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["transcript"], "Γεια σου με λένε Μαρία");
}

#[tokio::test]
async fn test_transcribe_multipart_without_audio_field() {
    let state = test_state();
    let (status, body) = send_json(app(&state), post_multipart("file", "audio/wav", b"RIFF")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_transcribe_rejects_unsupported_format() {
    let state = test_state();
    let (status, body) = send_json(app(&state), post_audio(vec![1, 2, 3], "audio/flac")).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
}

#[tokio::test]
async fn test_transcribe_rejects_empty_body() {
    let state = test_state();
    let (status, body) = send_json(app(&state), post_audio(Vec::new(), "audio/webm")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_transcribe_rejects_declared_oversize() {
    let state = test_state();
    let mut request = post_audio(vec![1, 2, 3], "audio/webm");
    request.headers_mut().insert(
        header::CONTENT_LENGTH,
        (MAX_AUDIO_SIZE_BYTES + 1).to_string().parse().unwrap(),
    );

    let (status, body) = send_json(app(&state), request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "REQUEST_TOO_LARGE");
}

#[tokio::test]
async fn test_transcribe_rejects_oversize_body() {
    let state = test_state();
    let (status, body) = send_json(
        app(&state),
        post_audio(vec![0; MAX_AUDIO_SIZE_BYTES + 1], "audio/webm"),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "REQUEST_TOO_LARGE");
}

#[tokio::test]
async fn test_transcribe_is_rate_limited_per_client() {
    let state = test_state_with_limits(RateLimitConfig {
        per_minute: 2,
        per_hour: 50,
        global_per_hour: 500,
    });

    for _ in 0..2 {
        let (status, _, _) = send(app(&state), post_audio(vec![1], "audio/webm")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, headers, body) = send(app(&state), post_audio(vec![1], "audio/webm")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(headers[header::RETRY_AFTER], "60");
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], "RATE_LIMITED");

    // A different client still gets through
    let mut request = post_audio(vec![1], "audio/webm");
    request
        .headers_mut()
        .insert("x-forwarded-for", "198.51.100.1".parse().unwrap());
    let (status, _, _) = send(app(&state), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_synthesize_returns_cached_mp3() {
    let state = test_state();
    let uri = "/tts/synthesize?text=%CE%93%CE%B5%CE%B9%CE%B1&lang=el-GR";

    let (status, headers, first) = send(app(&state), get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "public, max-age=86400, immutable"
    );
    assert_eq!(first[0], 0xFF);
    assert_eq!(state.audio_cache.len(), 1);
    assert!(state.audio_cache.get("Γεια", "el-GR").is_some());

    let (status, _, second) = send(app(&state), get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(state.audio_cache.len(), 1);
}

#[tokio::test]
async fn test_synthesize_defaults_language() {
    let state = test_state();
    let (status, _, _) = send(app(&state), get("/tts/synthesize?text=kalimera")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.audio_cache.get("kalimera", "el-GR").is_some());
}

#[tokio::test]
async fn test_synthesize_validation() {
    let state = test_state();
    let (status, body) = send_json(app(&state), get("/tts/synthesize")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let uri = format!("/tts/synthesize?text={}", "a".repeat(TTS_MAX_TEXT_LENGTH + 1));
    let (status, body) = send_json(app(&state), get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "TEXT_TOO_LONG");
    assert!(state.audio_cache.is_empty());
}

#[tokio::test]
async fn test_provider_names() {
    let state = test_state();
    let (status, body) = send_json(app(&state), get("/provider")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stt"], "Mock STT");
    assert_eq!(body["tts"], "Mock TTS");
    assert_eq!(body["ttsDefaultLanguage"], "el-GR");
}
