//! Test helpers shared by the relay integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use relay_service::config::{api_key_from, GeminiSettings, RelayConfig};
use relay_service::services::providers::gemini::GeminiImageProvider;
use relay_service::services::providers::mock::{MockImageProvider, MockOutcome};
use relay_service::startup::{build_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub const TEST_API_KEY: &str = "test-gemini-key-9f8e7d";
pub const TEST_MODEL: &str = "gemini-test";

/// Config with a real-looking key and a short upstream timeout.
pub fn configured_config(api_base: &str) -> RelayConfig {
    RelayConfig {
        gemini: GeminiSettings {
            api_key: api_key_from(Some(TEST_API_KEY.to_string())),
            model: TEST_MODEL.to_string(),
            api_base: api_base.to_string(),
            timeout: Duration::from_secs(5),
        },
        ..Default::default()
    }
}

pub fn unconfigured_config() -> RelayConfig {
    RelayConfig::default()
}

/// Router backed by a recording mock provider.
pub fn mock_app(config: RelayConfig, outcome: MockOutcome) -> (Router, Arc<MockImageProvider>) {
    let mock = Arc::new(MockImageProvider::new(outcome));
    let router = build_router(AppState::new(config, mock.clone()));
    (router, mock)
}

/// Router backed by the real Gemini client.
pub fn gemini_app(config: RelayConfig) -> Router {
    let provider = GeminiImageProvider::new(config.gemini.clone(), config.prompt)
        .expect("Failed to create Gemini provider");
    build_router(AppState::new(config, Arc::new(provider)))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.raw).expect("Response body is not JSON")
    }
}

pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    TestResponse {
        status,
        headers,
        raw: String::from_utf8_lossy(&bytes).to_string(),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_analyze(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn image_body(image: &str) -> String {
    serde_json::json!({ "image": image }).to_string()
}

pub fn assert_cors(response: &TestResponse) {
    assert_eq!(
        response
            .headers
            .get("access-control-allow-origin")
            .expect("missing Access-Control-Allow-Origin"),
        "*"
    );
}
