//! Full HTTP round trips against a spawned relay.

mod common;

use common::*;
use relay_service::config::RelayConfig;
use relay_service::services::providers::mock::MockImageProvider;
use relay_service::startup::{bind_diagnostic, Application};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

struct SpawnedApp {
    address: String,
    mock: Arc<MockImageProvider>,
    shutdown: Option<oneshot::Sender<()>>,
    server: tokio::task::JoinHandle<std::io::Result<()>>,
}

/// Spawn the application on a random port.
async fn spawn_app(mut config: RelayConfig) -> SpawnedApp {
    config.common.port = 0;
    let mock = Arc::new(MockImageProvider::answering("Blue Pepsi can left"));
    let app = Application::build_with_describer(config, mock.clone())
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.port());

    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(app.run_until(async move {
        let _ = rx.await;
    }));

    SpawnedApp {
        address,
        mock,
        shutdown: Some(tx),
        server,
    }
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = spawn_app(unconfigured_config()).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api_key_configured"], false);
}

#[tokio::test]
async fn analyze_round_trip_over_tcp() {
    let app = spawn_app(configured_config("http://unused")).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/analyze", app.address))
        .header("Origin", "http://localhost:5173")
        .json(&serde_json::json!({ "image": "data:image/jpeg;base64,aGVsbG8=" }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["analysis"], "Blue Pepsi can left");
    assert_eq!(app.mock.calls(), 1);
}

#[tokio::test]
async fn preflight_round_trip_over_tcp() {
    let app = spawn_app(unconfigured_config()).await;
    let client = Client::new();

    let response = client
        .request(reqwest::Method::OPTIONS, format!("{}/api/analyze", app.address))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.headers()["access-control-max-age"], "86400");
}

#[tokio::test]
async fn shuts_down_gracefully() {
    let mut app = spawn_app(unconfigured_config()).await;

    app.shutdown.take().unwrap().send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), app.server)
        .await
        .expect("Server did not stop")
        .expect("Server task panicked");

    assert!(result.is_ok());
}

#[tokio::test]
async fn second_bind_on_same_port_reports_port_in_use() {
    let first = spawn_app(unconfigured_config()).await;
    let port: u16 = first.address.rsplit(':').next().unwrap().parse().unwrap();

    let mut config = unconfigured_config();
    config.common.port = port;
    let mock = Arc::new(MockImageProvider::answering("unused"));
    let err = match Application::build_with_describer(config, mock).await {
        Ok(_) => panic!("Second bind on port {} should fail", port),
        Err(e) => e,
    };

    let diagnostic = bind_diagnostic(&err, port).expect("Bind failure should have a diagnostic");
    assert_eq!(
        diagnostic,
        format!("Port {} is already in use. Set PORT to a different port.", port)
    );
}
