//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::handlers::{analyze::analyze, health, not_found};
use crate::services::providers::gemini::GeminiImageProvider;
use crate::services::providers::ImageDescriber;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use std::future::Future;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub describer: Arc<dyn ImageDescriber>,
}

impl AppState {
    pub fn new(config: RelayConfig, describer: Arc<dyn ImageDescriber>) -> Self {
        Self {
            config: Arc::new(config),
            describer,
        }
    }
}

/// Build the relay router with CORS, tracing, and body limits applied.
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_check).fallback(not_found))
        .route("/api/test", get(health::api_test).fallback(not_found))
        .route("/api/analyze", post(analyze).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri().path(),
            )
        }))
        .layer(from_fn(request_id_middleware))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .max_age(CORS_MAX_AGE),
        )
}

/// Operator-facing message for a listener that could not be bound, or `None`
/// when the error is not a socket error.
pub fn bind_diagnostic(err: &AppError, port: u16) -> Option<String> {
    let AppError::InternalError(inner) = err else {
        return None;
    };
    let io = inner.downcast_ref::<std::io::Error>()?;
    Some(match io.kind() {
        ErrorKind::AddrInUse => format!(
            "Port {} is already in use. Set PORT to a different port.",
            port
        ),
        _ => format!("Could not listen on port {}: {}", port, io),
    })
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the Gemini provider.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let provider = GeminiImageProvider::new(config.gemini.clone(), config.prompt)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        tracing::info!(
            model = %config.gemini.model,
            prompt = %config.prompt,
            timeout_secs = config.gemini.timeout.as_secs(),
            "Initialized Gemini image provider"
        );

        Self::build_with_describer(config, Arc::new(provider)).await
    }

    /// Build the application around any describer (port 0 = random port).
    pub async fn build_with_describer(
        config: RelayConfig,
        describer: Arc<dyn ImageDescriber>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, describer),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(std::future::pending()).await
    }
}
