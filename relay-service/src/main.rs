use relay_service::config::{RelayConfig, SERVICE_NAME};
use relay_service::startup::{bind_diagnostic, Application};
use service_core::observability::init_tracing;
use tokio::signal;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = RelayConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        SERVICE_NAME,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    let port = config.common.port;
    let key_configured = config.api_key_configured();
    let model = config.gemini.model.clone();
    let prompt = config.prompt;

    let app = Application::build(config).await.map_err(|e| {
        match bind_diagnostic(&e, port) {
            Some(diagnostic) => eprintln!("{}", diagnostic),
            None => eprintln!("Failed to start {}: {}", SERVICE_NAME, e),
        }
        std::io::Error::other(e.to_string())
    })?;

    println!("Braille relay listening on http://localhost:{}", app.port());
    println!(
        "Gemini API key: {}",
        if key_configured {
            "set"
        } else {
            "not set (POST /api/analyze will fail until GEMINI_API_KEY is provided)"
        }
    );
    println!("Model: {} | prompt: {}", model, prompt);
    println!("Press Ctrl+C to stop the server");

    tracing::info!(
        port = app.port(),
        api_key_configured = key_configured,
        model = %model,
        prompt = %prompt,
        "Starting {}",
        SERVICE_NAME
    );

    app.run_until(shutdown_signal()).await?;

    println!("Server stopped");
    Ok(())
}
