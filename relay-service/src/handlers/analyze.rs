use crate::models::{AnalyzeRequest, AnalyzeResponse, IMAGE_MIME_TYPE};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use std::time::Instant;

/// `POST /api/analyze`: validate, describe the image upstream, return the text.
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if !state.config.api_key_configured() {
        tracing::warn!("Rejecting analyze request: GEMINI_API_KEY not configured");
        return Err(AppError::NotConfigured {
            error: "GEMINI_API_KEY environment variable not set".to_string(),
            message: "Please set the GEMINI_API_KEY environment variable".to_string(),
        });
    }

    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!(
                "Image is too large. Please try a smaller image (max {} bytes)",
                state.config.max_body_bytes
            ))
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })?;

    let request = AnalyzeRequest::parse(&body)?;
    let image = request
        .decode_image()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Invalid base64 image data: {}", e)))?;

    let started = Instant::now();
    let description = state
        .describer
        .describe_image(&image, IMAGE_MIME_TYPE)
        .await
        .map_err(|e| {
            tracing::warn!(
                provider = state.describer.name(),
                error = %e,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Image description failed"
            );
            e.into_app_error(state.describer.name())
        })?;

    tracing::info!(
        model = %description.model,
        image_bytes = image.len(),
        analysis_len = description.text.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Image analyzed"
    );

    Ok(Json(AnalyzeResponse::new(description.text, description.model)))
}
