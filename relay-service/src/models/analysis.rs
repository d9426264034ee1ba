use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use service_core::error::AppError;

/// MIME type every image is tagged with upstream.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

const DATA_URL_MARKER: &str = "data:image";

/// Clients are inconsistent about padding and trailing bits, so accept both.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Body of `POST /api/analyze` after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    /// Base64 payload with any data-URL header removed.
    pub image: String,
}

impl AnalyzeRequest {
    /// Validate a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| AppError::BadRequest("Invalid JSON in request body".to_string()))?;

        let image = value
            .get("image")
            .and_then(Value::as_str)
            .map(strip_data_url_prefix)
            .filter(|payload| !payload.is_empty())
            .ok_or_else(|| AppError::BadRequest("No image data provided".to_string()))?;

        Ok(Self {
            image: image.to_string(),
        })
    }

    /// Decode the base64 payload into raw image bytes. Line breaks and other
    /// ASCII whitespace inside the payload are ignored.
    pub fn decode_image(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let compact: Vec<u8> = self
            .image
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        LENIENT_BASE64.decode(compact)
    }
}

/// Drop a `data:image/...;base64,` header, keeping everything after the
/// first comma. A header without a comma leaves no payload.
pub fn strip_data_url_prefix(image: &str) -> &str {
    if !image.starts_with(DATA_URL_MARKER) {
        return image;
    }
    match image.split_once(',') {
        Some((_, payload)) => payload,
        None => "",
    }
}

/// Successful analysis envelope.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: String,
    pub timestamp: String,
    pub model: String,
}

impl AnalyzeResponse {
    pub fn new(analysis: String, model: String) -> Self {
        Self {
            success: true,
            analysis,
            timestamp: now_timestamp(),
            model,
        }
    }
}

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
