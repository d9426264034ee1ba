//! Gemini AI provider implementation.
//!
//! Calls the `generateContent` REST method with an instruction prompt and one
//! inline image, and pulls the text out of the first candidate.

use super::{ImageDescriber, ImageDescription, ProviderError};
use crate::config::GeminiSettings;
use crate::services::prompts::PromptVariant;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Header carrying the API key. Keeps the key out of URLs and error strings.
const API_KEY_HEADER: &str = "x-goog-api-key";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Gemini image provider.
pub struct GeminiImageProvider {
    settings: GeminiSettings,
    prompt: PromptVariant,
    client: Client,
}

impl GeminiImageProvider {
    pub fn new(settings: GeminiSettings, prompt: PromptVariant) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ProviderError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            settings,
            prompt,
            client,
        })
    }

    /// Build the API URL for the configured model and the given method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.model,
            method
        )
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.settings.timeout)
        } else {
            ProviderError::NetworkError(err.without_url().to_string())
        }
    }
}

#[async_trait]
impl ImageDescriber for GeminiImageProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ImageDescription, ProviderError> {
        let api_key = self.settings.api_key.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured("GEMINI_API_KEY environment variable not set".to_string())
        })?;

        let request = build_request(self.prompt.template(), image, mime_type);

        tracing::debug!(
            model = %self.settings.model,
            prompt = %self.prompt,
            image_bytes = image.len(),
            "Sending image to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Gemini API returned an error status");
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        match extract_text(&body) {
            Some(text) => Ok(ImageDescription {
                text,
                model: self.settings.model.clone(),
            }),
            None => {
                tracing::warn!(
                    body_len = body.len(),
                    "Gemini API response had no usable text"
                );
                Err(ProviderError::UnexpectedResponse(body))
            }
        }
    }
}

/// Build the `generateContent` body: prompt first, then the image.
fn build_request(prompt: &str, image: &[u8], mime_type: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![
                RequestPart::Text {
                    text: prompt.to_string(),
                },
                RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.to_string(),
                        data: STANDARD.encode(image),
                    },
                },
            ],
        }],
        safety_settings: SAFETY_CATEGORIES
            .iter()
            .map(|category| SafetySetting {
                category: category.to_string(),
                threshold: "BLOCK_NONE".to_string(),
            })
            .collect(),
    }
}

/// Concatenated, trimmed text of the first candidate; `None` when the body
/// is not a recognizable response or carries no text.
fn extract_text(body: &str) -> Option<String> {
    let response: GenerateContentResponse = serde_json::from_str(body).ok()?;
    let content = response.candidates.into_iter().next()?.content?;

    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}
