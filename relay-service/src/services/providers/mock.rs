//! Mock provider implementation for testing.

use super::{ImageDescriber, ImageDescription, ProviderError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Text(String),
    Upstream { status: u16, body: String },
    Unexpected(String),
}

/// Mock image provider that records every call it receives.
pub struct MockImageProvider {
    outcome: MockOutcome,
    calls: AtomicUsize,
    last_call: Mutex<Option<(Vec<u8>, String)>>,
}

impl MockImageProvider {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    pub fn answering(text: &str) -> Self {
        Self::new(MockOutcome::Text(text.to_string()))
    }

    /// Number of `describe_image` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Image bytes and MIME type of the most recent call.
    pub fn last_call(&self) -> Option<(Vec<u8>, String)> {
        self.last_call
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageDescriber for MockImageProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn describe_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ImageDescription, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_call.lock() {
            *last = Some((image.to_vec(), mime_type.to_string()));
        }

        match &self.outcome {
            MockOutcome::Text(text) => Ok(ImageDescription {
                text: text.trim().to_string(),
                model: "mock-model".to_string(),
            }),
            MockOutcome::Upstream { status, body } => Err(ProviderError::Upstream {
                status: *status,
                body: body.clone(),
            }),
            MockOutcome::Unexpected(raw) => Err(ProviderError::UnexpectedResponse(raw.clone())),
        }
    }
}
