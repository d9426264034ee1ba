//! Request and response shapes for the relay endpoints.

pub mod analysis;

pub use analysis::{AnalyzeRequest, AnalyzeResponse, IMAGE_MIME_TYPE};
