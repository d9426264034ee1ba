pub mod prompts;
pub mod providers;

pub use prompts::PromptVariant;
pub use providers::{ImageDescriber, ImageDescription, ProviderError};
