use crate::services::prompts::PromptVariant;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Name reported by the health endpoints and used for log/trace resources.
pub const SERVICE_NAME: &str = "braille-relay";

/// Default Gemini REST base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 50MB, large enough for full-resolution camera captures.
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Values shipped in sample setups that must not be treated as real keys.
const API_KEY_PLACEHOLDERS: &[&str] = &["your-api-key-here", "YOUR_GEMINI_API_KEY_HERE"];

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub prompt: PromptVariant,
    pub max_body_bytes: usize,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// `None` when the key is unset, empty, or a placeholder.
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl GeminiSettings {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            gemini: GeminiSettings::default(),
            prompt: PromptVariant::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_level: "info".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(RelayConfig {
            common,
            gemini: GeminiSettings {
                api_key: api_key_from(env::var("GEMINI_API_KEY").ok()),
                model: get_env("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                api_base: get_env("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
                timeout: Duration::from_secs(parse_env(
                    "GEMINI_TIMEOUT_SECS",
                    DEFAULT_TIMEOUT_SECS,
                )?),
            },
            prompt: parse_env("RELAY_PROMPT_VARIANT", PromptVariant::default())?,
            max_body_bytes: parse_env("RELAY_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            log_level: get_env("LOG_LEVEL", "info"),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }

    pub fn api_key_configured(&self) -> bool {
        self.gemini.is_configured()
    }
}

/// Normalize a raw key value, rejecting blanks and known placeholders.
pub fn api_key_from(raw: Option<String>) -> Option<Secret<String>> {
    raw.map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty() && !API_KEY_PLACEHOLDERS.contains(&key.as_str()))
        .map(Secret::new)
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_value(key, &raw),
        _ => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn placeholder_keys_are_unconfigured() {
        assert!(api_key_from(None).is_none());
        assert!(api_key_from(Some(String::new())).is_none());
        assert!(api_key_from(Some("   ".into())).is_none());
        assert!(api_key_from(Some("your-api-key-here".into())).is_none());
        assert!(api_key_from(Some("YOUR_GEMINI_API_KEY_HERE".into())).is_none());
    }

    #[test]
    fn real_key_is_kept_and_trimmed() {
        let key = api_key_from(Some(" AIza-real-key \n".into())).unwrap();
        assert_eq!(key.expose_secret(), "AIza-real-key");
    }

    #[test]
    fn debug_output_never_contains_key() {
        let config = RelayConfig {
            gemini: GeminiSettings {
                api_key: api_key_from(Some("super-secret-key".into())),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.api_key_configured());
        assert!(!format!("{:?}", config).contains("super-secret-key"));
    }

    #[test]
    fn parse_value_reports_key_on_failure() {
        let err = parse_value::<u64>("GEMINI_TIMEOUT_SECS", "soon").unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("GEMINI_TIMEOUT_SECS"));

        let variant: PromptVariant = parse_value("RELAY_PROMPT_VARIANT", "description").unwrap();
        assert_eq!(variant, PromptVariant::Description);
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = RelayConfig::default();
        assert_eq!(config.common.port, 8000);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.timeout, Duration::from_secs(30));
        assert_eq!(config.prompt, PromptVariant::Label);
        assert!(!config.api_key_configured());
    }
}
