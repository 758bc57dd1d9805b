//! Configuration for the SmartAgent service.
//!
//! Loaded once at startup from environment variables (after `.env`), then
//! passed explicitly to the strategy factory and the HTTP layer.

use crate::error::{AgentError, Result};

/// Default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8000;

/// Lead file used when a run request does not name one.
pub const DEFAULT_CSV_PATH: &str = "data/sample_leads.csv";

/// Service configuration.
#[derive(Clone)]
pub struct AgentConfig {
    use_openai: bool,
    api_key: String,
    model: String,
    base_url: String,
    timeout_seconds: u64,
    port: u16,
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("use_openai", &self.use_openai)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("port", &self.port)
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            use_openai: false,
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            port: DEFAULT_PORT,
        }
    }
}

/// Interpret a boolean-ish environment value.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

impl AgentConfig {
    /// Create a new configuration with defaults (offline strategy).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - USE_OPENAI: `1`/`true`/`yes` selects the OpenAI-backed strategy
    /// - OPENAI_API_KEY: required when USE_OPENAI is set
    /// - OPENAI_MODEL: chat model name
    /// - OPENAI_BASE_URL: API root
    /// - OPENAI_TIMEOUT_SECONDS: request timeout
    /// - PORT: listening port
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] when the OpenAI strategy is selected
    /// without an API key.
    pub fn from_env() -> Result<Self> {
        let use_openai = std::env::var("USE_OPENAI")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let api_key = std::env::var("OPENAI_API_KEY")
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        let model = std::env::var("OPENAI_MODEL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_seconds = std::env::var("OPENAI_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let config = Self {
            use_openai,
            api_key,
            model,
            base_url,
            timeout_seconds,
            port,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the selected strategy has what it needs.
    pub fn validate(&self) -> Result<()> {
        if self.use_openai && self.api_key.trim().is_empty() {
            return Err(AgentError::Config(
                "USE_OPENAI is true but OPENAI_API_KEY is not set".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the OpenAI-backed strategy is selected.
    pub fn use_openai(&self) -> bool {
        self.use_openai
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the timeout in seconds.
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Get the listening port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Select or deselect the OpenAI-backed strategy.
    pub fn with_openai(mut self, enabled: bool) -> Self {
        self.use_openai = enabled;
        self
    }

    /// Set the API key.
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the model.
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the listening port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Get the chat completions endpoint URL.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AgentConfig::default();
        assert!(!config.use_openai());
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.port(), DEFAULT_PORT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AgentConfig::new()
            .with_openai(true)
            .with_api_key("sk-test")
            .with_model("gpt-4o-mini")
            .with_base_url("http://localhost:9999/v1")
            .with_timeout(5);

        assert!(config.use_openai());
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.timeout_seconds(), 5);
        assert_eq!(
            config.chat_completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_openai_without_key_is_rejected() {
        let config = AgentConfig::new().with_openai(true).with_api_key("   ");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_parse_flag() {
        for v in ["1", "true", "TRUE", "Yes", " yes "] {
            assert!(parse_flag(v), "{v:?} should be true");
        }
        for v in ["", "0", "false", "no", "on", "y"] {
            assert!(!parse_flag(v), "{v:?} should be false");
        }
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = AgentConfig::new().with_api_key("sk-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }
}
