//! Configuration for chat-completion calls

use std::env;

/// Settings shared by the judge and the field extractor
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Model name, or deployment name on Azure (e.g., "gpt-4o")
    pub model: String,

    /// Maximum tokens for the model response
    pub max_tokens: usize,

    /// Sampling temperature; kept low so repeated runs agree
    pub temperature: f32,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `LLM_MODEL`: Model name (default: `AZURE_OPENAI_DEPLOYMENT_NAME`, then "gpt-4o")
    /// - `LLM_MAX_TOKENS`: Max tokens (default: 2000)
    /// - `LLM_TEMPERATURE`: Temperature (default: 0.1)
    /// - `LLM_TIMEOUT_SECS`: Request timeout (default: 120)
    #[must_use = "creates config from environment variables"]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model = env::var("LLM_MODEL")
            .or_else(|_| env::var("AZURE_OPENAI_DEPLOYMENT_NAME"))
            .unwrap_or(defaults.model);

        let max_tokens = env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_tokens);

        let temperature = env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.temperature);

        let timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            model,
            max_tokens,
            temperature,
            timeout_secs,
        }
    }
}

impl Default for LlmConfig {
    #[inline]
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 2000,
            temperature: 0.1,
            timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("LLM_MODEL", "gpt-4o-mini");
        env::set_var("LLM_MAX_TOKENS", "4096");
        env::set_var("LLM_TEMPERATURE", "0.0");
        env::set_var("LLM_TIMEOUT_SECS", "30");

        let config = LlmConfig::from_env();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.timeout_secs, 30);

        env::remove_var("LLM_MODEL");
        env::remove_var("LLM_MAX_TOKENS");
        env::remove_var("LLM_TEMPERATURE");
        env::remove_var("LLM_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_deployment_name_is_model_fallback() {
        env::remove_var("LLM_MODEL");
        env::set_var("AZURE_OPENAI_DEPLOYMENT_NAME", "forms-gpt4o");

        assert_eq!(LlmConfig::from_env().model, "forms-gpt4o");

        env::remove_var("AZURE_OPENAI_DEPLOYMENT_NAME");
    }

    #[test]
    #[serial]
    fn test_unparsable_values_use_defaults() {
        env::set_var("LLM_MAX_TOKENS", "lots");

        assert_eq!(LlmConfig::from_env().max_tokens, 2000);

        env::remove_var("LLM_MAX_TOKENS");
    }
}
