//! Chat-completion client for `OpenAI` and Azure `OpenAI`

use crate::config::LlmConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";

/// A model that answers a system + user prompt pair with a JSON object string.
///
/// The judge and the extractor only depend on this trait, so tests can swap in
/// a scripted backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// # Errors
    /// Returns an error if the request fails or the response has no content.
    async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Where completion requests are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    /// `OpenAI`-compatible API with bearer authentication
    OpenAi { base_url: String },
    /// Azure `OpenAI` deployment with `api-key` authentication
    Azure {
        endpoint: String,
        api_version: String,
    },
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi { base_url } => write!(f, "OpenAI ({base_url})"),
            Self::Azure { endpoint, .. } => write!(f, "Azure OpenAI ({endpoint})"),
        }
    }
}

/// HTTP chat-completion client
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    api_key: String,
    http_client: reqwest::Client,
    provider: Provider,
    config: LlmConfig,
}

/// Chat API request
#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: usize,
    temperature: f32,
    response_format: ResponseFormat,
}

/// Response format specification
#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat API response
#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAIClient {
    /// Create a client from environment credentials
    ///
    /// Azure is used when both `AZURE_OPENAI_ENDPOINT` and `AZURE_OPENAI_KEY`
    /// are set (`AZURE_OPENAI_API_VERSION` defaults to "2024-02-01").
    /// Otherwise `OPENAI_API_KEY` is required and `OPENAI_API_BASE` is optional.
    ///
    /// # Errors
    /// Returns an error if no credentials are set or HTTP client creation fails.
    #[must_use = "creating a client that is not used is a waste of resources"]
    pub fn new(config: LlmConfig) -> Result<Self> {
        let (provider, api_key) = match (
            env::var("AZURE_OPENAI_ENDPOINT"),
            env::var("AZURE_OPENAI_KEY"),
        ) {
            (Ok(endpoint), Ok(key)) => {
                let api_version = env::var("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|_| DEFAULT_AZURE_API_VERSION.to_string());
                (
                    Provider::Azure {
                        endpoint: endpoint.trim_end_matches('/').to_string(),
                        api_version,
                    },
                    key,
                )
            }
            _ => {
                let key = env::var("OPENAI_API_KEY").context(
                    "OPENAI_API_KEY environment variable not set (or set AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_KEY)",
                )?;
                let base_url =
                    env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_OPENAI_BASE.to_string());
                (
                    Provider::OpenAi {
                        base_url: base_url.trim_end_matches('/').to_string(),
                    },
                    key,
                )
            }
        };

        Self::with_provider(provider, api_key, config)
    }

    /// Create a client for an explicit provider
    ///
    /// # Errors
    /// Returns an error if HTTP client creation fails.
    pub fn with_provider(provider: Provider, api_key: String, config: LlmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        log::debug!("Using {provider} with model {}", config.model);

        Ok(Self {
            api_key,
            http_client,
            provider,
            config,
        })
    }

    #[inline]
    #[must_use]
    pub const fn provider(&self) -> &Provider {
        &self.provider
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Chat-completions URL for the configured provider
    #[must_use]
    pub fn completions_url(&self) -> String {
        match &self.provider {
            Provider::OpenAi { base_url } => format!("{base_url}/chat/completions"),
            Provider::Azure {
                endpoint,
                api_version,
            } => format!(
                "{endpoint}/openai/deployments/{}/chat/completions?api-version={api_version}",
                self.config.model
            ),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAIClient {
    async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let builder = self.http_client.post(self.completions_url());
        let builder = match self.provider {
            Provider::OpenAi { .. } => {
                builder.header("Authorization", format!("Bearer {}", self.api_key))
            }
            Provider::Azure { .. } => builder.header("api-key", &self.api_key),
        };

        let response = builder
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read chat completion response")?;

        if !status.is_success() {
            anyhow::bail!("Chat completion request failed with status {status}: {response_text}");
        }

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .context("Failed to parse chat completion response")?;

        let message_content = chat_response
            .choices
            .into_iter()
            .next()
            .context("No choices in chat completion response")?
            .message
            .content
            .context("No content in response")?;

        Ok(message_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_credentials() {
        for var in [
            "AZURE_OPENAI_ENDPOINT",
            "AZURE_OPENAI_KEY",
            "AZURE_OPENAI_API_VERSION",
            "OPENAI_API_KEY",
            "OPENAI_API_BASE",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_client_creation_requires_api_key() {
        let original = env::var("OPENAI_API_KEY").ok();
        clear_credentials();

        let result = OpenAIClient::new(LlmConfig::default());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("OPENAI_API_KEY"));

        if let Some(key) = original {
            env::set_var("OPENAI_API_KEY", key);
        }
    }

    #[test]
    #[serial]
    fn test_openai_client_from_env() {
        clear_credentials();
        env::set_var("OPENAI_API_KEY", "test-key");
        env::set_var("OPENAI_API_BASE", "https://custom.api.com/v1/");

        let client = OpenAIClient::new(LlmConfig::default()).unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(
            client.completions_url(),
            "https://custom.api.com/v1/chat/completions"
        );

        clear_credentials();
    }

    #[test]
    #[serial]
    fn test_azure_takes_precedence() {
        clear_credentials();
        env::set_var("OPENAI_API_KEY", "openai-key");
        env::set_var("AZURE_OPENAI_ENDPOINT", "https://forms.openai.azure.com/");
        env::set_var("AZURE_OPENAI_KEY", "azure-key");

        let config = LlmConfig {
            model: "forms-gpt4o".to_string(),
            ..LlmConfig::default()
        };
        let client = OpenAIClient::new(config).unwrap();
        assert_eq!(client.api_key, "azure-key");
        assert_eq!(
            client.completions_url(),
            "https://forms.openai.azure.com/openai/deployments/forms-gpt4o/chat/completions?api-version=2024-02-01"
        );

        clear_credentials();
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "gpt-4o",
            messages: [
                Message {
                    role: "system",
                    content: "sys",
                },
                Message {
                    role: "user",
                    content: "שלום",
                },
            ],
            max_tokens: 2000,
            temperature: 0.1,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][1]["content"], "שלום");
        assert_eq!(value["messages"][0]["role"], "system");
    }

    #[test]
    fn test_provider_display() {
        let provider = Provider::Azure {
            endpoint: "https://x.openai.azure.com".into(),
            api_version: "2024-02-01".into(),
        };
        assert_eq!(provider.to_string(), "Azure OpenAI (https://x.openai.azure.com)");
    }
}
