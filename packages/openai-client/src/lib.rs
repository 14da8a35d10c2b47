//! Pure OpenAI REST API client
//!
//! A minimal client for the OpenAI chat completions API with no
//! domain-specific logic. Supports plain completions and JSON-mode
//! completions that come back as a parsed `serde_json::Value`.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o-mini").message(Message::user("Hello!")),
//! ).await?;
//!
//! let fields = client.json_completion(
//!     ChatRequest::new("gpt-4o-mini")
//!         .message(Message::system("Return only valid JSON."))
//!         .message(Message::user("Extract the company name from ..."))
//!         .temperature(0.0),
//! ).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Self::try_new(api_key)
    }

    /// Like [`OpenAIClient::new`] but rejects a blank key up front.
    pub fn try_new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OpenAIError::Config("OpenAI API key is empty".into()));
        }
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get the first choice back.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OpenAIError::EmptyResponse("no message content from OpenAI".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(ChatResponse { content })
    }

    /// JSON-mode chat completion.
    ///
    /// Forces `response_format = json_object` and parses the reply body.
    pub async fn json_completion(&self, request: ChatRequest) -> Result<serde_json::Value> {
        let response = self.chat_completion(request.json_object()).await?;
        parse_json_content(&response.content)
    }
}

/// Parse a model reply as JSON, tolerating markdown fences.
pub fn parse_json_content(content: &str) -> Result<serde_json::Value> {
    serde_json::from_str(strip_code_blocks(content))
        .map_err(|e| OpenAIError::Parse(format!("Failed to deserialize response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test").with_base_url("https://custom.api.com/");

        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.base_url(), "https://custom.api.com");
    }

    #[test]
    fn test_try_new_rejects_blank_key() {
        assert!(matches!(
            OpenAIClient::try_new("   "),
            Err(OpenAIError::Config(_))
        ));
        assert!(OpenAIClient::try_new("sk-live").is_ok());
    }

    #[test]
    fn test_parse_json_content() {
        let value = parse_json_content("```json\n{\"deal_type\": null}\n```").unwrap();
        assert!(value["deal_type"].is_null());

        assert!(matches!(
            parse_json_content("Sorry, I cannot help with that."),
            Err(OpenAIError::Parse(_))
        ));
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let client = OpenAIClient::new("sk-test").with_base_url("http://127.0.0.1:9");
        let result = tokio_test::block_on(client.chat_completion(ChatRequest::new("gpt-4o-mini")));
        assert!(matches!(result, Err(OpenAIError::Network(_))));
    }
}
