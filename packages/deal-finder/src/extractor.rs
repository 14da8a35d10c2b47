//! Extraction provider seam.
//!
//! The pipeline only sees [`DealExtractor`]; [`OpenAiExtractor`] is the
//! production implementation and `testing::MockExtractor` the test double.

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use crate::error::ExtractError;
use crate::prompts::{extraction_prompt, SYSTEM_PROMPT};
use crate::types::{Candidate, ExtractionResult};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Turns one candidate into best-effort deal fields.
///
/// Infallible by contract: implementations absorb provider failures and
/// return [`ExtractionResult::empty`], so normalization falls back to
/// defaults for every field.
#[async_trait]
pub trait DealExtractor: Send + Sync {
    async fn extract(&self, candidate: &Candidate) -> ExtractionResult;
}

/// Extraction via OpenAI chat completions in JSON mode at temperature 0.
#[derive(Clone)]
pub struct OpenAiExtractor {
    client: OpenAIClient,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(client: OpenAIClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The exact request sent for `candidate`.
    pub fn build_request(&self, candidate: &Candidate) -> Result<ChatRequest, ExtractError> {
        let candidate_json = serde_json::to_string_pretty(candidate)?;
        Ok(ChatRequest::new(&self.model)
            .message(Message::system(SYSTEM_PROMPT))
            .message(Message::user(extraction_prompt(&candidate_json)))
            .temperature(0.0)
            .json_object())
    }

    /// Like [`DealExtractor::extract`] but surfaces the failure reason.
    pub async fn try_extract(&self, candidate: &Candidate) -> Result<ExtractionResult, ExtractError> {
        let request = self.build_request(candidate)?;
        let value = self.client.json_completion(request).await?;
        ExtractionResult::try_from(value).map_err(ExtractError::NotAnObject)
    }
}

#[async_trait]
impl DealExtractor for OpenAiExtractor {
    async fn extract(&self, candidate: &Candidate) -> ExtractionResult {
        match self.try_extract(candidate).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    candidate = candidate.display_name(),
                    error = %e,
                    "Extraction failed, continuing with defaults"
                );
                ExtractionResult::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let extractor = OpenAiExtractor::new(OpenAIClient::new("sk-test"));
        let candidate = Candidate::matched("c1", "Acme Bio").with_url("https://x.com");

        let request = extractor.build_request(&candidate).unwrap();
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], Message::system(SYSTEM_PROMPT));
        assert!(request.messages[1].content.contains("\"candidate_id\": \"c1\""));

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_model_override() {
        let extractor = OpenAiExtractor::new(OpenAIClient::new("sk-test")).with_model("gpt-4o");
        assert_eq!(extractor.model(), "gpt-4o");
    }

    #[tokio::test]
    async fn test_unreachable_provider_yields_empty_result() {
        // Nothing listens on port 9 locally; the request fails fast.
        let client = OpenAIClient::new("sk-test").with_base_url("http://127.0.0.1:9");
        let extractor = OpenAiExtractor::new(client);

        let result = extractor.extract(&Candidate::matched("c1", "Acme Bio")).await;
        assert!(result.is_empty());
    }

    /// Serve one canned chat completion per connection and return the base URL.
    async fn serve_completions(contents: Vec<serde_json::Value>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for content in contents {
                let (mut socket, _) = listener.accept().await.unwrap();

                // Drain the request: headers, then Content-Length bytes of body.
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    let text = String::from_utf8_lossy(&request);
                    if let Some(end) = text.find("\r\n\r\n") {
                        let body_len = text[..end]
                            .lines()
                            .find_map(|l| {
                                let (name, value) = l.split_once(':')?;
                                name.eq_ignore_ascii_case("content-length")
                                    .then(|| value.trim().parse::<usize>().ok())
                                    .flatten()
                            })
                            .unwrap_or(0);
                        if request.len() >= end + 4 + body_len {
                            break;
                        }
                    }
                }

                let body = serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": content}}]
                })
                .to_string();
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_unusable_replies_yield_empty_result() {
        let replies = vec![
            serde_json::json!("not json"),
            serde_json::json!("[1,2]"),
            serde_json::Value::Null,
        ];
        let count = replies.len();
        let base_url = serve_completions(replies).await;
        let extractor = OpenAiExtractor::new(OpenAIClient::new("sk-test").with_base_url(base_url));

        for _ in 0..count {
            let result = extractor.extract(&Candidate::matched("c1", "Acme Bio")).await;
            assert_eq!(result, ExtractionResult::empty());
        }
    }

    #[tokio::test]
    async fn test_json_object_reply_is_returned() {
        let base_url =
            serve_completions(vec![serde_json::json!(r#"{"deal_type": "licensing"}"#)]).await;
        let extractor = OpenAiExtractor::new(OpenAIClient::new("sk-test").with_base_url(base_url));

        let result = extractor.extract(&Candidate::matched("c1", "Acme Bio")).await;
        assert_eq!(result.text("deal_type").as_deref(), Some("licensing"));
    }
}
