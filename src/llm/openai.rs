//! OpenAI chat-completions backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ProviderCallError, ProviderConfigError};

use super::config::{ClientConfig, TEMPERATURE, send_json};
use super::prompt::build_prompt;
use super::provider::Provider;
use super::router::SummaryBackend;
use super::types::{SummaryRequest, SummaryResponse};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiClient {
    http: Client,
    config: ClientConfig,
}

impl OpenAiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ProviderConfigError> {
        Ok(Self {
            http: config.http_client()?,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl SummaryBackend for OpenAiClient {
    async fn summarize(
        &self,
        cancel: &CancellationToken,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, ProviderCallError> {
        let system = request.platform.system_prompt();
        // The user turn repeats the persona ahead of the prompt.
        let user = format!("{}\n\n{}", system, build_prompt(request));

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: TEMPERATURE,
            max_completion_tokens: request.platform.max_tokens(),
        };

        debug!(
            "Sending {} chars to OpenAI model {}",
            user.len(),
            self.config.model
        );

        let builder = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body);

        let response: ChatResponse = send_json(Provider::OpenAi, cancel, builder).await?;

        let summary = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| ProviderCallError::EmptyResponse {
                provider: Provider::OpenAi.as_str().to_string(),
            })?;

        Ok(SummaryResponse::new(summary, request.platform))
    }

    fn provider(&self) -> Provider {
        Provider::OpenAi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Platform;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenAiClient {
        let config = ClientConfig {
            provider: Provider::OpenAi,
            api_key: "sk-test".to_string(),
            model: "gpt-4o".to_string(),
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        };
        OpenAiClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_summarize_sends_chat_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o",
                "max_completion_tokens": 150,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "  Shipped it! 🚀  " } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = SummaryRequest::new(Vec::new(), Platform::Twitter);
        let response = client(&server)
            .summarize(&CancellationToken::new(), &request)
            .await
            .unwrap();

        assert_eq!(response.summary, "Shipped it! 🚀");
        assert_eq!(response.platform, Platform::Twitter);
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let request = SummaryRequest::new(Vec::new(), Platform::Note);
        let err = client(&server)
            .summarize(&CancellationToken::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderCallError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let request = SummaryRequest::new(Vec::new(), Platform::Note);
        let err = client(&server)
            .summarize(&CancellationToken::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderCallError::Status { status: 401, ref body, .. } if body == "invalid api key"
        ));
    }

    #[tokio::test]
    async fn test_cancelled_call_resolves_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let request = SummaryRequest::new(Vec::new(), Platform::Note);
        let err = client(&server).summarize(&cancel, &request).await.unwrap_err();
        assert!(matches!(err, ProviderCallError::Cancelled { .. }));
    }
}
