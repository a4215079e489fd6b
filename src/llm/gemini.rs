//! Google Gemini `generateContent` backend.

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
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

pub struct GeminiClient {
    http: Client,
    config: ClientConfig,
}

impl GeminiClient {
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
impl SummaryBackend for GeminiClient {
    async fn summarize(
        &self,
        cancel: &CancellationToken,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, ProviderCallError> {
        let text = format!(
            "{}\n\n--- TASK ---\n{}",
            request.platform.system_prompt(),
            build_prompt(request)
        );

        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: request.platform.max_tokens(),
            },
        };

        debug!("Sending request to Gemini model {}", self.config.model);

        let builder = self
            .http
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.base_url, self.config.model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body);

        let response: GenerateResponse = send_json(Provider::Gemini, cancel, builder).await?;

        let summary: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        let summary = summary.trim();
        if summary.is_empty() {
            return Err(ProviderCallError::EmptyResponse {
                provider: Provider::Gemini.as_str().to_string(),
            });
        }

        Ok(SummaryResponse::new(summary, request.platform))
    }

    fn provider(&self) -> Provider {
        Provider::Gemini
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Platform;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_at(base_url: String, api_key: &str) -> GeminiClient {
        let config = ClientConfig {
            provider: Provider::Gemini,
            api_key: api_key.to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            base_url,
            timeout: Duration::from_secs(5),
        };
        GeminiClient::new(config).unwrap()
    }

    fn client(server: &MockServer) -> GeminiClient {
        client_at(server.uri(), "g-test")
    }

    #[tokio::test]
    async fn test_summarize_joins_candidate_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash-lite:generateContent"))
            .and(header("x-goog-api-key", "g-test"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "maxOutputTokens": 1000 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "## Summary\n" }, { "text": "Done." }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = SummaryRequest::new(Vec::new(), Platform::Blog);
        let response = client(&server)
            .summarize(&CancellationToken::new(), &request)
            .await
            .unwrap();
        assert_eq!(response.summary, "## Summary\nDone.");
    }

    #[tokio::test]
    async fn test_missing_candidates_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let request = SummaryRequest::new(Vec::new(), Platform::Blog);
        let err = client(&server)
            .summarize(&CancellationToken::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderCallError::EmptyResponse { ref provider } if provider == "gemini"));
    }

    #[tokio::test]
    async fn test_connection_error_does_not_expose_api_key() {
        let client = client_at("http://127.0.0.1:1".to_string(), "SECRET-GEMINI-KEY");
        let request = SummaryRequest::new(Vec::new(), Platform::Blog);
        let err = client
            .summarize(&CancellationToken::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderCallError::Request { .. }));

        let mut rendered = vec![err.to_string(), format!("{:?}", err)];
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            rendered.push(cause.to_string());
            source = cause.source();
        }
        assert!(rendered.iter().all(|text| !text.contains("SECRET-GEMINI-KEY")));
    }
}
