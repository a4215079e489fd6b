//! Backend contract and static dispatch over the provider catalogue.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{ProviderCallError, ProviderConfigError};

use super::claude::ClaudeClient;
use super::config::ClientConfig;
use super::gemini::GeminiClient;
use super::openai::OpenAiClient;
use super::provider::Provider;
use super::types::{SummaryRequest, SummaryResponse};

/// A backend that turns a [`SummaryRequest`] into summary text.
///
/// Implementations make at most one network call per invocation and never
/// retry. Cancelling `cancel` resolves the call with
/// [`ProviderCallError::Cancelled`].
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    async fn summarize(
        &self,
        cancel: &CancellationToken,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, ProviderCallError>;

    fn provider(&self) -> Provider;
}

/// One variant per provider.
pub enum ProviderClient {
    OpenAi(OpenAiClient),
    Gemini(GeminiClient),
    Claude(ClaudeClient),
}

impl ProviderClient {
    pub fn new(config: ClientConfig) -> Result<Self, ProviderConfigError> {
        let client = match config.provider {
            Provider::OpenAi => ProviderClient::OpenAi(OpenAiClient::new(config)?),
            Provider::Gemini => ProviderClient::Gemini(GeminiClient::new(config)?),
            Provider::Claude => ProviderClient::Claude(ClaudeClient::new(config)),
        };
        Ok(client)
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderClient::OpenAi(c) => c.model(),
            ProviderClient::Gemini(c) => c.model(),
            ProviderClient::Claude(c) => c.model(),
        }
    }

    fn backend(&self) -> &dyn SummaryBackend {
        match self {
            ProviderClient::OpenAi(c) => c,
            ProviderClient::Gemini(c) => c,
            ProviderClient::Claude(c) => c,
        }
    }
}

#[async_trait]
impl SummaryBackend for ProviderClient {
    async fn summarize(
        &self,
        cancel: &CancellationToken,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, ProviderCallError> {
        dispatch(self.backend(), cancel, request).await
    }

    fn provider(&self) -> Provider {
        self.backend().provider()
    }
}

/// Run one summarization through `backend`, logging the outcome.
pub async fn dispatch(
    backend: &dyn SummaryBackend,
    cancel: &CancellationToken,
    request: &SummaryRequest,
) -> Result<SummaryResponse, ProviderCallError> {
    let provider = backend.provider();
    debug!(
        "Dispatching {} commit(s) to {} for {}",
        request.commits.len(),
        provider,
        request.platform
    );

    let response = backend.summarize(cancel, request).await?;
    info!(
        "{} produced {} characters for {}",
        provider.display_name(),
        response.char_count(),
        response.platform
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Platform;
    use std::time::Duration;

    struct FakeBackend {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl SummaryBackend for FakeBackend {
        async fn summarize(
            &self,
            _cancel: &CancellationToken,
            request: &SummaryRequest,
        ) -> Result<SummaryResponse, ProviderCallError> {
            match self.reply {
                Some(text) => Ok(SummaryResponse::new(text, request.platform)),
                None => Err(ProviderCallError::EmptyResponse {
                    provider: "fake".to_string(),
                }),
            }
        }

        fn provider(&self) -> Provider {
            Provider::Gemini
        }
    }

    fn config(provider: Provider) -> ClientConfig {
        ClientConfig {
            provider,
            api_key: "key".to_string(),
            model: provider.default_model().to_string(),
            base_url: provider.default_base_url().to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_dispatch_returns_backend_response() {
        let backend = FakeBackend {
            reply: Some("All done"),
        };
        let request = SummaryRequest::new(Vec::new(), Platform::Note);
        let response = dispatch(&backend, &CancellationToken::new(), &request)
            .await
            .unwrap();
        assert_eq!(response.summary, "All done");
        assert_eq!(response.platform, Platform::Note);
    }

    #[tokio::test]
    async fn test_dispatch_propagates_failure() {
        let backend = FakeBackend { reply: None };
        let request = SummaryRequest::new(Vec::new(), Platform::Note);
        let err = dispatch(&backend, &CancellationToken::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderCallError::EmptyResponse { .. }));
    }

    #[test]
    fn test_client_variant_matches_provider() {
        for provider in Provider::PRIORITY {
            let client = ProviderClient::new(config(provider)).unwrap();
            assert_eq!(client.provider(), provider);
            assert_eq!(client.model(), provider.default_model());
        }
    }

    #[tokio::test]
    async fn test_claude_is_not_implemented() {
        let client = ProviderClient::new(config(Provider::Claude)).unwrap();
        let request = SummaryRequest::new(Vec::new(), Platform::Blog);
        let err = client
            .summarize(&CancellationToken::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderCallError::NotImplemented { ref provider } if provider == "claude"));
        assert_eq!(err.to_string(), "claude isn't yet implemented");
    }
}
