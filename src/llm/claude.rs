//! Claude backend placeholder. Construction succeeds so that selection and
//! configuration errors surface as usual; every call fails.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ProviderCallError;

use super::config::ClientConfig;
use super::provider::Provider;
use super::router::SummaryBackend;
use super::types::{SummaryRequest, SummaryResponse};

pub struct ClaudeClient {
    config: ClientConfig,
}

impl ClaudeClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl SummaryBackend for ClaudeClient {
    async fn summarize(
        &self,
        _cancel: &CancellationToken,
        _request: &SummaryRequest,
    ) -> Result<SummaryResponse, ProviderCallError> {
        Err(ProviderCallError::NotImplemented {
            provider: Provider::Claude.as_str().to_string(),
        })
    }

    fn provider(&self) -> Provider {
        Provider::Claude
    }
}
