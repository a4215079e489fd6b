//! Per-provider client configuration and the shared HTTP plumbing.

use std::env;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ProviderCallError, ProviderConfigError};

use super::credentials::CredentialResolver;
use super::provider::Provider;

/// Environment variable for the HTTP timeout override (in seconds).
const TIMEOUT_ENV_VAR: &str = "GITSTORY_HTTP_TIMEOUT";

/// Environment variable for the model override.
const MODEL_ENV_VAR: &str = "GITSTORY_MODEL";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Sampling temperature for every backend call.
pub const TEMPERATURE: f32 = 0.7;

/// Get the request timeout from the environment or use the default.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Model from `explicit`, then the environment, then the provider default.
fn get_model(provider: Provider, explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| env::var(MODEL_ENV_VAR).ok())
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| provider.default_model().to_string())
}

/// Everything needed to construct one backend client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Resolve the configuration for `provider`, failing if no key is set.
    pub fn resolve(
        provider: Provider,
        creds: &dyn CredentialResolver,
        model: Option<&str>,
    ) -> Result<Self, ProviderConfigError> {
        let api_key =
            creds
                .lookup(provider)
                .ok_or_else(|| ProviderConfigError::MissingCredential {
                    provider: provider.as_str().to_string(),
                    env_var: provider.env_var().to_string(),
                })?;

        let config = Self {
            provider,
            api_key,
            model: get_model(provider, model),
            base_url: provider.default_base_url().to_string(),
            timeout: get_timeout(),
        };
        debug!(
            "Resolved {} client: model={}, timeout={}s",
            provider,
            config.model,
            config.timeout.as_secs()
        );
        Ok(config)
    }

    /// Point the client at another endpoint, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn http_client(&self) -> Result<Client, ProviderConfigError> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| ProviderConfigError::HttpClient {
                provider: self.provider.as_str().to_string(),
                source,
            })
    }
}

/// Send `request` and decode a JSON body, resolving early if `cancel` fires.
pub(crate) async fn send_json<T>(
    provider: Provider,
    cancel: &CancellationToken,
    request: RequestBuilder,
) -> Result<T, ProviderCallError>
where
    T: DeserializeOwned,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(ProviderCallError::Cancelled {
            provider: provider.as_str().to_string(),
        }),
        result = exchange(provider, request) => result,
    }
}

async fn exchange<T>(provider: Provider, request: RequestBuilder) -> Result<T, ProviderCallError>
where
    T: DeserializeOwned,
{
    let name = provider.as_str().to_string();

    let response = request
        .send()
        .await
        .map_err(|source| ProviderCallError::Request {
            provider: name.clone(),
            source: source.without_url(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderCallError::Status {
            provider: name,
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| ProviderCallError::InvalidResponse {
            provider: name,
            source: source.without_url(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn creds() -> HashMap<Provider, String> {
        HashMap::from([(Provider::OpenAi, "sk-test".to_string())])
    }

    #[test]
    fn test_get_timeout_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, None::<&str>, || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_get_timeout_custom() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("30"), || {
            assert_eq!(get_timeout(), Duration::from_secs(30));
        });
    }

    #[test]
    fn test_get_timeout_invalid_falls_back() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("soon"), || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("0"), || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_model_precedence() {
        temp_env::with_var(MODEL_ENV_VAR, Some("gpt-4o-mini"), || {
            assert_eq!(get_model(Provider::OpenAi, Some("o3")), "o3");
            assert_eq!(get_model(Provider::OpenAi, None), "gpt-4o-mini");
        });
        temp_env::with_var(MODEL_ENV_VAR, None::<&str>, || {
            assert_eq!(get_model(Provider::Gemini, None), "gemini-2.5-flash-lite");
            assert_eq!(get_model(Provider::Gemini, Some("  ")), "gemini-2.5-flash-lite");
        });
    }

    #[test]
    fn test_resolve_requires_credential() {
        let err = ClientConfig::resolve(Provider::Gemini, &creds(), None).unwrap_err();
        assert!(matches!(
            err,
            ProviderConfigError::MissingCredential { ref env_var, .. } if env_var == "GEMINI_API_KEY"
        ));
    }

    #[test]
    fn test_resolve_fills_defaults() {
        temp_env::with_vars(
            [(MODEL_ENV_VAR, None::<&str>), (TIMEOUT_ENV_VAR, None::<&str>)],
            || {
                let config = ClientConfig::resolve(Provider::OpenAi, &creds(), None).unwrap();
                assert_eq!(config.api_key, "sk-test");
                assert_eq!(config.model, "gpt-4o");
                assert_eq!(config.base_url, "https://api.openai.com/v1");
                assert_eq!(config.timeout, Duration::from_secs(120));

                let config = config.with_base_url("http://127.0.0.1:9999/");
                assert_eq!(config.base_url, "http://127.0.0.1:9999");
            },
        );
    }
}
