//! Credential lookup and provider selection.

use std::collections::HashMap;
use std::env;

use tracing::debug;

use crate::error::ProviderConfigError;

use super::provider::Provider;

/// Source of provider API keys.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialResolver {
    /// The secret for `provider`, or `None` if not configured.
    fn lookup(&self, provider: Provider) -> Option<String>;
}

/// Reads keys from the process environment. Values are trimmed; blank
/// values count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialResolver for EnvCredentials {
    fn lookup(&self, provider: Provider) -> Option<String> {
        env::var(provider.env_var())
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl CredentialResolver for HashMap<Provider, String> {
    fn lookup(&self, provider: Provider) -> Option<String> {
        self.get(&provider)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Providers with a configured credential, in priority order.
pub fn detect_available(creds: &dyn CredentialResolver) -> Vec<Provider> {
    Provider::PRIORITY
        .into_iter()
        .filter(|p| creds.lookup(*p).is_some())
        .collect()
}

/// An explicit provider wins; otherwise the first configured one in priority
/// order.
pub fn select_provider(
    explicit: Option<Provider>,
    creds: &dyn CredentialResolver,
) -> Result<Provider, ProviderConfigError> {
    if let Some(provider) = explicit {
        return Ok(provider);
    }

    let provider = detect_available(creds)
        .into_iter()
        .next()
        .ok_or_else(|| ProviderConfigError::NoProviderConfigured {
            env_vars: Provider::PRIORITY
                .iter()
                .map(|p| p.env_var())
                .collect::<Vec<_>>()
                .join(", "),
        })?;
    debug!("Auto-detected provider: {}", provider);
    Ok(provider)
}
