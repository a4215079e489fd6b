//! Summarization backends, platform profiles and prompt synthesis.

pub mod claude;
pub mod config;
pub mod credentials;
pub mod gemini;
pub mod openai;
pub mod platform;
pub mod prompt;
pub mod provider;
pub mod router;
pub mod types;

pub use config::ClientConfig;
pub use credentials::{CredentialResolver, EnvCredentials, detect_available, select_provider};
pub use platform::{Platform, PlatformLimits};
pub use prompt::{MAX_PREVIEW_LINES, build_prompt};
pub use provider::Provider;
pub use router::{ProviderClient, SummaryBackend, dispatch};
pub use types::{SummaryRequest, SummaryResponse};
