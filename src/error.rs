//! Error types for gitstory modules using thiserror.

use thiserror::Error;

/// Errors from repository access.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository (or any of the parent directories): {path}")]
    NotAGitRepo {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to resolve HEAD: {0}")]
    Head(#[source] git2::Error),

    #[error("Base branch '{name}' not found")]
    BranchNotFound {
        name: String,
        #[source]
        source: Option<git2::Error>,
    },

    #[error("Failed to find commit {hash}")]
    CommitNotFound {
        hash: String,
        #[source]
        source: Option<git2::Error>,
    },

    #[error("Commit {hash} has no parent at index {index}")]
    NoParent { hash: String, index: usize },

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to diff tree {tree}: {source}")]
    TreeDiff {
        tree: String,
        #[source]
        source: git2::Error,
    },

    #[error("Tree {tree} not found")]
    TreeNotFound { tree: String },

    #[error("Failed to list branches: {0}")]
    Branches(#[source] git2::Error),

    #[error("No branches found in the repository")]
    NoBranches,
}

/// Errors from merge-base computation.
#[derive(Error, Debug)]
pub enum AncestryError {
    #[error("No common ancestor found between {left} and {right}")]
    NoCommonAncestor { left: String, right: String },

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Errors from bounded history traversal.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Failed to find merge-base against '{base}': {source}")]
    MergeBase {
        base: String,
        #[source]
        source: AncestryError,
    },
}

/// Errors from per-commit diff extraction.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Commit {hash} has no parent to diff against")]
    NoParent { hash: String },

    #[error("Failed to extract changes of commit {hash}: {source}")]
    Changes {
        hash: String,
        #[source]
        source: GitError,
    },

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Errors from provider and platform configuration.
#[derive(Error, Debug)]
pub enum ProviderConfigError {
    #[error("No LLM providers configured. Set one of: {env_vars}")]
    NoProviderConfigured { env_vars: String },

    #[error("Unsupported provider '{0}'. Supported: openai, gemini, claude")]
    UnsupportedProvider(String),

    #[error("Unsupported platform '{0}'. Supported: blog, twitter, linkedin, technical, note")]
    UnsupportedPlatform(String),

    #[error("API key not provided for {provider}. Set {env_var} environment variable")]
    MissingCredential { provider: String, env_var: String },

    #[error("Failed to build HTTP client for {provider}: {source}")]
    HttpClient {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors from a single summarization backend call.
#[derive(Error, Debug)]
pub enum ProviderCallError {
    #[error("{provider} request failed: {source}")]
    Request {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API returned status {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} returned a response that could not be decoded: {source}")]
    InvalidResponse {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("No response from {provider} API")]
    EmptyResponse { provider: String },

    #[error("{provider} isn't yet implemented")]
    NotImplemented { provider: String },

    #[error("{provider} request was cancelled")]
    Cancelled { provider: String },
}

/// Errors from writing the generated document.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write summary to {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
