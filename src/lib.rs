//! gitstory - turn git history into platform-tailored summaries.
//!
//! # Overview
//!
//! gitstory walks a repository's commit history, extracts per-commit file
//! changes and language statistics, and renders them into a prompt for a
//! summarization backend (OpenAI or Gemini). The result is written as a blog
//! post, tweet, LinkedIn post, technical document or personal note.

pub mod commit;
pub mod error;
pub mod git;
pub mod llm;
pub mod report;

// Re-export commonly used types
pub use commit::{CommitStats, CommitSummary, DiffExtractor, FileChange, RootCommitPolicy};
pub use error::{
    AncestryError, DiffError, GitError, HistoryError, OutputError, ProviderCallError,
    ProviderConfigError,
};
pub use git::{Commit, CommitId, FileStatus, GitRepository, RepositoryAccessor};
pub use llm::{Platform, Provider, SummaryRequest, SummaryResponse};
