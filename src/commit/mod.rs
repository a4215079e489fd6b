//! Per-commit change extraction and language statistics.

pub mod diff;
pub mod digest;
pub mod language;

pub use diff::{
    CommitStats, CommitSummary, DiffExtractor, FileChange, RootCommitPolicy, aggregate_stats,
};
pub use digest::digest_commits;
pub use language::classify;
