//! Git operations using git2-rs.

pub mod ancestry;
pub mod history;
pub mod info;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod memory;
pub mod repository;

pub use ancestry::merge_base;
pub use history::{list_commits, list_unique_commits};
pub use info::{RepoInfo, detect_default_branch, repo_info};
#[cfg(any(test, feature = "test-fixtures"))]
pub use memory::MemoryRepository;
pub use repository::{
    Commit, CommitId, DiffLine, FileStatus, GitRepository, Head, RawChange, RepositoryAccessor,
    TreeId,
};
