//! Repository status information and default-branch detection.

use crate::error::GitError;

use super::repository::RepositoryAccessor;

/// Branch names tried, in order, before falling back to the first branch.
const DEFAULT_BRANCH_CANDIDATES: [&str; 2] = ["main", "master"];

/// Basic information about a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub path: String,
    /// Empty when HEAD is unborn.
    pub current_branch: String,
    pub remote_url: Option<String>,
    pub commit_count: usize,
}

/// Gather [`RepoInfo`]. An empty repository reports zero commits.
pub fn repo_info<R>(repo: &R) -> RepoInfo
where
    R: RepositoryAccessor + ?Sized,
{
    let head = repo.head().ok();
    let commit_count = head
        .as_ref()
        .and_then(|h| repo.log(&h.id, usize::MAX).ok())
        .map_or(0, |commits| commits.len());

    RepoInfo {
        path: repo.path().display().to_string(),
        current_branch: head.map(|h| h.branch).unwrap_or_default(),
        remote_url: repo.remote_url(),
        commit_count,
    }
}

/// Pick the repository's default branch: `main`, then `master`, else the
/// first local branch.
pub fn detect_default_branch<R>(repo: &R) -> Result<String, GitError>
where
    R: RepositoryAccessor + ?Sized,
{
    let branches = repo.branches()?;

    for candidate in DEFAULT_BRANCH_CANDIDATES {
        if branches.iter().any(|b| b == candidate) {
            return Ok(candidate.to_string());
        }
    }

    branches.into_iter().next().ok_or(GitError::NoBranches)
}
