//! Bounded, newest-first commit sequences.

use tracing::debug;

use crate::error::HistoryError;

use super::ancestry::merge_base;
use super::repository::{Commit, RepositoryAccessor};

/// The latest `limit` commits reachable from HEAD, newest first, HEAD included.
pub fn list_commits<R>(repo: &R, limit: usize) -> Result<Vec<Commit>, HistoryError>
where
    R: RepositoryAccessor + ?Sized,
{
    let head = repo.head()?;
    Ok(repo.log(&head.id, limit)?)
}

/// Commits on the current branch that are not in `base_branch`.
///
/// Walks from HEAD newest first and stops at the merge-base with
/// `base_branch` (excluded) or after `limit` commits, whichever comes first.
pub fn list_unique_commits<R>(
    repo: &R,
    base_branch: &str,
    limit: usize,
) -> Result<Vec<Commit>, HistoryError>
where
    R: RepositoryAccessor + ?Sized,
{
    let head = repo.head()?;
    let base = repo.resolve_branch(base_branch)?;
    let stop = merge_base(repo, &head.id, &base).map_err(|source| HistoryError::MergeBase {
        base: base_branch.to_string(),
        source,
    })?;

    debug!(
        "listing commits on '{}' since merge-base {} with '{}'",
        head.branch,
        stop.short(),
        base_branch
    );

    Ok(repo
        .log(&head.id, limit)?
        .into_iter()
        .take_while(|commit| commit.id != stop)
        .collect())
}
