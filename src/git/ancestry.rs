//! Merge-base resolution.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::error::AncestryError;

use super::repository::{CommitId, RepositoryAccessor};

/// Find a common ancestor of `left` and `right`.
///
/// Collects every ancestor of `left` (inclusive) breadth-first, then walks
/// `right` breadth-first and returns the first commit found in that set.
/// Nodes are marked when enqueued, so each commit is visited at most once
/// per walk.
///
/// With criss-cross history there can be several merge-bases; the one
/// returned is whichever `right`'s breadth-first order reaches first, which
/// is not necessarily the unique lowest common ancestor.
pub fn merge_base<R>(repo: &R, left: &CommitId, right: &CommitId) -> Result<CommitId, AncestryError>
where
    R: RepositoryAccessor + ?Sized,
{
    let ancestors = ancestors_of(repo, left)?;

    let mut queue = VecDeque::from([right.clone()]);
    let mut queued = HashSet::from([right.clone()]);

    while let Some(id) = queue.pop_front() {
        if ancestors.contains(&id) {
            debug!(
                "merge-base of {} and {} is {}",
                left.short(),
                right.short(),
                id.short()
            );
            return Ok(id);
        }
        let commit = repo.find_commit(&id)?;
        for parent in commit.parents {
            if queued.insert(parent.clone()) {
                queue.push_back(parent);
            }
        }
    }

    Err(AncestryError::NoCommonAncestor {
        left: left.short().to_string(),
        right: right.short().to_string(),
    })
}

/// Every commit reachable from `start`, including `start` itself.
pub fn ancestors_of<R>(repo: &R, start: &CommitId) -> Result<HashSet<CommitId>, AncestryError>
where
    R: RepositoryAccessor + ?Sized,
{
    let mut seen = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(id) = queue.pop_front() {
        let commit = repo.find_commit(&id)?;
        for parent in commit.parents {
            if seen.insert(parent.clone()) {
                queue.push_back(parent);
            }
        }
    }

    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::memory::MemoryRepository;

    #[test]
    fn test_merge_base_of_commit_with_itself() {
        let mut repo = MemoryRepository::new();
        let a = repo.commit_on("main", "a", &[("a", "1")]);
        assert_eq!(merge_base(&repo, &a, &a).unwrap(), a);
    }

    #[test]
    fn test_merge_base_of_linear_history_is_older_commit() {
        let mut repo = MemoryRepository::new();
        let a = repo.commit_on("main", "a", &[("a", "1")]);
        let b = repo.commit_on("main", "b", &[("b", "1")]);
        assert_eq!(merge_base(&repo, &b, &a).unwrap(), a);
        assert_eq!(merge_base(&repo, &a, &b).unwrap(), a);
    }

    #[test]
    fn test_merge_base_of_diverged_branches() {
        let mut repo = MemoryRepository::new();
        repo.commit_on("main", "root", &[("r", "1")]);
        let fork = repo.commit_on("main", "fork point", &[("f", "1")]);
        repo.branch("feature", &fork);
        let main_tip = repo.commit_on("main", "main work", &[("m", "1")]);
        let feature_tip = repo.commit_on("feature", "feature work", &[("x", "1")]);

        assert_eq!(merge_base(&repo, &feature_tip, &main_tip).unwrap(), fork);
    }

    #[test]
    fn test_merge_base_after_merging_base_into_feature() {
        let mut repo = MemoryRepository::new();
        let root = repo.commit_on("main", "root", &[("r", "1")]);
        repo.branch("feature", &root);
        repo.commit_on("feature", "feature 1", &[("f1", "1")]);
        let main_tip = repo.commit_on("main", "main 1", &[("m1", "1")]);
        let merged = repo.merge_into("feature", &main_tip, "merge main");
        let feature_tip = repo.commit_on("feature", "feature 2", &[("f2", "1")]);

        assert_eq!(merge_base(&repo, &feature_tip, &main_tip).unwrap(), main_tip);
        assert_ne!(merged, main_tip);
    }

    #[test]
    fn test_criss_cross_returns_some_common_ancestor() {
        let mut repo = MemoryRepository::new();
        let root = repo.commit_on("main", "root", &[("r", "1")]);
        repo.branch("other", &root);
        let m1 = repo.commit_on("main", "m1", &[("m", "1")]);
        let o1 = repo.commit_on("other", "o1", &[("o", "1")]);
        let main_merge = repo.merge_into("main", &o1, "merge other");
        let other_merge = repo.merge_into("other", &m1, "merge main");

        let base = merge_base(&repo, &main_merge, &other_merge).unwrap();
        let left = ancestors_of(&repo, &main_merge).unwrap();
        let right = ancestors_of(&repo, &other_merge).unwrap();
        assert!(left.contains(&base));
        assert!(right.contains(&base));
        assert!(base == m1 || base == o1);
    }

    #[test]
    fn test_unrelated_histories_have_no_common_ancestor() {
        let mut repo = MemoryRepository::new();
        let a = repo.commit_on("main", "a", &[("a", "1")]);
        let b = repo.commit_on("orphan", "b", &[("b", "1")]);

        let err = merge_base(&repo, &a, &b).unwrap_err();
        assert!(matches!(err, AncestryError::NoCommonAncestor { .. }));
        assert!(err.to_string().contains(a.short()));
    }
}
