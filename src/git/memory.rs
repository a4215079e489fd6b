//! In-memory repository fixture.
//!
//! Builds arbitrary history graphs (criss-cross merges, detached branches)
//! without touching disk. Tree diffs report whole-file replacement: a
//! modified file shows every old line as removed and every new line as added.

use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::error::GitError;

use super::repository::{
    Commit, CommitId, DiffLine, FileStatus, Head, RawChange, RepositoryAccessor, TreeId,
};

type Tree = BTreeMap<String, String>;

/// Base timestamp for fixture commits; each new commit is one minute later.
const EPOCH_SECS: i64 = 1_700_000_000;

/// A repository held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    path: PathBuf,
    commits: HashMap<CommitId, Commit>,
    trees: HashMap<TreeId, Tree>,
    /// Branch name → tip, in creation order.
    branches: Vec<(String, CommitId)>,
    head: String,
    remote: Option<String>,
    seq: u32,
}

impl MemoryRepository {
    /// Empty repository with HEAD on an unborn `main`.
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("memory://repo"),
            commits: HashMap::new(),
            trees: HashMap::new(),
            branches: Vec::new(),
            head: "main".to_string(),
            remote: None,
            seq: 0,
        }
    }

    pub fn with_remote(mut self, url: impl Into<String>) -> Self {
        self.remote = Some(url.into());
        self
    }

    /// Commit `files` (path, content) on `branch`, creating the branch if needed.
    pub fn commit_on(&mut self, branch: &str, message: &str, files: &[(&str, &str)]) -> CommitId {
        let parent = self.tip(branch);
        let mut tree = self.tree_of(parent.as_ref());
        for (path, content) in files {
            tree.insert(path.to_string(), content.to_string());
        }
        let parents = parent.into_iter().collect();
        self.record(branch, message, parents, tree)
    }

    /// Commit the removal of `paths` on `branch`.
    pub fn delete_on(&mut self, branch: &str, message: &str, paths: &[&str]) -> CommitId {
        let parent = self.tip(branch);
        let mut tree = self.tree_of(parent.as_ref());
        for path in paths {
            tree.remove(*path);
        }
        let parents = parent.into_iter().collect();
        self.record(branch, message, parents, tree)
    }

    /// Merge `other` into `branch`. The merge keeps `branch`'s tree overlaid
    /// with files only present in `other`.
    pub fn merge_into(&mut self, branch: &str, other: &CommitId, message: &str) -> CommitId {
        let tip = self.tip(branch);
        let mut tree = self.tree_of(Some(other));
        tree.extend(self.tree_of(tip.as_ref()));
        let parents = tip.into_iter().chain([other.clone()]).collect();
        self.record(branch, message, parents, tree)
    }

    /// Point `name` at `at`, creating or moving the branch.
    pub fn branch(&mut self, name: &str, at: &CommitId) {
        match self.branches.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = at.clone(),
            None => self.branches.push((name.to_string(), at.clone())),
        }
    }

    /// Move HEAD to `name`.
    pub fn checkout(&mut self, name: &str) {
        self.head = name.to_string();
    }

    /// Drop a stored tree, leaving commits that point at it unreadable.
    pub fn forget_tree(&mut self, id: &TreeId) {
        self.trees.remove(id);
    }

    fn tip(&self, branch: &str) -> Option<CommitId> {
        self.branches
            .iter()
            .find(|(n, _)| n == branch)
            .map(|(_, id)| id.clone())
    }

    fn tree_of(&self, commit: Option<&CommitId>) -> Tree {
        commit
            .and_then(|id| self.commits.get(id))
            .and_then(|c| self.trees.get(&c.tree))
            .cloned()
            .unwrap_or_default()
    }

    fn record(&mut self, branch: &str, message: &str, parents: Vec<CommitId>, tree: Tree) -> CommitId {
        self.seq += 1;
        let id = CommitId::new(format!("{:07x}{:033x}", 0xc00_0000 + self.seq, self.seq));
        let tree_id = TreeId::new(format!("tree-{}", self.seq));
        let timestamp: DateTime<FixedOffset> = Utc
            .timestamp_opt(EPOCH_SECS + i64::from(self.seq) * 60, 0)
            .single()
            .unwrap_or_default()
            .fixed_offset();

        self.trees.insert(tree_id.clone(), tree);
        self.commits.insert(
            id.clone(),
            Commit {
                id: id.clone(),
                author: "Test User".to_string(),
                timestamp,
                message: format!("{message}\n"),
                parents,
                tree: tree_id,
            },
        );
        self.branch(branch, &id);
        id
    }

    fn tree(&self, id: &TreeId) -> Result<&Tree, GitError> {
        self.trees.get(id).ok_or_else(|| GitError::TreeNotFound {
            tree: id.as_str().to_string(),
        })
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lines_with(origin: char, text: &str) -> impl Iterator<Item = DiffLine> + '_ {
    text.lines().map(move |line| DiffLine {
        origin,
        content: line.to_string(),
    })
}

impl RepositoryAccessor for MemoryRepository {
    fn path(&self) -> &Path {
        &self.path
    }

    fn head(&self) -> Result<Head, GitError> {
        let id = self.tip(&self.head).ok_or_else(|| {
            GitError::Head(git2::Error::from_str("reference 'HEAD' is unborn"))
        })?;
        Ok(Head {
            id,
            branch: self.head.clone(),
        })
    }

    fn resolve_branch(&self, name: &str) -> Result<CommitId, GitError> {
        self.tip(name).ok_or_else(|| GitError::BranchNotFound {
            name: name.to_string(),
            source: None,
        })
    }

    fn find_commit(&self, id: &CommitId) -> Result<Commit, GitError> {
        self.commits
            .get(id)
            .cloned()
            .ok_or_else(|| GitError::CommitNotFound {
                hash: id.short().to_string(),
                source: None,
            })
    }

    fn log(&self, from: &CommitId, limit: usize) -> Result<Vec<Commit>, GitError> {
        // Newest first by timestamp; fixture commits are created after their
        // parents, so this is also a topological order.
        let mut heap = BinaryHeap::new();
        let mut queued = HashSet::new();
        let start = self.find_commit(from)?;
        queued.insert(start.id.clone());
        heap.push((start.timestamp, start.id));

        let mut out = Vec::new();
        while let Some((_, id)) = heap.pop() {
            if out.len() >= limit {
                break;
            }
            let commit = self.find_commit(&id)?;
            for parent in &commit.parents {
                if queued.insert(parent.clone()) {
                    let parent_commit = self.find_commit(parent)?;
                    heap.push((parent_commit.timestamp, parent_commit.id));
                }
            }
            out.push(commit);
        }
        Ok(out)
    }

    fn diff_trees(&self, old: Option<&TreeId>, new: &TreeId) -> Result<Vec<RawChange>, GitError> {
        let empty = Tree::new();
        let old_tree = match old {
            Some(id) => self.tree(id)?,
            None => &empty,
        };
        let new_tree = self.tree(new)?;

        let mut changes = Vec::new();
        for (path, content) in new_tree {
            match old_tree.get(path) {
                None => changes.push(RawChange {
                    status: FileStatus::Added,
                    old_path: None,
                    new_path: Some(path.clone()),
                    lines: lines_with('+', content).collect(),
                }),
                Some(previous) if previous != content => changes.push(RawChange {
                    status: FileStatus::Modified,
                    old_path: Some(path.clone()),
                    new_path: Some(path.clone()),
                    lines: lines_with('-', previous)
                        .chain(lines_with('+', content))
                        .collect(),
                }),
                Some(_) => {}
            }
        }
        for (path, content) in old_tree {
            if !new_tree.contains_key(path) {
                changes.push(RawChange {
                    status: FileStatus::Deleted,
                    old_path: Some(path.clone()),
                    new_path: None,
                    lines: lines_with('-', content).collect(),
                });
            }
        }
        Ok(changes)
    }

    fn branches(&self) -> Result<Vec<String>, GitError> {
        Ok(self.branches.iter().map(|(name, _)| name.clone()).collect())
    }

    fn remote_url(&self) -> Option<String> {
        self.remote.clone()
    }
}
