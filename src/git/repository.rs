//! Read-only repository access.
//!
//! [`RepositoryAccessor`] is the capability the analysis core consumes. The
//! git2-backed [`GitRepository`] is the production implementation; any other
//! backend (remote clone, in-memory fixture) that honours the same contract
//! can be swapped in without touching history walking or diff extraction.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{BranchType, Delta, DiffFindOptions, Oid, Patch, Repository, Sort};
use serde::{Deserialize, Serialize};

use crate::error::GitError;

/// Length of the abbreviated hash used in summaries and error messages.
pub const SHORT_HASH_LEN: usize = 7;

/// Full hex identifier of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form (first 7 characters).
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(SHORT_HASH_LEN)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Oid> for CommitId {
    fn from(oid: Oid) -> Self {
        Self(oid.to_string())
    }
}

/// Opaque identifier of a content tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeId(String);

impl TreeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An immutable history node as seen by the analysis core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: CommitId,
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
    pub parents: Vec<CommitId>,
    pub tree: TreeId,
}

impl Commit {
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// First line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// The commit HEAD points at, plus the name of the checked-out branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    pub id: CommitId,
    /// Short branch name, or `HEAD` when detached.
    pub branch: String,
}

/// Status of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "Added"),
            FileStatus::Modified => write!(f, "Modified"),
            FileStatus::Deleted => write!(f, "Deleted"),
            FileStatus::Renamed => write!(f, "Renamed"),
            FileStatus::Copied => write!(f, "Copied"),
            FileStatus::TypeChanged => write!(f, "TypeChanged"),
        }
    }
}

/// One changed line of a patch. `origin` is `'+'`, `'-'` or `' '`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub origin: char,
    pub content: String,
}

/// A file-level change between two trees, with its patch lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChange {
    pub status: FileStatus,
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub lines: Vec<DiffLine>,
}

impl RawChange {
    /// Change action of this entry.
    pub fn action(&self) -> FileStatus {
        self.status
    }

    /// `(additions, deletions)` counted from the patch lines.
    pub fn patch_stats(&self) -> (usize, usize) {
        self.lines.iter().fold((0, 0), |(add, del), line| match line.origin {
            '+' => (add + 1, del),
            '-' => (add, del + 1),
            _ => (add, del),
        })
    }
}

/// Read-only primitives over a version-control working copy.
pub trait RepositoryAccessor {
    /// Filesystem location of the working copy.
    fn path(&self) -> &Path;

    fn head(&self) -> Result<Head, GitError>;

    /// Resolve a local branch name to the commit it points at.
    fn resolve_branch(&self, name: &str) -> Result<CommitId, GitError>;

    fn find_commit(&self, id: &CommitId) -> Result<Commit, GitError>;

    /// Up to `limit` commits reachable from `from`, newest first, in an
    /// order where every commit precedes its parents.
    fn log(&self, from: &CommitId, limit: usize) -> Result<Vec<Commit>, GitError>;

    /// Changes between two trees. `None` for `old` means the empty tree.
    fn diff_trees(&self, old: Option<&TreeId>, new: &TreeId) -> Result<Vec<RawChange>, GitError>;

    /// Local branch names in listing order.
    fn branches(&self) -> Result<Vec<String>, GitError>;

    /// First URL of the first configured remote, if any.
    fn remote_url(&self) -> Option<String>;

    fn parent_of(&self, commit: &Commit, index: usize) -> Result<Commit, GitError> {
        let parent = commit.parents.get(index).ok_or_else(|| GitError::NoParent {
            hash: commit.id.short().to_string(),
            index,
        })?;
        self.find_commit(parent)
    }
}

/// git2-backed repository.
pub struct GitRepository {
    repo: Repository,
    path: PathBuf,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl GitRepository {
    /// Open the repository containing `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|source| GitError::NotAGitRepo {
            path: path.display().to_string(),
            source,
        })?;
        let path = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        Ok(Self { repo, path })
    }

    fn to_commit(commit: &git2::Commit<'_>) -> Commit {
        let author = commit.author();
        let when = author.when();
        let offset = FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or(Utc.fix());
        let timestamp = Utc
            .timestamp_opt(when.seconds(), 0)
            .single()
            .unwrap_or_default()
            .with_timezone(&offset);

        Commit {
            id: commit.id().into(),
            author: String::from_utf8_lossy(author.name_bytes()).into_owned(),
            timestamp,
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            parents: commit.parent_ids().map(CommitId::from).collect(),
            tree: TreeId::new(commit.tree_id().to_string()),
        }
    }

    fn parse_oid(hash: &str) -> Result<Oid, GitError> {
        Oid::from_str(hash).map_err(|e| GitError::CommitNotFound {
            hash: hash.to_string(),
            source: Some(e),
        })
    }

    fn find_tree(&self, id: &TreeId) -> Result<git2::Tree<'_>, GitError> {
        let to_err = |source| GitError::TreeDiff {
            tree: id.as_str().chars().take(SHORT_HASH_LEN).collect(),
            source,
        };
        let oid = Oid::from_str(id.as_str()).map_err(to_err)?;
        self.repo.find_tree(oid).map_err(to_err)
    }
}

impl RepositoryAccessor for GitRepository {
    fn path(&self) -> &Path {
        &self.path
    }

    fn head(&self) -> Result<Head, GitError> {
        let head = self.repo.head().map_err(GitError::Head)?;
        let commit = head.peel_to_commit().map_err(GitError::Head)?;
        let branch = if head.is_branch() {
            head.shorthand().unwrap_or("HEAD").to_string()
        } else {
            "HEAD".to_string()
        };
        Ok(Head {
            id: commit.id().into(),
            branch,
        })
    }

    fn resolve_branch(&self, name: &str) -> Result<CommitId, GitError> {
        let not_found = |e| GitError::BranchNotFound {
            name: name.to_string(),
            source: Some(e),
        };
        let branch = self
            .repo
            .find_branch(name, BranchType::Local)
            .map_err(not_found)?;
        let commit = branch.get().peel_to_commit().map_err(not_found)?;
        Ok(commit.id().into())
    }

    fn find_commit(&self, id: &CommitId) -> Result<Commit, GitError> {
        let oid = Self::parse_oid(id.as_str())?;
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| GitError::CommitNotFound {
                hash: id.short().to_string(),
                source: Some(e),
            })?;
        Ok(Self::to_commit(&commit))
    }

    fn log(&self, from: &CommitId, limit: usize) -> Result<Vec<Commit>, GitError> {
        let mut revwalk = self.repo.revwalk().map_err(GitError::RevwalkError)?;
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
            .map_err(GitError::RevwalkError)?;
        revwalk
            .push(Self::parse_oid(from.as_str())?)
            .map_err(GitError::RevwalkError)?;

        let mut commits = Vec::new();
        for oid_result in revwalk.take(limit) {
            let oid = oid_result.map_err(GitError::RevwalkError)?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| GitError::CommitNotFound {
                    hash: CommitId::from(oid).short().to_string(),
                    source: Some(e),
                })?;
            commits.push(Self::to_commit(&commit));
        }

        Ok(commits)
    }

    fn diff_trees(&self, old: Option<&TreeId>, new: &TreeId) -> Result<Vec<RawChange>, GitError> {
        let old_tree = old.map(|id| self.find_tree(id)).transpose()?;
        let new_tree = self.find_tree(new)?;
        let diff_err = |source| GitError::TreeDiff {
            tree: new.as_str().chars().take(SHORT_HASH_LEN).collect(),
            source,
        };

        let mut diff = self
            .repo
            .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)
            .map_err(diff_err)?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))
            .map_err(diff_err)?;

        let mut changes = Vec::with_capacity(diff.deltas().len());
        for (idx, delta) in diff.deltas().enumerate() {
            let status = match delta.status() {
                Delta::Added | Delta::Untracked => FileStatus::Added,
                Delta::Deleted => FileStatus::Deleted,
                Delta::Renamed => FileStatus::Renamed,
                Delta::Copied => FileStatus::Copied,
                Delta::Typechange => FileStatus::TypeChanged,
                _ => FileStatus::Modified,
            };

            let old_path = path_string(&delta.old_file());
            let new_path = path_string(&delta.new_file());

            let mut lines = Vec::new();
            // Binary deltas have no patch.
            if let Some(patch) = Patch::from_diff(&diff, idx).map_err(diff_err)? {
                for hunk in 0..patch.num_hunks() {
                    let line_count = patch.num_lines_in_hunk(hunk).map_err(diff_err)?;
                    for line_idx in 0..line_count {
                        let line = patch.line_in_hunk(hunk, line_idx).map_err(diff_err)?;
                        let origin = line.origin();
                        if !matches!(origin, '+' | '-' | ' ') {
                            continue;
                        }
                        let content = String::from_utf8_lossy(line.content());
                        lines.push(DiffLine {
                            origin,
                            content: content.trim_end_matches(['\n', '\r']).to_string(),
                        });
                    }
                }
            }

            changes.push(RawChange {
                status,
                old_path,
                new_path,
                lines,
            });
        }

        Ok(changes)
    }

    fn branches(&self) -> Result<Vec<String>, GitError> {
        let branches = self
            .repo
            .branches(Some(BranchType::Local))
            .map_err(GitError::Branches)?;

        let mut names = Vec::new();
        for entry in branches {
            let (branch, _) = entry.map_err(GitError::Branches)?;
            if let Some(name) = branch.name().map_err(GitError::Branches)? {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn remote_url(&self) -> Option<String> {
        let remotes = self.repo.remotes().ok()?;
        let name = remotes.iter().flatten().next()?;
        let remote = self.repo.find_remote(name).ok()?;
        remote.url().map(str::to_string)
    }
}

fn path_string(file: &git2::DiffFile<'_>) -> Option<String> {
    file.path().map(|p| p.to_string_lossy().into_owned())
}
