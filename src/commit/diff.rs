//! Per-commit file changes and statistics.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DiffError;
use crate::git::{Commit, FileStatus, RawChange, RepositoryAccessor};

use super::language::classify;

/// A file modified by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub status: FileStatus,
    pub additions: usize,
    pub deletions: usize,
    /// Changed lines only: a `DELETIONS:` block then an `ADDITIONS:` block,
    /// each line keeping its `-`/`+` marker. Empty for binary files.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
}

/// Aggregate statistics of one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    pub total_files: usize,
    /// Always `additions + deletions`.
    pub total_lines: usize,
    pub additions: usize,
    pub deletions: usize,
    /// Languages in first-seen order, without duplicates.
    pub languages: Vec<String>,
    /// Most frequent language; ties go to the earliest seen.
    pub primary_language: Option<String>,
}

/// A commit with its file-level changes, ready for prompt synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Abbreviated hash.
    pub hash: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub message: String,
    pub files: Vec<FileChange>,
    pub stats: CommitStats,
}

/// What to do with a commit that has no parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootCommitPolicy {
    /// Diff against the empty tree, so every file shows as added.
    #[default]
    EmptyTree,
    /// Keep the commit's metadata but report no file changes.
    Skip,
    /// Abort with [`DiffError::NoParent`].
    Fail,
}

/// Turns commits into [`CommitSummary`] values.
pub struct DiffExtractor<'r, R: ?Sized> {
    repo: &'r R,
    root_policy: RootCommitPolicy,
}

impl<'r, R> DiffExtractor<'r, R>
where
    R: RepositoryAccessor + ?Sized,
{
    pub fn new(repo: &'r R) -> Self {
        Self {
            repo,
            root_policy: RootCommitPolicy::default(),
        }
    }

    pub fn with_root_policy(mut self, policy: RootCommitPolicy) -> Self {
        self.root_policy = policy;
        self
    }

    /// Summaries for `commits`, in the same order. Stops at the first error.
    pub fn summarize_all(&self, commits: &[Commit]) -> Result<Vec<CommitSummary>, DiffError> {
        commits.iter().map(|c| self.summarize(c)).collect()
    }

    pub fn summarize(&self, commit: &Commit) -> Result<CommitSummary, DiffError> {
        let (files, stats) = self.file_changes(commit)?;
        Ok(CommitSummary {
            hash: commit.id.short().to_string(),
            author: commit.author.clone(),
            date: commit.timestamp,
            message: commit.message.clone(),
            files,
            stats,
        })
    }

    /// File changes of `commit` against its first parent, with aggregate stats.
    pub fn file_changes(&self, commit: &Commit) -> Result<(Vec<FileChange>, CommitStats), DiffError> {
        let parent_tree = if commit.is_root() {
            match self.root_policy {
                RootCommitPolicy::EmptyTree => {
                    debug!("diffing root commit {} against the empty tree", commit.id.short());
                    None
                }
                RootCommitPolicy::Skip => {
                    warn!("skipping file changes of root commit {}", commit.id.short());
                    return Ok((Vec::new(), CommitStats::default()));
                }
                RootCommitPolicy::Fail => {
                    return Err(DiffError::NoParent {
                        hash: commit.id.short().to_string(),
                    });
                }
            }
        } else {
            Some(self.repo.parent_of(commit, 0)?.tree)
        };

        let changes = self
            .repo
            .diff_trees(parent_tree.as_ref(), &commit.tree)
            .map_err(|source| DiffError::Changes {
                hash: commit.id.short().to_string(),
                source,
            })?;
        let files: Vec<FileChange> = changes.iter().map(to_file_change).collect();
        let stats = aggregate_stats(&files);
        Ok((files, stats))
    }
}

/// Resolve one raw change. Deletions are reported under their old path.
fn to_file_change(change: &RawChange) -> FileChange {
    let status = change.action();
    let path = match status {
        FileStatus::Deleted => change.old_path.as_ref().or(change.new_path.as_ref()),
        _ => change.new_path.as_ref().or(change.old_path.as_ref()),
    }
    .cloned()
    .unwrap_or_default();

    let (additions, deletions) = change.patch_stats();

    FileChange {
        path,
        status,
        additions,
        deletions,
        content: changed_lines(change),
    }
}

/// Render only the changed lines, deletions first.
fn changed_lines(change: &RawChange) -> String {
    let mut additions = String::new();
    let mut deletions = String::new();

    for line in &change.lines {
        let target = match line.origin {
            '+' => &mut additions,
            '-' => &mut deletions,
            _ => continue,
        };
        target.push(line.origin);
        target.push_str(&line.content);
        target.push('\n');
    }

    let mut result = String::new();
    if !deletions.is_empty() {
        result.push_str("DELETIONS:\n");
        result.push_str(&deletions);
        result.push('\n');
    }
    if !additions.is_empty() {
        result.push_str("ADDITIONS:\n");
        result.push_str(&additions);
    }
    result.trim().to_string()
}

/// Sum per-file counts and tally languages in first-seen order.
pub fn aggregate_stats(files: &[FileChange]) -> CommitStats {
    let mut stats = CommitStats {
        total_files: files.len(),
        ..CommitStats::default()
    };
    let mut tally: Vec<(&'static str, usize)> = Vec::new();

    for file in files {
        stats.additions += file.additions;
        stats.deletions += file.deletions;

        if let Some(lang) = classify(&file.path) {
            match tally.iter_mut().find(|(l, _)| *l == lang) {
                Some((_, count)) => *count += 1,
                None => tally.push((lang, 1)),
            }
        }
    }
    stats.total_lines = stats.additions + stats.deletions;

    let mut primary: Option<(&str, usize)> = None;
    for &(lang, count) in &tally {
        if primary.is_none_or(|(_, best)| count > best) {
            primary = Some((lang, count));
        }
    }

    stats.languages = tally.iter().map(|(l, _)| l.to_string()).collect();
    stats.primary_language = primary.map(|(l, _)| l.to_string());
    stats
}
