//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use git2::{Oid, Repository, Signature, Time};

use gitstory::CommitId;

/// Seconds since the epoch for the first commit; each commit adds a minute.
const BASE_TIME: i64 = 1_700_000_000;

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
    clock: std::cell::Cell<i64>,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory, with HEAD on `main`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        repo.set_head("refs/heads/main").expect("Failed to point HEAD at main");
        Self {
            dir,
            repo,
            clock: std::cell::Cell::new(BASE_TIME),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Deterministic signature, one minute later than the previous one.
    fn signature(&self) -> Signature<'static> {
        let secs = self.clock.get();
        self.clock.set(secs + 60);
        Signature::new("Test User", "test@example.com", &Time::new(secs, 0))
            .expect("Failed to create signature")
    }

    /// Write `content` to `path`, stage it and commit on HEAD.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(path)).expect("Failed to add file");
        self.commit_index(&mut index, message)
    }

    /// Remove `path` from the work tree and index and commit on HEAD.
    pub fn delete_file(&self, path: &str, message: &str) -> Oid {
        std::fs::remove_file(self.dir.path().join(path)).expect("Failed to remove file");
        let mut index = self.repo.index().expect("Failed to get index");
        index.remove_path(Path::new(path)).expect("Failed to remove from index");
        self.commit_index(&mut index, message)
    }

    fn commit_index(&self, index: &mut git2::Index, message: &str) -> Oid {
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let sig = self.signature();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a branch pointing to the given OID.
    pub fn branch(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo.branch(name, &commit, false).expect("Failed to create branch");
    }

    /// Switch HEAD and the work tree to `name`.
    pub fn checkout(&self, name: &str) {
        let refname = format!("refs/heads/{}", name);
        let obj = self.repo.revparse_single(&refname).expect("Failed to find branch");
        self.repo
            .checkout_tree(&obj, Some(git2::build::CheckoutBuilder::new().force()))
            .expect("Failed to checkout tree");
        self.repo.set_head(&refname).expect("Failed to set HEAD");
    }

    /// Merge `other` into HEAD with a two-parent commit and update the work tree.
    pub fn merge(&self, other: &str, message: &str) -> Oid {
        let head = self.repo.head().expect("Failed to get HEAD");
        let ours = head.peel_to_commit().expect("HEAD is not a commit");
        let theirs = self
            .repo
            .find_branch(other, git2::BranchType::Local)
            .expect("Failed to find branch")
            .get()
            .peel_to_commit()
            .expect("Branch is not a commit");

        let mut index = self
            .repo
            .merge_commits(&ours, &theirs, None)
            .expect("Failed to merge commits");
        let tree_id = index.write_tree_to(&self.repo).expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let sig = self.signature();
        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&ours, &theirs])
            .expect("Failed to create merge commit");
        self.repo
            .checkout_head(Some(git2::build::CheckoutBuilder::new().force()))
            .expect("Failed to checkout merge");
        oid
    }

    /// Add a remote named `origin`.
    pub fn add_origin(&self, url: &str) {
        self.repo.remote("origin", url).expect("Failed to add remote");
    }
}

/// Convert a git2 OID into the library's commit id.
pub fn id(oid: Oid) -> CommitId {
    CommitId::from(oid)
}
