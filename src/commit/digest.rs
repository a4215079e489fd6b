//! Plain-text digest of commit summaries, without any backend involved.

use super::diff::CommitSummary;

/// One line per commit: `- <short hash>: <first message line>`.
pub fn digest_commits(commits: &[CommitSummary]) -> String {
    if commits.is_empty() {
        return "No commits to summarize.".to_string();
    }

    commits
        .iter()
        .map(|c| format!("- {}: {}", c.hash, c.message.lines().next().unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n")
}
