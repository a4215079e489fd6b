//! Request and response values exchanged with summarization backends.

use serde::{Deserialize, Serialize};

use crate::commit::CommitSummary;

use super::platform::{Platform, PlatformLimits};

/// Everything a backend needs to produce one summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Commits in walker order (newest first).
    pub commits: Vec<CommitSummary>,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
}

impl SummaryRequest {
    pub fn new(commits: Vec<CommitSummary>, platform: Platform) -> Self {
        Self {
            commits,
            platform,
            user_context: None,
        }
    }

    /// Attach free-text project context. Blank text is ignored.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.user_context = if context.trim().is_empty() {
            None
        } else {
            Some(context)
        };
        self
    }
}

/// Generated summary text for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub platform: Platform,
}

impl SummaryResponse {
    pub fn new(summary: impl Into<String>, platform: Platform) -> Self {
        Self {
            summary: summary.into(),
            platform,
        }
    }

    /// Unicode scalar values, not bytes.
    pub fn char_count(&self) -> usize {
        self.summary.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.summary.split_whitespace().count()
    }

    pub fn limits(&self) -> PlatformLimits {
        self.platform.limits()
    }

    pub fn meets_requirements(&self) -> bool {
        self.platform.accepts(self.char_count(), self.word_count())
    }

    /// `✅ N characters, M words`, with `⚠️` when out of range.
    pub fn stats_line(&self) -> String {
        let marker = if self.meets_requirements() { "✅" } else { "⚠️" };
        format!(
            "{} {} characters, {} words",
            marker,
            self.char_count(),
            self.word_count()
        )
    }
}
