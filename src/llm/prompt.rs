//! Prompt synthesis from commit summaries.
//!
//! The output is a pure function of the [`SummaryRequest`]: the same request
//! always renders to byte-identical text.

use crate::commit::{CommitSummary, FileChange};

use super::types::SummaryRequest;

/// Non-empty content lines shown per file before truncating.
pub const MAX_PREVIEW_LINES: usize = 15;

const TRUNCATION_MARKER: &str = "... (truncated)";

const CODE_ANALYSIS_INSTRUCTIONS: &str = "\n\nCode Analysis Instructions:\
\n- Focus on the actual code changes and their impact\
\n- Identify new features, bug fixes, refactoring, or optimizations\
\n- Mention specific functions, classes, or modules when relevant\
\n- Highlight technical improvements or architectural changes\
\n- Consider the programming languages and technologies involved";

/// Render `request` into the user prompt sent to a backend.
pub fn build_prompt(request: &SummaryRequest) -> String {
    let mut out = String::new();

    if let Some(context) = &request.user_context {
        out.push_str(&format!("Project Context: {}\n\n", context));
    }

    out.push_str(&format!(
        "Analyzing {} git commit(s) with code changes:\n\n",
        request.commits.len()
    ));

    for (i, commit) in request.commits.iter().enumerate() {
        write_commit(&mut out, i + 1, commit);
    }

    out.push_str("Please create a summary following these guidelines:");
    out.push_str(request.platform.instructions());
    out.push_str(CODE_ANALYSIS_INSTRUCTIONS);
    out
}

fn write_commit(out: &mut String, index: usize, commit: &CommitSummary) {
    out.push_str(&format!("=== Commit {} ===\n", index));
    out.push_str(&format!("• Author: {}\n", commit.author));
    out.push_str(&format!("• Date: {}\n", commit.date.to_rfc3339()));
    out.push_str(&format!("• Message: {}\n", commit.message.trim_end()));

    let stats = &commit.stats;
    if stats.total_files > 0 {
        out.push_str(&format!("• Files changed: {}\n", stats.total_files));
        out.push_str(&format!("• Lines: +{} -{}\n", stats.additions, stats.deletions));
        if let Some(lang) = &stats.primary_language {
            out.push_str(&format!("• Primary language: {}\n", lang));
        }
        if stats.languages.len() > 1 {
            out.push_str(&format!("• Languages: {}\n", stats.languages.join(", ")));
        }
    }

    if !commit.files.is_empty() {
        out.push_str("• File changes:\n");
        for file in &commit.files {
            write_file(out, file);
        }
    }
    out.push('\n');
}

fn write_file(out: &mut String, file: &FileChange) {
    out.push_str(&format!("  - {} ({})", file.path, file.status));
    if file.additions > 0 || file.deletions > 0 {
        out.push_str(&format!(" [+{} -{}]", file.additions, file.deletions));
    }
    out.push('\n');

    if file.content.is_empty() {
        return;
    }

    out.push_str("    Code changes:\n");
    for line in preview_lines(&file.content) {
        out.push_str(&format!("    {}\n", line));
    }
    out.push('\n');
}

/// First [`MAX_PREVIEW_LINES`] non-empty lines, plus a marker if more remain.
fn preview_lines(content: &str) -> Vec<&str> {
    let mut lines = content.lines().filter(|l| !l.is_empty());
    let mut preview: Vec<&str> = lines.by_ref().take(MAX_PREVIEW_LINES).collect();
    if lines.next().is_some() {
        preview.push(TRUNCATION_MARKER);
    }
    preview
}
