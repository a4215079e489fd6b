//! Render and write the generated summary document.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::OutputError;
use crate::llm::SummaryResponse;

/// Markdown document for `response`, with a title and a stats footer.
pub fn render_document(response: &SummaryResponse) -> String {
    format!(
        "# {} Summary\n\n{}\n\n---\nGenerated by GitStory\nPlatform: {}\nStats: {}\n",
        response.platform.title(),
        response.summary,
        response.platform,
        response.stats_line()
    )
}

/// Warning line for a summary outside its platform's limits.
pub fn requirements_warning(response: &SummaryResponse) -> Option<String> {
    if response.meets_requirements() {
        return None;
    }
    let limits = response.limits();
    Some(format!(
        "⚠️ Summary may not meet {} requirements ({}-{} words, max {} characters)",
        response.platform.title(),
        limits.min_words,
        limits.max_words,
        limits.max_chars
    ))
}

/// Write the rendered document to `path`.
///
/// The content goes to a temporary file next to `path` first and is then
/// renamed over it, so a failed write never leaves a half-written file.
pub fn write_document(path: &Path, response: &SummaryResponse) -> Result<(), OutputError> {
    let failed = |source: std::io::Error| OutputError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(failed)?;
    tmp.write_all(render_document(response).as_bytes())
        .map_err(failed)?;
    tmp.flush().map_err(failed)?;
    tmp.persist(path).map_err(|e| failed(e.error))?;

    debug!("Wrote summary to {}", path.display());
    Ok(())
}
