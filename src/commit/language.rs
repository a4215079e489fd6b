//! File path → language label.

/// Classify `path` by its lower-cased extension, then by special file names.
///
/// Returns `None` for files that do not map to a known language; those are
/// left out of a commit's language tally.
pub fn classify(path: &str) -> Option<&'static str> {
    let name = file_name(path).to_lowercase();

    let by_extension = match extension(&name) {
        ".go" => Some("Go"),
        ".js" => Some("JavaScript"),
        ".ts" => Some("TypeScript"),
        ".py" => Some("Python"),
        ".java" => Some("Java"),
        ".c" => Some("C"),
        ".cpp" => Some("C++"),
        ".rs" => Some("Rust"),
        ".php" => Some("PHP"),
        ".rb" => Some("Ruby"),
        ".swift" => Some("Swift"),
        ".kt" => Some("Kotlin"),
        ".dart" => Some("Dart"),
        ".cs" => Some("C#"),
        ".scala" => Some("Scala"),
        ".clj" => Some("Clojure"),
        ".html" => Some("HTML"),
        ".css" => Some("CSS"),
        ".scss" => Some("SCSS"),
        ".sass" => Some("Sass"),
        ".sql" => Some("SQL"),
        ".sh" => Some("Shell"),
        ".yaml" | ".yml" => Some("YAML"),
        ".json" => Some("JSON"),
        ".xml" => Some("XML"),
        ".md" => Some("Markdown"),
        ".dockerfile" => Some("Docker"),
        _ => None,
    };

    by_extension.or(match name.as_str() {
        "dockerfile" => Some("Docker"),
        "makefile" => Some("Make"),
        _ => None,
    })
}

/// Final path component, accepting both separators.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Extension including the leading dot, or `""`. A leading-dot name such as
/// `.go` is treated as all extension.
fn extension(name: &str) -> &str {
    name.rfind('.').map_or("", |idx| &name[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify("main.go"), Some("Go"));
        assert_eq!(classify("src/lib.rs"), Some("Rust"));
        assert_eq!(classify("web/app.ts"), Some("TypeScript"));
        assert_eq!(classify("config.yml"), Some("YAML"));
        assert_eq!(classify("config.yaml"), Some("YAML"));
    }

    #[test]
    fn test_classify_bare_extension() {
        assert_eq!(classify(".go"), Some("Go"));
        assert_eq!(classify(".xyz"), None);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("README.MD"), Some("Markdown"));
        assert_eq!(classify("Main.Java"), Some("Java"));
    }

    #[test]
    fn test_classify_special_file_names() {
        assert_eq!(classify("Dockerfile"), Some("Docker"));
        assert_eq!(classify("deploy/DOCKERFILE"), Some("Docker"));
        assert_eq!(classify("build.dockerfile"), Some("Docker"));
        assert_eq!(classify("Makefile"), Some("Make"));
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("LICENSE"), None);
        assert_eq!(classify("archive.tar.gz"), None);
        assert_eq!(classify("dir.rs/notes"), None);
    }
}
