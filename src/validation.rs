//! Path normalization and validation utilities.
//!
//! All graph keys are project-relative, forward-slash paths. Import
//! specifiers and user-supplied changed-file paths go through these helpers
//! before touching the graph so that `./`, `../` and platform separators
//! never leak into node identities.

use camino::Utf8Path;
use std::path::Path;

/// Error types for path validation.
#[derive(Debug, thiserror::Error)]
pub enum PathValidationError {
    /// Path is not valid UTF-8
    #[error("path is not valid UTF-8: {0}")]
    NotUtf8(String),

    /// Normalized path escapes the project root
    #[error("path escapes project root: {0}")]
    EscapesRoot(String),
}

/// Normalize a project-relative path string.
///
/// Folds `.` and `..` components and converts backslashes to forward
/// slashes. Returns None if the path would climb above the project root
/// (more `..` components than preceding segments).
///
/// # Arguments
/// * `path` - Project-relative path, possibly containing `./` or `../`
///
/// # Returns
/// Normalized forward-slash path, or None if the path escapes the root
pub fn normalize_project_path(path: &str) -> Option<String> {
    let unified = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();

    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    Some(segments.join("/"))
}

/// Convert an absolute path under `root` into a normalized project-relative key.
///
/// # Arguments
/// * `root` - Project root directory
/// * `path` - Absolute (or root-relative) path to convert
///
/// # Returns
/// Forward-slash project-relative path, or an error if the path is not
/// valid UTF-8 or does not live under the root
pub fn relative_to_root(root: &Path, path: &Path) -> Result<String, PathValidationError> {
    let stripped = path.strip_prefix(root).unwrap_or(path);
    let utf8 = Utf8Path::from_path(stripped)
        .ok_or_else(|| PathValidationError::NotUtf8(stripped.to_string_lossy().to_string()))?;
    normalize_project_path(utf8.as_str())
        .ok_or_else(|| PathValidationError::EscapesRoot(utf8.to_string()))
}

/// Resolve a relative import specifier against the importing file's directory.
///
/// `from_file` is a project-relative path; the specifier's `./` and `../`
/// components are folded against its parent directory.
///
/// # Returns
/// Normalized project-relative path, or None if the specifier climbs above
/// the project root
pub fn join_relative(from_file: &str, specifier: &str) -> Option<String> {
    let parent = match from_file.rfind('/') {
        Some(idx) => &from_file[..idx],
        None => "",
    };
    let combined = if parent.is_empty() {
        specifier.to_string()
    } else {
        format!("{}/{}", parent, specifier)
    };
    normalize_project_path(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_plain() {
        assert_eq!(
            normalize_project_path("src/a/b.ts"),
            Some("src/a/b.ts".to_string())
        );
    }

    #[test]
    fn test_normalize_dot_segments() {
        assert_eq!(
            normalize_project_path("src/./a/../b.ts"),
            Some("src/b.ts".to_string())
        );
        assert_eq!(
            normalize_project_path("./src/a.ts"),
            Some("src/a.ts".to_string())
        );
    }

    #[test]
    fn test_normalize_escape_returns_none() {
        assert_eq!(normalize_project_path("../outside.ts"), None);
        assert_eq!(normalize_project_path("src/../../outside.ts"), None);
    }

    #[test]
    fn test_normalize_backslashes() {
        assert_eq!(
            normalize_project_path("src\\pages\\index.tsx"),
            Some("src/pages/index.tsx".to_string())
        );
    }

    #[test]
    fn test_join_relative_sibling() {
        assert_eq!(
            join_relative("src/a/b.ts", "../c"),
            Some("src/c".to_string())
        );
        assert_eq!(
            join_relative("src/a/b.ts", "./c"),
            Some("src/a/c".to_string())
        );
    }

    #[test]
    fn test_join_relative_top_level_file() {
        assert_eq!(join_relative("main.ts", "./util"), Some("util".to_string()));
        assert_eq!(join_relative("main.ts", "../util"), None);
    }

    #[test]
    fn test_relative_to_root() {
        let root = PathBuf::from("/project");
        let path = PathBuf::from("/project/src/App.tsx");
        assert_eq!(
            relative_to_root(&root, &path).unwrap(),
            "src/App.tsx".to_string()
        );
    }
}
