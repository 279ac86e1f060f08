//! Import specifier resolution.
//!
//! Turns a raw import specifier plus the importing file's path into a
//! concrete project-relative file path. Only relative specifiers (`./`,
//! `../`) and configured alias prefixes are resolvable; bare package
//! specifiers are external dependencies and resolve to None immediately.
//!
//! Resolution tries, in order: the raw path, each configured source
//! extension appended, and each extension appended to an implicit `/index`
//! suffix. The first candidate that exists on disk wins. A miss is an
//! expected outcome, not an error.

use crate::validation::{join_relative, normalize_project_path};
use std::path::{Path, PathBuf};

/// Resolves raw import specifiers against the real file system
#[derive(Debug, Clone)]
pub struct ImportResolver {
    root: PathBuf,
    /// (prefix, replacement) alias rules, tried in order
    aliases: Vec<(String, String)>,
    /// Source extensions tried as candidates, in order
    extensions: Vec<String>,
}

impl ImportResolver {
    /// Create a resolver rooted at the project directory
    pub fn new(root: impl Into<PathBuf>, aliases: Vec<(String, String)>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            aliases,
            extensions,
        }
    }

    /// Resolve a raw specifier from the given importing file.
    ///
    /// # Arguments
    /// * `from_file` - Project-relative path of the importing file
    /// * `specifier` - Import specifier as written in source
    ///
    /// # Returns
    /// Project-relative path of the target file, or None for bare package
    /// specifiers, unresolvable aliases, and candidates missing on disk
    pub fn resolve(&self, from_file: &str, specifier: &str) -> Option<String> {
        let base = self.rewrite(from_file, specifier)?;
        self.first_existing(&base)
    }

    /// Rewrite a specifier into a project-relative base path, without
    /// touching the disk
    ///
    /// `./` specifiers resolve against the importing file's directory.
    /// `../` specifiers resolve against the importing file's path itself,
    /// so the first `..` cancels the file name: `../c` from `src/a/b.ts`
    /// lands on `src/a/c`. This matches the established resolution behavior
    /// downstream callers depend on.
    fn rewrite(&self, from_file: &str, specifier: &str) -> Option<String> {
        if specifier.starts_with("./") {
            return join_relative(from_file, specifier);
        }
        if specifier.starts_with("../") {
            return normalize_project_path(&format!("{}/{}", from_file, specifier));
        }
        for (prefix, replacement) in &self.aliases {
            if let Some(rest) = specifier.strip_prefix(prefix.as_str()) {
                return normalize_project_path(&format!("{}{}", replacement, rest));
            }
        }
        // Bare package specifier: external dependency, out of graph scope
        None
    }

    /// Try candidates in order and return the first that exists on disk
    fn first_existing(&self, base: &str) -> Option<String> {
        if self.exists(base) {
            return Some(base.to_string());
        }
        for ext in &self.extensions {
            let candidate = format!("{}.{}", base, ext);
            if self.exists(&candidate) {
                return Some(candidate);
            }
        }
        for ext in &self.extensions {
            let candidate = format!("{}/index.{}", base, ext);
            if self.exists(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).is_file()
    }

    /// Project root this resolver checks candidates against
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn resolver_with(files: &[&str]) -> (TempDir, ImportResolver) {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "export {};\n").unwrap();
        }
        let resolver = ImportResolver::new(
            dir.path(),
            vec![("@/".to_string(), "src/".to_string())],
            vec!["tsx".into(), "ts".into(), "jsx".into(), "js".into()],
        );
        (dir, resolver)
    }

    #[test]
    fn test_relative_sibling_with_extension_appended() {
        let (_dir, resolver) = resolver_with(&["src/a/c.ts"]);
        assert_eq!(
            resolver.resolve("src/a/b.ts", "./c"),
            Some("src/a/c.ts".to_string())
        );
    }

    #[test]
    fn test_parent_specifier_cancels_file_name() {
        // One `..` cancels b.ts, landing in the same directory
        let (_dir, resolver) = resolver_with(&["src/a/c.ts"]);
        assert_eq!(
            resolver.resolve("src/a/b.ts", "../c"),
            Some("src/a/c.ts".to_string())
        );
    }

    #[test]
    fn test_double_parent_climbs_one_directory() {
        let (_dir, resolver) = resolver_with(&["src/c.ts", "src/a/b.ts"]);
        assert_eq!(
            resolver.resolve("src/a/b.ts", "../../c"),
            Some("src/c.ts".to_string())
        );
    }

    #[test]
    fn test_bare_package_returns_none() {
        let (_dir, resolver) = resolver_with(&["src/a.ts"]);
        assert_eq!(resolver.resolve("src/a.ts", "lodash"), None);
        assert_eq!(resolver.resolve("src/a.ts", "react-router-dom"), None);
    }

    #[test]
    fn test_alias_prefix_rewrite() {
        let (_dir, resolver) = resolver_with(&["src/components/Button.tsx"]);
        assert_eq!(
            resolver.resolve("src/pages/Home.tsx", "@/components/Button"),
            Some("src/components/Button.tsx".to_string())
        );
    }

    #[test]
    fn test_raw_path_with_extension_wins_first() {
        let (_dir, resolver) = resolver_with(&["src/styles.css", "src/App.tsx"]);
        assert_eq!(
            resolver.resolve("src/App.tsx", "./styles.css"),
            Some("src/styles.css".to_string())
        );
    }

    #[test]
    fn test_index_file_resolution() {
        let (_dir, resolver) = resolver_with(&["src/pages/index.ts"]);
        assert_eq!(
            resolver.resolve("src/App.tsx", "./pages"),
            Some("src/pages/index.ts".to_string())
        );
    }

    #[test]
    fn test_extension_candidate_order() {
        // tsx is tried before ts, so the tsx file wins when both exist
        let (_dir, resolver) = resolver_with(&["src/Thing.tsx", "src/Thing.ts"]);
        assert_eq!(
            resolver.resolve("src/App.tsx", "./Thing"),
            Some("src/Thing.tsx".to_string())
        );
    }

    #[test]
    fn test_escape_above_root_unresolvable() {
        let (_dir, resolver) = resolver_with(&["a.ts"]);
        assert_eq!(resolver.resolve("a.ts", "../../outside"), None);
    }

    #[test]
    fn test_missing_target_returns_none() {
        let (_dir, resolver) = resolver_with(&["src/a.ts"]);
        assert_eq!(resolver.resolve("src/a.ts", "./missing"), None);
    }
}
