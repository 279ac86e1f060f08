//! Fact extraction from source files.
//!
//! One [`FileFact`] per analyzed file: imports, exports and route
//! declarations, stamped with a content hash. Facts are replaced wholesale
//! when the hash changes; they are never patched in place.
//!
//! Three extraction passes share one parsed tree. Path-convention route
//! recognition needs no tree and runs even when parsing failed. Binary and
//! oversized files are skipped entirely, yielding an empty fact.

pub mod conventions;
pub mod detect;
pub mod exports;
pub mod imports;
pub mod pool;
pub mod routes;

// Re-exports from submodules
pub use detect::{detect_file_kind, grammar_for, FileKind, Grammar};
pub use imports::{ImportKind, RawImport};
pub use routes::{RouteDecl, RouteRecognizer, CONVENTION_LINE, INDEX_ROUTE, UNKNOWN_COMPONENT};

use crate::common::looks_binary;
use crate::resolver::ImportResolver;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// One import edge out of a file
///
/// Static and dynamic imports are represented uniformly. Unresolved imports
/// (bare package names, unresolvable aliases, missing targets) keep a None
/// source; they are excluded from graph edges but retained for diagnostics
/// and component attribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportEdge {
    /// Resolved project-relative path, or None if unresolvable/external
    pub source: Option<String>,
    /// Import specifier as written in source
    pub specifier: String,
    /// Kind of import statement
    pub kind: ImportKind,
    /// Local identifiers bound by this import
    pub local_names: Vec<String>,
    /// Line where the import starts (1-indexed)
    pub line: usize,
}

/// The extracted, structured summary of one source file
///
/// Pure data structure. Created on first parse; replaced wholesale when the
/// content hash changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileFact {
    /// Project-relative path
    pub path: String,
    /// All imports, resolved where possible
    pub imports: Vec<ImportEdge>,
    /// Exported symbol names (`default` marker included)
    pub exports: Vec<String>,
    /// Route declarations from every matching convention, unioned
    pub routes: Vec<RouteDecl>,
    /// `sha256:`-prefixed digest of the file content
    pub content_hash: String,
    /// When this fact was last extracted
    pub last_seen_at: DateTime<Utc>,
}

impl FileFact {
    /// An empty fact for a file that was skipped or could not be read
    pub fn empty(path: &str) -> Self {
        Self {
            path: path.to_string(),
            imports: Vec::new(),
            exports: Vec::new(),
            routes: Vec::new(),
            content_hash: String::new(),
            last_seen_at: Utc::now(),
        }
    }

    /// Resolved import targets, for graph edges
    pub fn resolved_imports(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .filter_map(|edge| edge.source.as_deref())
    }

    /// Whether this file declares at least one route
    pub fn is_route_file(&self) -> bool {
        !self.routes.is_empty()
    }
}

/// Compute the `sha256:`-prefixed content hash of file contents
pub fn compute_hash(source: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source);
    let hash = hasher.finalize();
    format!("sha256:{}", hex::encode(hash))
}

/// Extract a complete [`FileFact`] from one file's content.
///
/// # Arguments
/// * `path` - Project-relative path (graph key)
/// * `source` - Raw file content
/// * `resolver` - Import resolver for this project
/// * `recognizers` - Route recognizer registry
/// * `max_file_size` - Size threshold beyond which the file is skipped
///
/// # Returns
/// A fact for the file. Binary or oversized content yields an empty fact;
/// a parse failure still runs path-convention route recognition. Never
/// fails: malformed input produces fewer facts, not an error.
pub fn extract_facts(
    path: &str,
    source: &[u8],
    resolver: &ImportResolver,
    recognizers: &[Box<dyn RouteRecognizer>],
    max_file_size: usize,
) -> FileFact {
    if source.len() > max_file_size || looks_binary(source) {
        let mut fact = FileFact::empty(path);
        fact.content_hash = compute_hash(source);
        return fact;
    }

    let kind = detect_file_kind(Path::new(path));
    let tree = match kind {
        Some(FileKind::Parsed(grammar)) => pool::parse_with_fallback(grammar, source),
        _ => None,
    };

    let mut imports = Vec::new();
    let mut exports = Vec::new();
    if let Some(tree) = &tree {
        for raw in imports::extract_imports(tree, source) {
            let source_path = resolver.resolve(path, &raw.specifier);
            imports.push(ImportEdge {
                source: source_path,
                specifier: raw.specifier,
                kind: raw.kind,
                local_names: raw.local_names,
                line: raw.line,
            });
        }
        exports = exports::extract_exports(tree, source);
    }

    // Convention recognizers only need the path; they run regardless of
    // whether a tree exists
    let input = routes::RecognizerInput {
        path,
        tree: tree.as_ref(),
        source,
    };
    let route_decls = routes::recognize_routes(recognizers, &input);

    FileFact {
        path: path.to_string(),
        imports,
        exports,
        routes: route_decls,
        content_hash: compute_hash(source),
        last_seen_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, ImportResolver, Vec<Box<dyn RouteRecognizer>>) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/About.tsx"), "export default 1;\n").unwrap();
        let resolver = ImportResolver::new(
            dir.path(),
            vec![("@/".to_string(), "src/".to_string())],
            vec!["tsx".into(), "ts".into(), "jsx".into(), "js".into()],
        );
        (dir, resolver, routes::default_recognizers())
    }

    #[test]
    fn test_extract_full_fact() {
        let (_dir, resolver, recognizers) = fixture();
        let source = br#"
import About from './About';
export const routes = [{ path: "/about", element: <About /> }];
"#;
        let fact = extract_facts("src/routes.tsx", source, &resolver, &recognizers, 1 << 20);

        assert_eq!(fact.imports.len(), 1);
        assert_eq!(fact.imports[0].source.as_deref(), Some("src/About.tsx"));
        assert_eq!(fact.exports, vec!["routes"]);
        assert_eq!(fact.routes.len(), 1);
        assert_eq!(fact.routes[0].path, "/about");
        assert!(fact.is_route_file());
        assert!(fact.content_hash.starts_with("sha256:"));
    }

    #[test]
    fn test_unresolved_import_kept_with_null_source() {
        let (_dir, resolver, recognizers) = fixture();
        let source = b"import React from 'react';\n";
        let fact = extract_facts("src/App.tsx", source, &resolver, &recognizers, 1 << 20);

        assert_eq!(fact.imports.len(), 1);
        assert_eq!(fact.imports[0].source, None);
        assert_eq!(fact.resolved_imports().count(), 0);
    }

    #[test]
    fn test_binary_file_yields_empty_fact() {
        let (_dir, resolver, recognizers) = fixture();
        let source = b"\x00\x01binary";
        let fact = extract_facts("src/blob.ts", source, &resolver, &recognizers, 1 << 20);

        assert!(fact.imports.is_empty());
        assert!(fact.routes.is_empty());
        assert!(!fact.is_route_file());
    }

    #[test]
    fn test_oversized_file_yields_empty_fact() {
        let (_dir, resolver, recognizers) = fixture();
        let source = b"export const x = 1;\n";
        let fact = extract_facts("src/big.ts", source, &resolver, &recognizers, 4);

        assert!(fact.imports.is_empty());
        assert!(fact.exports.is_empty());
    }

    #[test]
    fn test_convention_routes_without_parse() {
        let (_dir, resolver, recognizers) = fixture();
        // .vue files have no grammar; the pages convention still applies
        let fact = extract_facts(
            "pages/contact.vue",
            b"<template><div /></template>",
            &resolver,
            &recognizers,
            1 << 20,
        );
        assert_eq!(fact.routes.len(), 1);
        assert_eq!(fact.routes[0].path, "/contact");
        assert_eq!(fact.routes[0].line, CONVENTION_LINE);
    }

    #[test]
    fn test_multiple_conventions_union() {
        let (_dir, resolver, recognizers) = fixture();
        let source = br#"export const extra = [{ path: "/inline" }];"#;
        let fact = extract_facts("pages/about.tsx", source, &resolver, &recognizers, 1 << 20);

        let paths: Vec<&str> = fact.routes.iter().map(|r| r.path.as_str()).collect();
        assert!(paths.contains(&"/about"), "convention route present");
        assert!(paths.contains(&"/inline"), "object-literal route present");
    }

    #[test]
    fn test_hash_changes_with_content() {
        assert_ne!(compute_hash(b"a"), compute_hash(b"b"));
        assert_eq!(compute_hash(b"same"), compute_hash(b"same"));
    }
}
