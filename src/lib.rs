//! Wayfinder: static route-impact analysis for front-end codebases
//!
//! Given a changed source file in a large front-end code base, Wayfinder
//! answers which user-visible routes the change affects. It parses source
//! files with tree-sitter, extracts per-file facts (imports, exports, route
//! declarations), maintains a bidirectional file-level import graph, and
//! resolves route impact by walking the graph backward toward importers.
//!
//! # Position Conventions
//!
//! Wayfinder uses tree-sitter position conventions for all extracted data:
//! - **Line positions**: 1-indexed (line 1 is the first line)
//! - **Byte offsets**: 0-indexed from file start
//!
//! Path-convention routes carry line 0: no declaration line exists.
//!
//! # Path Conventions
//!
//! All graph keys are project-relative, forward-slash paths. Absolute paths
//! at the query surface normalize against the analyzer's project root.

pub mod analyzer;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod graph;
pub mod ingest;
pub mod output;
pub mod resolver;
pub mod store;
pub mod validation;
pub mod version;
pub mod watcher;

pub use analyzer::{RouteAnalyzer, RouteFileType, RouteInfo, ScanProgress};
pub use config::AnalyzerConfig;
pub use diagnostics::{Diagnostics, FileDiagnostic, SkipReason};
pub use graph::component_map::{ComponentBinding, ImportBinding, RouteMatch};
pub use graph::impact::{ImpactBounds, RouteImpactResolver};
pub use graph::{GraphMetrics, GraphNode, ImportGraph};
pub use ingest::{
    compute_hash, detect_file_kind, extract_facts, FileFact, FileKind, Grammar, ImportEdge,
    ImportKind, RouteDecl, RouteRecognizer, CONVENTION_LINE, INDEX_ROUTE, UNKNOWN_COMPONENT,
};
pub use output::{output_json, JsonResponse, OutputFormat};
pub use resolver::ImportResolver;
pub use store::{
    load_snapshot, save_snapshot, snapshot_key, ByteStore, GraphSnapshot, LocalDirStore,
    SnapshotNode, StoreError, SNAPSHOT_VERSION,
};
pub use validation::{normalize_project_path, relative_to_root, PathValidationError};
pub use watcher::{FileEvent, FileSystemWatcher, WatcherConfig};
