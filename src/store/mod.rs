//! Graph persistence through a pluggable byte store.
//!
//! The import graph and per-file fact cache serialize into one versioned
//! JSON document, written through the [`ByteStore`] trait. Remote backends
//! (object storage) plug in behind the same four calls; this crate ships a
//! local-directory backend.
//!
//! Any failure on the load path — missing key, storage error, corrupt blob,
//! version mismatch — degrades to "no cache" and a full rebuild. A
//! persistence failure must never surface as a query failure.

pub mod local;

pub use local::LocalDirStore;

use crate::graph::{GraphNode, ImportGraph};
use crate::ingest::FileFact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Snapshot document version; bumped on incompatible layout changes
pub const SNAPSHOT_VERSION: u32 = 2;

/// Errors surfaced by byte-store backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Key does not exist in the store
    #[error("key not found: {0}")]
    NotFound(String),

    /// Underlying I/O failure
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Blob exists but cannot be decoded
    #[error("corrupt blob: {0}")]
    Corrupt(String),
}

/// Pluggable byte-blob store
///
/// Implementations must treat keys as opaque `/`-separated strings.
pub trait ByteStore: Send + Sync {
    /// Write bytes under a key, replacing any previous value
    fn upload(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Read the bytes stored under a key
    fn download(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// All keys beginning with the given prefix
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Remove a key; absent keys are not an error
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// One graph node in serialized form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    pub file: String,
    pub imported_by: Vec<String>,
    pub imports: Vec<String>,
    pub is_route_file: bool,
    pub is_entry_point: bool,
}

/// The persisted graph document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    /// Layout version; mismatches are treated as cache misses
    pub version: u32,
    /// When the snapshot was written
    pub timestamp: DateTime<Utc>,
    /// Every graph node with both edge directions
    pub graph: Vec<SnapshotNode>,
    /// The per-file fact cache
    pub file_cache: Vec<FileFact>,
}

impl GraphSnapshot {
    /// Capture the current graph and fact cache.
    ///
    /// Nodes and edge lists are sorted so identical state serializes to
    /// identical bytes.
    pub fn capture(graph: &ImportGraph, facts: &ahash::AHashMap<String, FileFact>) -> Self {
        let mut nodes: Vec<SnapshotNode> = graph.iter().map(snapshot_node).collect();
        nodes.sort_by(|a, b| a.file.cmp(&b.file));

        let mut file_cache: Vec<FileFact> = facts.values().cloned().collect();
        file_cache.sort_by(|a, b| a.path.cmp(&b.path));

        Self {
            version: SNAPSHOT_VERSION,
            timestamp: Utc::now(),
            graph: nodes,
            file_cache,
        }
    }

    /// Rebuild the in-memory graph and fact cache from this snapshot
    pub fn restore(&self) -> (ImportGraph, ahash::AHashMap<String, FileFact>) {
        let mut facts = ahash::AHashMap::new();
        for fact in &self.file_cache {
            facts.insert(fact.path.clone(), fact.clone());
        }

        let mut graph = ImportGraph::new();
        for fact in self.file_cache.iter() {
            graph.upsert(&fact.path, fact);
        }
        // Nodes that exist only as references (unreadable files) have no
        // fact; re-create them from the node list so their edges survive
        for node in &self.graph {
            if facts.contains_key(&node.file) {
                continue;
            }
            graph.upsert(&node.file, &FileFact::empty(&node.file));
        }
        graph.recompute_entry_points();
        (graph, facts)
    }
}

fn snapshot_node(node: &GraphNode) -> SnapshotNode {
    let mut imported_by: Vec<String> = node.imported_by.iter().cloned().collect();
    imported_by.sort();
    let mut imports: Vec<String> = node.imports.iter().cloned().collect();
    imports.sort();
    SnapshotNode {
        file: node.file.clone(),
        imported_by,
        imports,
        is_route_file: node.is_route_file,
        is_entry_point: node.is_entry_point,
    }
}

/// Deterministic snapshot key for a project
///
/// `<namespace>/<project-name>/import-graph.json`, where the project name is
/// the root directory's base name.
pub fn snapshot_key(namespace: &str, project_root: &std::path::Path) -> String {
    let project = project_root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project");
    format!("{}/{}/import-graph.json", namespace, project)
}

/// Serialize and upload a snapshot
pub fn save_snapshot(
    store: &dyn ByteStore,
    key: &str,
    snapshot: &GraphSnapshot,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(snapshot)
        .map_err(|e| StoreError::Corrupt(format!("serialize: {}", e)))?;
    store.upload(key, &bytes)
}

/// Download and decode a snapshot, degrading every failure to None.
///
/// Absence, storage errors, undecodable JSON and version mismatches all log
/// at low severity and return None; the caller falls back to a full rebuild.
pub fn load_snapshot(store: &dyn ByteStore, key: &str) -> Option<GraphSnapshot> {
    let bytes = match store.download(key) {
        Ok(bytes) => bytes,
        Err(StoreError::NotFound(_)) => return None,
        Err(e) => {
            warn!(key, error = %e, "snapshot download failed; treating as cache miss");
            return None;
        }
    };

    let snapshot: GraphSnapshot = match serde_json::from_slice(&bytes) {
        Ok(s) => s,
        Err(e) => {
            warn!(key, error = %e, "snapshot blob corrupt; treating as cache miss");
            return None;
        }
    };

    if snapshot.version != SNAPSHOT_VERSION {
        warn!(
            key,
            found = snapshot.version,
            expected = SNAPSHOT_VERSION,
            "snapshot version mismatch; treating as cache miss"
        );
        return None;
    }

    Some(snapshot)
}
