//! Bidirectional file-level import graph.
//!
//! One node per file *reference* — including files that could not be read,
//! so edges into them survive. Edges are always maintained as complementary
//! pairs: adding `A imports B` also records `A` in `B.imported_by`; the
//! graph never holds a dangling one-directional edge.

pub mod component_map;
pub mod impact;

use crate::ingest::FileFact;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// One file node in the import graph
#[derive(Debug, Clone, Default)]
pub struct GraphNode {
    /// Project-relative path
    pub file: String,
    /// Files that import this one
    pub imported_by: AHashSet<String>,
    /// Files this one imports
    pub imports: AHashSet<String>,
    /// Derived from `FileFact.routes`; recomputed on every fact replacement
    pub is_route_file: bool,
    /// Derived, recomputed in a whole-graph pass after batches of upserts
    pub is_entry_point: bool,
}

impl GraphNode {
    fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            ..Default::default()
        }
    }
}

/// Summary counters over the whole graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub total_files: usize,
    pub route_files: usize,
    pub entry_points: usize,
    pub import_edges: usize,
}

/// In-memory bidirectional import graph over all project files
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    nodes: AHashMap<String, GraphNode>,
}

impl ImportGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file's facts in the graph.
    ///
    /// Clears and rebuilds only the *outgoing* edge set of the file's node.
    /// For every edge added, the target node is created if missing and the
    /// file is added to its `imported_by`.
    ///
    /// Stale outgoing edges from a previous version of the file are NOT
    /// removed from old targets' `imported_by` by this call alone. Callers
    /// that need immediate correctness diff old vs. new edges through
    /// [`retract_edges`]; otherwise the next full rebuild corrects
    /// eventually. This looser default is deliberate and documented, not
    /// silent data loss.
    ///
    /// [`retract_edges`]: ImportGraph::retract_edges
    pub fn upsert(&mut self, path: &str, fact: &FileFact) {
        let new_imports: AHashSet<String> =
            fact.resolved_imports().map(|s| s.to_string()).collect();

        {
            let node = self
                .nodes
                .entry(path.to_string())
                .or_insert_with(|| GraphNode::new(path));
            node.imports = new_imports.clone();
            node.is_route_file = fact.is_route_file();
        }

        for target in &new_imports {
            let target_node = self
                .nodes
                .entry(target.clone())
                .or_insert_with(|| GraphNode::new(target));
            target_node.imported_by.insert(path.to_string());
        }
    }

    /// Remove `path` from the `imported_by` sets of targets it no longer
    /// imports.
    ///
    /// `old` is the file's previous outgoing edge set; targets still present
    /// in the current edge set are left alone. The incremental refresh path
    /// calls this with the pre-upsert edges so watch-mode updates stay
    /// exact.
    pub fn retract_edges(&mut self, path: &str, old: &AHashSet<String>) {
        let current: AHashSet<String> = self
            .nodes
            .get(path)
            .map(|n| n.imports.clone())
            .unwrap_or_default();
        for target in old.difference(&current) {
            if let Some(node) = self.nodes.get_mut(target) {
                node.imported_by.remove(path);
            }
        }
    }

    /// Drop a deleted file's outgoing edges and route flag.
    ///
    /// The node itself is kept so that edges *into* the file survive; a
    /// reference to a missing file is still a reference.
    pub fn mark_removed(&mut self, path: &str) {
        let old: AHashSet<String> = self
            .nodes
            .get(path)
            .map(|n| n.imports.clone())
            .unwrap_or_default();
        if let Some(node) = self.nodes.get_mut(path) {
            node.imports.clear();
            node.is_route_file = false;
            node.is_entry_point = false;
        }
        for target in &old {
            if let Some(node) = self.nodes.get_mut(target) {
                node.imported_by.remove(path);
            }
        }
    }

    /// Look up a node by path
    pub fn get_node(&self, path: &str) -> Option<&GraphNode> {
        self.nodes.get(path)
    }

    /// Current outgoing edge set of a file (empty if absent)
    pub fn outgoing(&self, path: &str) -> AHashSet<String> {
        self.nodes
            .get(path)
            .map(|n| n.imports.clone())
            .unwrap_or_default()
    }

    /// All route-declaring files, sorted for deterministic iteration
    pub fn all_route_files(&self) -> Vec<String> {
        let mut files: Vec<String> = self
            .nodes
            .values()
            .filter(|n| n.is_route_file)
            .map(|n| n.file.clone())
            .collect();
        files.sort();
        files
    }

    /// Recompute entry-point classification over the whole graph.
    ///
    /// A node with no importers whose stem looks like an application
    /// bootstrap file (`index`, `main`, `App`) is an entry point. Runs as a
    /// separate pass after a batch of upserts because it depends on global
    /// importer-count state.
    pub fn recompute_entry_points(&mut self) {
        for node in self.nodes.values_mut() {
            node.is_entry_point = node.imported_by.is_empty() && looks_like_entry(&node.file);
        }
    }

    /// Summary counters
    pub fn metrics(&self) -> GraphMetrics {
        GraphMetrics {
            total_files: self.nodes.len(),
            route_files: self.nodes.values().filter(|n| n.is_route_file).count(),
            entry_points: self.nodes.values().filter(|n| n.is_entry_point).count(),
            import_edges: self.nodes.values().map(|n| n.imports.len()).sum(),
        }
    }

    /// Iterate all nodes in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node and edge
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Verify the paired-edge invariant; violations are programming defects.
    ///
    /// Returns the list of asymmetric edges (empty when consistent).
    pub fn check_edge_symmetry(&self) -> Vec<(String, String)> {
        let mut violations = Vec::new();
        for node in self.nodes.values() {
            for target in &node.imports {
                let paired = self
                    .nodes
                    .get(target)
                    .map(|t| t.imported_by.contains(&node.file))
                    .unwrap_or(false);
                if !paired {
                    violations.push((node.file.clone(), target.clone()));
                }
            }
        }
        violations
    }
}

/// Heuristic: does this path look like an application entry file?
fn looks_like_entry(path: &str) -> bool {
    let stem = path
        .rsplit('/')
        .next()
        .and_then(|name| name.split('.').next())
        .unwrap_or("");
    matches!(stem.to_ascii_lowercase().as_str(), "index" | "main" | "app")
}
