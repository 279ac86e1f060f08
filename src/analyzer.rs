//! Analysis coordinator.
//!
//! [`RouteAnalyzer`] owns all mutable analysis state — the import graph, the
//! per-file fact cache, the route-impact cache and diagnostics — as explicit
//! state with caller-managed lifetime. All mutation flows through one
//! coordinating instance; multiple processes must not share one live graph
//! (the persisted snapshot is the only cross-process channel, last writer
//! wins).
//!
//! Full builds read files in bounded concurrent batches: reads overlap
//! within a batch, batches run sequentially, and every per-file failure is
//! isolated to that file.

use crate::config::AnalyzerConfig;
use crate::diagnostics::{Diagnostics, SkipReason};
use crate::graph::component_map::{self, ComponentBinding, RouteMatch};
use crate::graph::impact::{ImpactBounds, RouteImpactResolver};
use crate::graph::{GraphMetrics, ImportGraph};
use crate::ingest::{
    compute_hash, detect_file_kind, extract_facts, routes::default_recognizers, FileFact,
    RouteRecognizer,
};
use crate::resolver::ImportResolver;
use crate::store::{load_snapshot, save_snapshot, snapshot_key, ByteStore, GraphSnapshot};
use crate::validation::{normalize_project_path, relative_to_root};
use ahash::AHashMap;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Progress callback for full scans: (processed, total)
pub type ScanProgress = dyn Fn(usize, usize) + Send + Sync;

/// Coarse classification of a route-declaring file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RouteFileType {
    /// Lives under a test/spec path
    Test,
    /// Router-named file (router, routes, app shell)
    Primary,
    /// Generic file that merely contains route declarations
    ComponentWithRoutes,
}

/// Per-file answer of [`RouteAnalyzer::route_info`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    /// Route paths affected by a change to this file
    pub routes: Vec<String>,
    /// Whether the file itself declares routes
    pub is_route_definer: bool,
    /// Classification, present only for route definers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_file_type: Option<RouteFileType>,
}

/// The analysis engine: graph, caches and configuration under one owner
pub struct RouteAnalyzer {
    root: PathBuf,
    config: AnalyzerConfig,
    resolver: Arc<ImportResolver>,
    recognizers: Arc<Vec<Box<dyn RouteRecognizer>>>,
    exclude: GlobSet,
    graph: ImportGraph,
    facts: AHashMap<String, FileFact>,
    impact: RouteImpactResolver,
    diagnostics: Diagnostics,
    store: Option<Arc<dyn ByteStore>>,
    snapshot_key: String,
}

impl RouteAnalyzer {
    /// Create an analyzer for the project rooted at `root`
    pub fn new(root: impl Into<PathBuf>, config: AnalyzerConfig) -> Result<Self> {
        let root = root.into();
        let resolver = Arc::new(ImportResolver::new(
            root.clone(),
            config.aliases.clone(),
            config.extensions.clone(),
        ));
        let exclude = build_globset(&config.exclude);
        let snapshot_key = snapshot_key(&config.store_namespace, &root);

        Ok(Self {
            root,
            config,
            resolver,
            recognizers: Arc::new(default_recognizers()),
            exclude,
            graph: ImportGraph::new(),
            facts: AHashMap::new(),
            impact: RouteImpactResolver::new(),
            diagnostics: Diagnostics::new(),
            store: None,
            snapshot_key,
        })
    }

    /// Attach a byte store for snapshot persistence
    pub fn with_store(mut self, store: Arc<dyn ByteStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Load the persisted graph, or build fresh when no valid snapshot
    /// exists. `force_rebuild` clears all caches first and skips the load.
    pub async fn initialize(&mut self, force_rebuild: bool) -> Result<()> {
        if force_rebuild {
            self.clear_all();
        } else if let Some(store) = &self.store {
            if let Some(snapshot) = load_snapshot(store.as_ref(), &self.snapshot_key) {
                let (graph, facts) = snapshot.restore();
                self.graph = graph;
                self.facts = facts;
                self.impact.clear();
                debug!(files = self.graph.len(), "hydrated graph from snapshot");
                return Ok(());
            }
        }

        self.build_graph(None).await?;
        self.persist();
        Ok(())
    }

    /// Full graph construction over the whole project tree.
    ///
    /// Files are processed in batches of `config.batch_size`; per-file
    /// results apply as they complete, so concurrent readers during a
    /// rebuild may observe a partially updated graph. Consistency holds
    /// after the whole file set has been processed.
    ///
    /// # Returns
    /// Number of files processed
    pub async fn build_graph(&mut self, progress: Option<&ScanProgress>) -> Result<usize> {
        let files = self.discover_files()?;
        let total = files.len();
        let mut processed = 0usize;

        for chunk in files.chunks(self.config.batch_size.max(1)) {
            let mut join_set = tokio::task::JoinSet::new();
            for path in chunk {
                let path = path.clone();
                let root = self.root.clone();
                let resolver = Arc::clone(&self.resolver);
                let recognizers = Arc::clone(&self.recognizers);
                let max_file_size = self.config.max_file_size;
                join_set.spawn(async move {
                    let abs = root.join(&path);
                    match tokio::fs::read(&abs).await {
                        Ok(bytes) => {
                            let fact = extract_facts(
                                &path,
                                &bytes,
                                resolver.as_ref(),
                                recognizers.as_slice(),
                                max_file_size,
                            );
                            let skipped = skip_reason_for(&bytes, max_file_size);
                            (path, Some(fact), skipped)
                        }
                        Err(e) => {
                            debug!(path, error = %e, "file read failed during scan");
                            (path, None, Some(SkipReason::Unreadable))
                        }
                    }
                });
            }

            while let Some(joined) = join_set.join_next().await {
                let (path, fact, skipped) =
                    joined.context("scan worker task failed")?;
                if let Some(reason) = skipped {
                    self.diagnostics.record(&path, reason);
                }
                match fact {
                    Some(fact) => {
                        self.graph.upsert(&path, &fact);
                        self.facts.insert(path, fact);
                    }
                    None => {
                        // Keep a node for the unreadable file so edges into
                        // it survive
                        self.graph.upsert(&path, &FileFact::empty(&path));
                    }
                }
                processed += 1;
                if let Some(cb) = progress {
                    cb(processed, total);
                }
            }
        }

        self.graph.recompute_entry_points();
        self.impact.clear();
        Ok(processed)
    }

    /// The primary query: which routes does each changed file affect?
    ///
    /// Facts for the given files are refreshed first (content-hash check,
    /// re-extraction on change), then impact resolves per file. Unknown or
    /// unreadable files yield an empty route set, never an error.
    pub async fn detect_routes(
        &mut self,
        changed_files: &[String],
    ) -> BTreeMap<String, Vec<String>> {
        let mut any_changed = false;
        let mut normalized: Vec<(String, String)> = Vec::new();

        for raw in changed_files {
            let Some(path) = self.normalize_input(raw) else {
                normalized.push((raw.clone(), String::new()));
                continue;
            };
            if self.refresh_file(&path).await {
                any_changed = true;
            }
            normalized.push((raw.clone(), path));
        }

        if any_changed {
            self.graph.recompute_entry_points();
        }

        let bounds = self.bounds();
        let mut results = BTreeMap::new();
        for (raw, path) in normalized {
            let routes = if path.is_empty() {
                Vec::new()
            } else {
                self.impact.impact_of(&self.graph, &self.facts, &path, bounds)
            };
            results.insert(raw, routes);
        }
        results
    }

    /// [`detect_routes`] plus a coarse classification of route definers.
    ///
    /// [`detect_routes`]: RouteAnalyzer::detect_routes
    pub async fn route_info(
        &mut self,
        changed_files: &[String],
    ) -> BTreeMap<String, RouteInfo> {
        let routes = self.detect_routes(changed_files).await;
        let mut results = BTreeMap::new();
        for (raw, route_paths) in routes {
            let is_definer = self
                .normalize_input(&raw)
                .and_then(|p| self.facts.get(&p).map(|f| f.is_route_file()))
                .unwrap_or(false);
            let route_file_type = is_definer.then(|| classify_route_file(&raw));
            results.insert(
                raw,
                RouteInfo {
                    routes: route_paths,
                    is_route_definer: is_definer,
                    route_file_type,
                },
            );
        }
        results
    }

    /// Summary counters over the graph
    pub fn metrics(&self) -> GraphMetrics {
        self.graph.metrics()
    }

    /// Diagnostics accumulated by scans and refreshes
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Every route served by the given component file, across the codebase.
    ///
    /// Scans each route file's import map for an alias of `component_file`
    /// and returns the declarations bound to that local name.
    pub fn find_routes_serving_component(&self, component_file: &str) -> Vec<RouteMatch> {
        let Some(target) = self.normalize_input(component_file) else {
            return Vec::new();
        };

        let mut matches = Vec::new();
        for route_file in self.graph.all_route_files() {
            let Some(fact) = self.facts.get(&route_file) else {
                continue;
            };
            let Some(local) = component_map::local_name_of(fact, &target) else {
                continue;
            };
            for decl in &fact.routes {
                if decl.component == local {
                    matches.push(RouteMatch {
                        route_path: decl.path.clone(),
                        component: decl.component.clone(),
                        route_file: route_file.clone(),
                        line: decl.line,
                    });
                }
            }
        }
        matches.sort_by(|a, b| {
            a.route_file
                .cmp(&b.route_file)
                .then(a.line.cmp(&b.line))
                .then(a.route_path.cmp(&b.route_path))
        });
        matches
    }

    /// Component bindings for one route-declaring file
    pub fn component_bindings(&self, route_file: &str) -> Vec<ComponentBinding> {
        self.normalize_input(route_file)
            .and_then(|p| self.facts.get(&p))
            .map(component_map::map_route_file)
            .unwrap_or_default()
    }

    /// Refresh one file's fact from disk.
    ///
    /// No-op when the content hash is unchanged. On change, the fact is
    /// replaced wholesale, stale reverse edges are retracted (the
    /// incremental path keeps the graph exact), and impact-cache entries
    /// that could have gone stale are dropped on both the old and the new
    /// edge neighborhood. A missing file keeps its node so edges into it
    /// survive.
    ///
    /// # Returns
    /// true when graph state changed
    pub async fn refresh_file(&mut self, path: &str) -> bool {
        let abs = self.root.join(path);
        let bytes = match tokio::fs::read(&abs).await {
            Ok(bytes) => bytes,
            Err(_) => {
                if self.facts.remove(path).is_some() {
                    self.impact.invalidate(&self.graph, path);
                    self.graph.mark_removed(path);
                    debug!(path, "file removed; facts dropped");
                    return true;
                }
                return false;
            }
        };

        let hash = compute_hash(&bytes);
        if self
            .facts
            .get(path)
            .is_some_and(|fact| fact.content_hash == hash)
        {
            return false;
        }

        let fact = extract_facts(
            path,
            &bytes,
            self.resolver.as_ref(),
            self.recognizers.as_slice(),
            self.config.max_file_size,
        );
        if let Some(reason) = skip_reason_for(&bytes, self.config.max_file_size) {
            self.diagnostics.record(path, reason);
        }

        // Invalidate against the pre-update neighborhood, then the
        // post-update one: importer sets on both sides may differ
        self.impact.invalidate(&self.graph, path);
        let old_edges = self.graph.outgoing(path);
        self.graph.upsert(path, &fact);
        self.graph.retract_edges(path, &old_edges);
        self.facts.insert(path.to_string(), fact);
        self.impact.invalidate(&self.graph, path);
        true
    }

    /// Write the current graph and fact cache through the byte store.
    ///
    /// Persistence failures log at low severity and never propagate; the
    /// snapshot is a cache, not a source of truth.
    pub fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let snapshot = GraphSnapshot::capture(&self.graph, &self.facts);
        if let Err(e) = save_snapshot(store.as_ref(), &self.snapshot_key, &snapshot) {
            warn!(key = %self.snapshot_key, error = %e, "snapshot persist failed");
        }
    }

    /// Project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The snapshot key this analyzer persists under
    pub fn snapshot_key(&self) -> &str {
        &self.snapshot_key
    }

    /// Active configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn bounds(&self) -> ImpactBounds {
        ImpactBounds {
            depth_limit: self.config.impact_depth_limit,
            exhaustive: self.config.exhaustive_impact,
        }
    }

    fn clear_all(&mut self) {
        self.graph.clear();
        self.facts.clear();
        self.impact.clear();
        self.diagnostics.clear();
    }

    /// Turn caller-supplied paths (absolute or project-relative) into graph
    /// keys
    fn normalize_input(&self, raw: &str) -> Option<String> {
        let path = Path::new(raw);
        if path.is_absolute() {
            relative_to_root(&self.root, path).ok()
        } else {
            normalize_project_path(raw)
        }
    }

    /// Enumerate analyzable files under the root, sorted for determinism
    fn discover_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        if self.config.use_gitignore {
            for result in ignore::WalkBuilder::new(&self.root)
                .follow_links(false)
                .build()
            {
                let Ok(entry) = result else { continue };
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                self.consider(entry.path(), &mut files);
            }
        } else {
            for entry in walkdir::WalkDir::new(&self.root)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                self.consider(entry.path(), &mut files);
            }
        }

        files.sort();
        Ok(files)
    }

    fn consider(&self, path: &Path, files: &mut Vec<String>) {
        let Ok(relative) = relative_to_root(&self.root, path) else {
            return;
        };
        if self.exclude.is_match(&relative) {
            return;
        }
        if detect_file_kind(Path::new(&relative)).is_none() {
            return;
        }
        files.push(relative);
    }
}

/// Why extracted content produced an empty fact, if it did
fn skip_reason_for(bytes: &[u8], max_file_size: usize) -> Option<SkipReason> {
    if bytes.len() > max_file_size {
        Some(SkipReason::Oversized)
    } else if crate::common::looks_binary(bytes) {
        Some(SkipReason::Binary)
    } else {
        None
    }
}

/// Classify a route-declaring file by path heuristics
fn classify_route_file(path: &str) -> RouteFileType {
    let lower = path.to_ascii_lowercase();
    if lower.contains("__tests__")
        || lower.contains(".test.")
        || lower.contains(".spec.")
        || lower.contains("/test/")
        || lower.contains("/tests/")
    {
        return RouteFileType::Test;
    }

    let stem = lower
        .rsplit('/')
        .next()
        .and_then(|name| name.split('.').next())
        .unwrap_or("");
    if stem.contains("route") || stem.contains("router") || matches!(stem, "app" | "main" | "index")
    {
        return RouteFileType::Primary;
    }
    RouteFileType::ComponentWithRoutes
}

fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!(pattern, error = %e, "invalid exclude pattern ignored"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "exclude set failed to build; excluding nothing");
        GlobSet::empty()
    })
}
