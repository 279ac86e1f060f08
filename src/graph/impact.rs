//! Route impact resolution.
//!
//! Answers "which declared route paths are reachable from this file" by
//! walking the import graph backward through `imported_by`, toward the
//! things that depend on the file. Results are memoized per input file;
//! entries are invalidated file-by-file when a fact is rebuilt, and
//! conservatively for the file's direct importers.

use crate::graph::ImportGraph;
use crate::ingest::FileFact;
use ahash::{AHashMap, AHashSet};
use std::collections::{BTreeSet, VecDeque};

/// Traversal bounds for one impact query
#[derive(Debug, Clone, Copy)]
pub struct ImpactBounds {
    /// BFS depth beyond which traversal stops once any route was found
    pub depth_limit: usize,
    /// Walk the full importer closure, ignoring the depth limit
    pub exhaustive: bool,
}

/// Memoizing breadth-first route-impact resolver
#[derive(Debug, Default)]
pub struct RouteImpactResolver {
    cache: AHashMap<String, Vec<String>>,
}

impl RouteImpactResolver {
    /// Create a resolver with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Route paths affected by a change to `file`.
    ///
    /// Breadth-first traversal along `imported_by` edges. At each visited
    /// node that declares routes, its route paths are unioned into the
    /// result. Once at least one route has been found and the current depth
    /// exceeds the bound, traversal stops expanding; this caps worst-case
    /// cost on densely connected graphs at the documented risk of missing a
    /// route declared much deeper than the first one found. Setting
    /// `exhaustive` disables the bound.
    ///
    /// Output is sorted and de-duplicated; pathless route declarations
    /// (empty path strings) are not included.
    pub fn impact_of(
        &mut self,
        graph: &ImportGraph,
        facts: &AHashMap<String, FileFact>,
        file: &str,
        bounds: ImpactBounds,
    ) -> Vec<String> {
        if let Some(cached) = self.cache.get(file) {
            return cached.clone();
        }

        let routes = bfs_routes(graph, facts, file, bounds);
        self.cache.insert(file.to_string(), routes.clone());
        routes
    }

    /// Drop every cached result a change to `file` could have gone stale.
    ///
    /// Removes the file's own entry, its direct importers' entries
    /// (conservative), and the entries of all files reachable from `file`
    /// along `imports` — any file whose importer chain contains `file`
    /// computed its impact through it, and a stale answer here would be a
    /// silently missed route.
    pub fn invalidate(&mut self, graph: &ImportGraph, file: &str) {
        self.cache.remove(file);
        let Some(node) = graph.get_node(file) else {
            return;
        };
        for importer in &node.imported_by {
            self.cache.remove(importer);
        }

        let mut stack: Vec<String> = node.imports.iter().cloned().collect();
        let mut seen: AHashSet<String> = stack.iter().cloned().collect();
        while let Some(current) = stack.pop() {
            self.cache.remove(&current);
            if let Some(downstream) = graph.get_node(&current) {
                for target in &downstream.imports {
                    if seen.insert(target.clone()) {
                        stack.push(target.clone());
                    }
                }
            }
        }
    }

    /// Number of memoized entries
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when nothing is memoized
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Whether a file currently has a memoized result
    pub fn contains(&self, file: &str) -> bool {
        self.cache.contains_key(file)
    }

    /// Empty the whole cache
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

fn bfs_routes(
    graph: &ImportGraph,
    facts: &AHashMap<String, FileFact>,
    start: &str,
    bounds: ImpactBounds,
) -> Vec<String> {
    // BTreeSet keeps output ordering deterministic regardless of map
    // iteration order
    let mut routes: BTreeSet<String> = BTreeSet::new();
    let mut visited: AHashSet<String> = AHashSet::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();

    visited.insert(start.to_string());
    queue.push_back((start.to_string(), 0));

    while let Some((current, depth)) = queue.pop_front() {
        let Some(node) = graph.get_node(&current) else {
            continue;
        };

        if node.is_route_file {
            if let Some(fact) = facts.get(&current) {
                for decl in &fact.routes {
                    if !decl.path.is_empty() {
                        routes.insert(decl.path.clone());
                    }
                }
            }
        }

        // Early termination: something was found and we are already past
        // the depth bound, so stop climbing from here
        if !bounds.exhaustive && !routes.is_empty() && depth >= bounds.depth_limit {
            continue;
        }

        for importer in &node.imported_by {
            if visited.insert(importer.clone()) {
                queue.push_back((importer.clone(), depth + 1));
            }
        }
    }

    routes.into_iter().collect()
}
