//! Component-route attribution.
//!
//! A second, file-scoped pass over one route-declaring file: binds each
//! declared route's component reference to the locally bound name introduced
//! by that file's own imports (plain and lazy). This makes "is component C
//! used at route R in file F" an exact check instead of "C's directory is
//! imported somewhere in F".

use crate::ingest::{FileFact, ImportKind, UNKNOWN_COMPONENT};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Where a locally bound name comes from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportBinding {
    /// Resolved project-relative source, or None if unresolved
    pub source: Option<String>,
    /// Specifier as written in the import
    pub specifier: String,
    /// Static, dynamic or lazy
    pub kind: ImportKind,
}

/// One route with its component binding resolved inside the declaring file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentBinding {
    /// Declared route path
    pub route_path: String,
    /// Component identifier as written in the declaration
    pub component_name: String,
    /// Import source the identifier is bound to, when the file imports it
    pub component_path: Option<String>,
    /// Declaration line
    pub line: usize,
}

/// A route found to be served by a specific component file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteMatch {
    /// Declared route path
    pub route_path: String,
    /// Local component identifier inside the route file
    pub component: String,
    /// The route-declaring file
    pub route_file: String,
    /// Declaration line
    pub line: usize,
}

/// Map every local identifier introduced by the file's imports to its
/// binding. Rebuilt whenever the file's fact is rebuilt.
pub fn import_map(fact: &FileFact) -> AHashMap<String, ImportBinding> {
    let mut map = AHashMap::new();
    for edge in &fact.imports {
        for local in &edge.local_names {
            map.insert(
                local.clone(),
                ImportBinding {
                    source: edge.source.clone(),
                    specifier: edge.specifier.clone(),
                    kind: edge.kind,
                },
            );
        }
    }
    map
}

/// Bind each route declaration in one file to its component's import source.
///
/// Declarations whose component is `unknown` or locally defined (not
/// imported) keep a None `component_path`.
pub fn map_route_file(fact: &FileFact) -> Vec<ComponentBinding> {
    let imports = import_map(fact);
    fact.routes
        .iter()
        .map(|decl| {
            let component_path = if decl.component == UNKNOWN_COMPONENT {
                None
            } else {
                imports
                    .get(&decl.component)
                    .map(|b| b.source.clone().unwrap_or_else(|| b.specifier.clone()))
            };
            ComponentBinding {
                route_path: decl.path.clone(),
                component_name: decl.component.clone(),
                component_path,
                line: decl.line,
            }
        })
        .collect()
}

/// The local identifier a route file binds to `target_file`, if any.
///
/// Matching is tolerant in order: exact resolved path, suffix match ignoring
/// extension, then base-name match. Unresolved imports match by specifier
/// base name.
pub fn local_name_of(fact: &FileFact, target_file: &str) -> Option<String> {
    // Sorted so the answer does not depend on map iteration order when
    // several locals would match at the same tier
    let mut bindings: Vec<(String, ImportBinding)> = import_map(fact).into_iter().collect();
    bindings.sort_by(|a, b| a.0.cmp(&b.0));

    let target_stem = strip_extension(target_file);
    let target_base = base_name(target_stem);

    // Exact resolved path
    for (local, binding) in &bindings {
        if binding.source.as_deref() == Some(target_file) {
            return Some(local.clone());
        }
    }
    // Suffix match ignoring extension
    for (local, binding) in &bindings {
        if let Some(source) = &binding.source {
            let source_stem = strip_extension(source);
            if source_stem == target_stem
                || source_stem.ends_with(&format!("/{}", target_stem))
                || target_stem.ends_with(&format!("/{}", source_stem))
            {
                return Some(local.clone());
            }
        }
    }
    // Base-name match, resolved or not
    for (local, binding) in &bindings {
        let candidate = binding.source.as_deref().unwrap_or(&binding.specifier);
        if base_name(strip_extension(candidate)) == target_base {
            return Some(local.clone());
        }
    }
    None
}

fn strip_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) if dot > path.rfind('/').map_or(0, |s| s + 1) => &path[..dot],
        _ => path,
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
