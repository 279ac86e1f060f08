//! Import statement extraction from parsed source.
//!
//! Collects static `import … from "…"` declarations, call-style dynamic
//! imports (`import("…")`), and lazy-component bindings
//! (`const X = lazy(() => import("…"))`). Re-exports with a source
//! (`export { x } from "…"`) also create dependency edges.

use crate::common::{node_text, trim_string_literal};
use serde::{Deserialize, Serialize};

/// Kind of import statement
///
/// Dynamic and static imports build identical graph edges; the kind is kept
/// for component attribution, where lazy bindings carry a local name with
/// different binding semantics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImportKind {
    /// `import X from "…"`, `import { a } from "…"`, `export … from "…"`
    Static,
    /// Call-style `import("…")` with no bound name
    Dynamic,
    /// `const X = lazy(() => import("…"))` and equivalent wrapper shapes
    Lazy,
}

impl ImportKind {
    /// Return the normalized string key for this import kind (used for JSON)
    pub fn normalized_key(&self) -> &'static str {
        match self {
            ImportKind::Static => "static",
            ImportKind::Dynamic => "dynamic",
            ImportKind::Lazy => "lazy",
        }
    }
}

/// A raw import extracted from one file, before resolution
///
/// Pure data structure. The specifier is exactly as written in source;
/// resolution to a project-relative path happens later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawImport {
    /// Import specifier as written (e.g. `./App`, `@/pages/Home`, `react`)
    pub specifier: String,
    /// Kind of import statement
    pub kind: ImportKind,
    /// Local identifiers bound by this import, in declaration order
    pub local_names: Vec<String>,
    /// Line where the import starts (1-indexed)
    pub line: usize,
}

/// Extract all imports from a parsed tree.
///
/// # Arguments
/// * `tree` - Parsed syntax tree (may contain error nodes)
/// * `source` - Source content the tree was parsed from
///
/// # Returns
/// Raw imports in source order. Error nodes simply yield fewer imports.
pub fn extract_imports(tree: &tree_sitter::Tree, source: &[u8]) -> Vec<RawImport> {
    let mut imports = Vec::new();
    walk(&tree.root_node(), source, &mut imports);
    imports
}

fn walk(node: &tree_sitter::Node, source: &[u8], imports: &mut Vec<RawImport>) {
    match node.kind() {
        "import_statement" => {
            if let Some(import) = extract_static_import(node, source) {
                imports.push(import);
            }
            return;
        }
        "export_statement" => {
            // `export { x } from "…"` re-exports are dependency edges too
            if let Some(source_node) = node.child_by_field_name("source") {
                if let Some(specifier) = string_value(&source_node, source) {
                    imports.push(RawImport {
                        specifier,
                        kind: ImportKind::Static,
                        local_names: Vec::new(),
                        line: node.start_position().row + 1,
                    });
                    return;
                }
            }
        }
        "variable_declarator" => {
            if let Some(import) = extract_lazy_import(node, source) {
                imports.push(import);
                // The inner import() call would otherwise match the dynamic
                // recognizer below and duplicate the edge
                return;
            }
        }
        "call_expression" => {
            if let Some(import) = extract_dynamic_import(node, source) {
                imports.push(import);
                return;
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(&child, source, imports);
    }
}

/// Extract a static import declaration with its bound local names
fn extract_static_import(node: &tree_sitter::Node, source: &[u8]) -> Option<RawImport> {
    let source_node = node.child_by_field_name("source")?;
    let specifier = string_value(&source_node, source)?;

    let mut local_names = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "import_clause" {
            collect_clause_names(&child, source, &mut local_names);
        }
    }

    Some(RawImport {
        specifier,
        kind: ImportKind::Static,
        local_names,
        line: node.start_position().row + 1,
    })
}

/// Collect local identifiers from an import clause
///
/// Handles default imports, `{ a, b as c }` named imports (the local name
/// is the alias when present), and `* as ns` namespace imports.
fn collect_clause_names(clause: &tree_sitter::Node, source: &[u8], names: &mut Vec<String>) {
    let mut cursor = clause.walk();
    for child in clause.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                if let Some(text) = node_text(&child, source) {
                    names.push(text.to_string());
                }
            }
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let bound = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(text) = bound.and_then(|n| node_text(&n, source)) {
                        names.push(text.to_string());
                    }
                }
            }
            "namespace_import" => {
                let mut inner = child.walk();
                for part in child.children(&mut inner) {
                    if part.kind() == "identifier" {
                        if let Some(text) = node_text(&part, source) {
                            names.push(text.to_string());
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Extract a bare dynamic import: `import("…")`
fn extract_dynamic_import(node: &tree_sitter::Node, source: &[u8]) -> Option<RawImport> {
    let function = node.child_by_field_name("function")?;
    if function.kind() != "import" {
        return None;
    }
    let specifier = first_string_argument(node, source)?;

    Some(RawImport {
        specifier,
        kind: ImportKind::Dynamic,
        local_names: Vec::new(),
        line: node.start_position().row + 1,
    })
}

/// Extract a lazy-component binding:
/// `const Name = wrapper(() => import("…"))`
///
/// The wrapper identifier is deliberately unconstrained (`lazy`,
/// `React.lazy`, `defineAsyncComponent`, …); the shape that matters is an
/// arrow function whose body resolves to an `import()` call.
fn extract_lazy_import(node: &tree_sitter::Node, source: &[u8]) -> Option<RawImport> {
    let name_node = node.child_by_field_name("name")?;
    if name_node.kind() != "identifier" {
        return None;
    }
    let value = node.child_by_field_name("value")?;
    if value.kind() != "call_expression" {
        return None;
    }
    let function = value.child_by_field_name("function")?;
    if !matches!(function.kind(), "identifier" | "member_expression") {
        return None;
    }

    let args = value.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let arrow = args
        .named_children(&mut cursor)
        .find(|n| n.kind() == "arrow_function")?;
    let import_call = arrow_import_call(&arrow)?;
    let specifier = first_string_argument(&import_call, source)?;

    let local = node_text(&name_node, source)?.to_string();
    Some(RawImport {
        specifier,
        kind: ImportKind::Lazy,
        local_names: vec![local],
        line: node.start_position().row + 1,
    })
}

/// Find the `import()` call an arrow function resolves to, if any
///
/// Covers `() => import("x")`, `() => (import("x"))`, and
/// `() => { return import("x"); }`.
fn arrow_import_call<'a>(arrow: &tree_sitter::Node<'a>) -> Option<tree_sitter::Node<'a>> {
    let body = arrow.child_by_field_name("body")?;
    let call = match body.kind() {
        "call_expression" => Some(body),
        "parenthesized_expression" => {
            let mut cursor = body.walk();
            let found = body
                .named_children(&mut cursor)
                .find(|n| n.kind() == "call_expression");
            found
        }
        "statement_block" => {
            let mut cursor = body.walk();
            let found = body
                .named_children(&mut cursor)
                .filter(|n| n.kind() == "return_statement")
                .find_map(|ret| {
                    let mut inner = ret.walk();
                    let inner_found = ret
                        .named_children(&mut inner)
                        .find(|n| n.kind() == "call_expression");
                    inner_found
                });
            found
        }
        _ => None,
    }?;

    let function = call.child_by_field_name("function")?;
    if function.kind() == "import" {
        Some(call)
    } else {
        None
    }
}

/// First string argument of a call expression, unquoted
fn first_string_argument(call: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    let args = call.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let string_node = args
        .named_children(&mut cursor)
        .find(|n| n.kind() == "string")?;
    string_value(&string_node, source)
}

/// Unquoted text of a string node
fn string_value(node: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    let text = node_text(node, source)?;
    Some(trim_string_literal(text).to_string())
}
