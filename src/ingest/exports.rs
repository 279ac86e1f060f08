//! Exported-symbol extraction.
//!
//! Collects default-export markers and the names of exported declarations.
//! Export *types* are not tracked; the symbol list exists for diagnostics
//! and for entry-point heuristics, not for semantic analysis.

use crate::common::node_text;

/// Marker recorded for `export default …`
pub const DEFAULT_EXPORT: &str = "default";

/// Extract exported symbol names from a parsed tree.
///
/// Recognizes, per `export_statement`:
/// - `export default …` (recorded as the `default` marker)
/// - `export function f`, `export class C`
/// - `export const a = …, b = …` (each declarator name)
/// - `export { a, b as c }` (the exported name, alias when present)
pub fn extract_exports(tree: &tree_sitter::Tree, source: &[u8]) -> Vec<String> {
    let mut exports = Vec::new();
    walk(&tree.root_node(), source, &mut exports);
    exports
}

fn walk(node: &tree_sitter::Node, source: &[u8], exports: &mut Vec<String>) {
    if node.kind() == "export_statement" {
        collect_export(node, source, exports);
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(&child, source, exports);
    }
}

fn collect_export(node: &tree_sitter::Node, source: &[u8], exports: &mut Vec<String>) {
    // Re-exports (`export … from "…"`) are recorded as imports, not exports
    if node.child_by_field_name("source").is_some() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "default" => exports.push(DEFAULT_EXPORT.to_string()),
            "function_declaration" | "class_declaration" | "generator_function_declaration" => {
                if let Some(name) = child
                    .child_by_field_name("name")
                    .and_then(|n| node_text(&n, source))
                {
                    exports.push(name.to_string());
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                let mut inner = child.walk();
                for declarator in child.named_children(&mut inner) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    if let Some(name) = declarator
                        .child_by_field_name("name")
                        .filter(|n| n.kind() == "identifier")
                        .and_then(|n| node_text(&n, source))
                    {
                        exports.push(name.to_string());
                    }
                }
            }
            "export_clause" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() != "export_specifier" {
                        continue;
                    }
                    let exported = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(name) = exported.and_then(|n| node_text(&n, source)) {
                        exports.push(name.to_string());
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::detect::Grammar;
    use crate::ingest::pool::parse_with_fallback;

    fn exports_of(source: &str) -> Vec<String> {
        let tree = parse_with_fallback(Grammar::Tsx, source.as_bytes()).unwrap();
        extract_exports(&tree, source.as_bytes())
    }

    #[test]
    fn test_export_default() {
        assert_eq!(exports_of("export default function App() {}\n"), vec![
            "default", "App"
        ]);
    }

    #[test]
    fn test_export_named_function() {
        assert_eq!(exports_of("export function helper() {}\n"), vec!["helper"]);
    }

    #[test]
    fn test_export_class() {
        assert_eq!(exports_of("export class Store {}\n"), vec!["Store"]);
    }

    #[test]
    fn test_export_const_multiple() {
        assert_eq!(
            exports_of("export const a = 1, b = 2;\n"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_export_clause_with_alias() {
        assert_eq!(
            exports_of("const x = 1;\nexport { x as renamed };\n"),
            vec!["renamed"]
        );
    }

    #[test]
    fn test_reexport_not_recorded_as_export() {
        assert!(exports_of("export { Button } from './Button';\n").is_empty());
    }

    #[test]
    fn test_non_exported_declarations_ignored() {
        assert!(exports_of("const hidden = 1;\nfunction local() {}\n").is_empty());
    }
}
