//! Route declaration recognition.
//!
//! Several competing route-declaration conventions normalize into one
//! [`RouteDecl`] shape. Each convention is an independent [`RouteRecognizer`]
//! strategy; the extractor runs the whole registry and unions the results.
//! Matches are additive and deliberately not de-duplicated by path —
//! downstream consumers decide whether duplicates matter.
//!
//! Syntax-based recognizers (JSX elements, object literals) live here;
//! path-convention recognizers live in [`conventions`].
//!
//! [`conventions`]: crate::ingest::conventions

use crate::common::{node_text, trim_string_literal};
use serde::{Deserialize, Serialize};

/// Sentinel route path for index routes (`index: true` with no `path` key)
pub const INDEX_ROUTE: &str = "(index)";

/// Component name recorded when no component reference could be extracted
pub const UNKNOWN_COMPONENT: &str = "unknown";

/// Sentinel line for path-convention routes, which have no declaration line
pub const CONVENTION_LINE: usize = 0;

/// One route declaration, normalized across all recognized conventions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteDecl {
    /// Route path string, `(index)` for index routes, or empty when a
    /// qualifying declaration carries no statically visible path
    pub path: String,
    /// Best-effort locally bound component identifier, or `unknown`
    pub component: String,
    /// Project-relative path of the declaring file
    pub declaring_file: String,
    /// Declaration line (1-indexed), or 0 for path-convention routes
    pub line: usize,
}

/// Input handed to every recognizer for one file
pub struct RecognizerInput<'a> {
    /// Project-relative file path
    pub path: &'a str,
    /// Parsed tree, if the file's grammar produced one
    pub tree: Option<&'a tree_sitter::Tree>,
    /// Raw file content
    pub source: &'a [u8],
}

/// One route-declaration convention
///
/// Recognizers are independent; adding a new framework convention means
/// adding a recognizer, not changing existing ones.
pub trait RouteRecognizer: Send + Sync {
    /// Short name for diagnostics
    fn name(&self) -> &'static str;

    /// Routes this convention finds in the file, possibly none
    fn recognize(&self, input: &RecognizerInput) -> Vec<RouteDecl>;
}

/// The built-in recognizer registry, in evaluation order
pub fn default_recognizers() -> Vec<Box<dyn RouteRecognizer>> {
    vec![
        Box::new(JsxRouteRecognizer),
        Box::new(ObjectRouteRecognizer),
        Box::new(crate::ingest::conventions::PagesDirRecognizer),
        Box::new(crate::ingest::conventions::AppDirRecognizer),
        Box::new(crate::ingest::conventions::RoutesDirRecognizer),
    ]
}

/// Run the full registry over one file and union the results
pub fn recognize_routes(
    recognizers: &[Box<dyn RouteRecognizer>],
    input: &RecognizerInput,
) -> Vec<RouteDecl> {
    let mut routes = Vec::new();
    for recognizer in recognizers {
        routes.extend(recognizer.recognize(input));
    }
    routes
}

// ---------------------------------------------------------------------------
// JSX route elements
// ---------------------------------------------------------------------------

/// Recognizes markup route elements: `<Route path="/x" element={<X />} />`
///
/// An element qualifies when it carries a `path` attribute with a string
/// value, or an `index` attribute. The rendered component comes from the
/// `element` or `component` attribute, or from a capitalized child element.
pub struct JsxRouteRecognizer;

impl RouteRecognizer for JsxRouteRecognizer {
    fn name(&self) -> &'static str {
        "jsx-element"
    }

    fn recognize(&self, input: &RecognizerInput) -> Vec<RouteDecl> {
        let mut routes = Vec::new();
        if let Some(tree) = input.tree {
            walk_jsx(&tree.root_node(), input, &mut routes);
        }
        routes
    }
}

fn walk_jsx(node: &tree_sitter::Node, input: &RecognizerInput, routes: &mut Vec<RouteDecl>) {
    match node.kind() {
        "jsx_element" => {
            if let Some(opening) = first_child_of_kind(node, "jsx_opening_element") {
                if let Some(route) = jsx_route(node, &opening, input) {
                    routes.push(route);
                }
            }
        }
        "jsx_self_closing_element" => {
            if let Some(route) = jsx_route(node, node, input) {
                routes.push(route);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_jsx(&child, input, routes);
    }
}

/// Build a RouteDecl from a JSX element if it qualifies as a route
///
/// `element_node` is the whole element; `attr_node` carries the attributes
/// (the opening element for paired tags, the element itself when
/// self-closing).
fn jsx_route(
    element_node: &tree_sitter::Node,
    attr_node: &tree_sitter::Node,
    input: &RecognizerInput,
) -> Option<RouteDecl> {
    let mut path: Option<String> = None;
    let mut has_index = false;
    let mut component: Option<String> = None;

    let mut cursor = attr_node.walk();
    for attr in attr_node.children(&mut cursor) {
        if attr.kind() != "jsx_attribute" {
            continue;
        }
        let name = attr
            .child(0)
            .and_then(|n| node_text(&n, input.source))
            .unwrap_or_default()
            .to_string();
        let value = attr.child(2);

        match name.as_str() {
            "path" => {
                if let Some(v) = value {
                    if v.kind() == "string" {
                        path = node_text(&v, input.source)
                            .map(|t| trim_string_literal(t).to_string());
                    }
                }
            }
            "index" => has_index = true,
            "element" => {
                if component.is_none() {
                    component = value.as_ref().and_then(|v| jsx_expression_component(v, input));
                }
            }
            "component" => {
                if component.is_none() {
                    component = value.as_ref().and_then(|v| jsx_expression_component(v, input));
                }
            }
            _ => {}
        }
    }

    let route_path = match (path, has_index) {
        (Some(p), _) => p,
        (None, true) => INDEX_ROUTE.to_string(),
        (None, false) => return None,
    };

    // Paired tags may render the component as a child: <Route path="/x"><X /></Route>
    if component.is_none() && element_node.kind() == "jsx_element" {
        component = capitalized_child_component(element_node, input);
    }

    Some(RouteDecl {
        path: route_path,
        component: component.unwrap_or_else(|| UNKNOWN_COMPONENT.to_string()),
        declaring_file: input.path.to_string(),
        line: element_node.start_position().row + 1,
    })
}

/// Component identifier inside a `{…}` attribute value
///
/// Handles `element={<About />}` (the element's tag name) and
/// `component={About}` (a bare identifier or member expression).
fn jsx_expression_component(value: &tree_sitter::Node, input: &RecognizerInput) -> Option<String> {
    if value.kind() != "jsx_expression" {
        return None;
    }
    let mut cursor = value.walk();
    for inner in value.named_children(&mut cursor) {
        match inner.kind() {
            "jsx_self_closing_element" | "jsx_element" => {
                return jsx_tag_name(&inner, input.source);
            }
            "identifier" | "member_expression" => {
                return node_text(&inner, input.source).map(|t| t.to_string());
            }
            _ => {}
        }
    }
    None
}

/// Tag name of a JSX element
fn jsx_tag_name(element: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    let target = if element.kind() == "jsx_element" {
        first_child_of_kind(element, "jsx_opening_element")?
    } else {
        *element
    };
    target
        .child_by_field_name("name")
        .and_then(|n| node_text(&n, source))
        .map(|t| t.to_string())
}

/// First capitalized child element's tag name, for child-rendered routes
fn capitalized_child_component(
    element: &tree_sitter::Node,
    input: &RecognizerInput,
) -> Option<String> {
    let mut cursor = element.walk();
    for child in element.named_children(&mut cursor) {
        if matches!(child.kind(), "jsx_element" | "jsx_self_closing_element") {
            if let Some(name) = jsx_tag_name(&child, input.source) {
                if name.chars().next().is_some_and(|c| c.is_uppercase()) {
                    return Some(name);
                }
            }
        }
    }
    None
}

fn first_child_of_kind<'a>(
    node: &tree_sitter::Node<'a>,
    kind: &str,
) -> Option<tree_sitter::Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|n| n.kind() == kind);
    found
}

// ---------------------------------------------------------------------------
// Object-literal route declarations
// ---------------------------------------------------------------------------

/// Recognizes route-config object literals:
/// `{ path: "/about", element: <About /> }`
///
/// Presence of any one of the `path`, `index`, `element`, `component` keys
/// qualifies the object. `index: true` without a `path` key yields the
/// `(index)` sentinel; a qualifying object with neither carries an empty
/// path and still marks the file as route-declaring.
pub struct ObjectRouteRecognizer;

impl RouteRecognizer for ObjectRouteRecognizer {
    fn name(&self) -> &'static str {
        "object-literal"
    }

    fn recognize(&self, input: &RecognizerInput) -> Vec<RouteDecl> {
        let mut routes = Vec::new();
        if let Some(tree) = input.tree {
            walk_objects(&tree.root_node(), input, &mut routes);
        }
        routes
    }
}

fn walk_objects(node: &tree_sitter::Node, input: &RecognizerInput, routes: &mut Vec<RouteDecl>) {
    if node.kind() == "object" {
        if let Some(route) = object_route(node, input) {
            routes.push(route);
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_objects(&child, input, routes);
    }
}

fn object_route(object: &tree_sitter::Node, input: &RecognizerInput) -> Option<RouteDecl> {
    let mut qualifies = false;
    let mut path: Option<String> = None;
    let mut index_true = false;
    let mut component: Option<String> = None;

    let mut cursor = object.walk();
    for entry in object.named_children(&mut cursor) {
        match entry.kind() {
            "pair" => {
                let key = match entry
                    .child_by_field_name("key")
                    .and_then(|k| node_text(&k, input.source))
                    .map(|t| trim_string_literal(t).to_string())
                {
                    Some(k) => k,
                    None => continue,
                };
                let value = entry.child_by_field_name("value");

                match key.as_str() {
                    "path" => {
                        qualifies = true;
                        if let Some(v) = &value {
                            if v.kind() == "string" {
                                path = node_text(v, input.source)
                                    .map(|t| trim_string_literal(t).to_string());
                            }
                        }
                    }
                    "index" => {
                        qualifies = true;
                        if let Some(v) = &value {
                            if node_text(v, input.source) == Some("true") {
                                index_true = true;
                            }
                        }
                    }
                    "element" | "component" => {
                        qualifies = true;
                        if component.is_none() {
                            component =
                                value.as_ref().and_then(|v| value_component(v, input.source));
                        }
                    }
                    _ => {}
                }
            }
            "shorthand_property_identifier" => {
                if let Some(key) = node_text(&entry, input.source) {
                    if matches!(key, "path" | "index" | "element" | "component") {
                        qualifies = true;
                    }
                }
            }
            _ => {}
        }
    }

    if !qualifies {
        return None;
    }

    let route_path = match (path, index_true) {
        (Some(p), _) => p,
        (None, true) => INDEX_ROUTE.to_string(),
        // Qualifying object with no statically visible path (e.g. a layout
        // route); keeps the file route-declaring without fabricating a path
        (None, false) => String::new(),
    };

    Some(RouteDecl {
        path: route_path,
        component: component.unwrap_or_else(|| UNKNOWN_COMPONENT.to_string()),
        declaring_file: input.path.to_string(),
        line: object.start_position().row + 1,
    })
}

/// Component identifier from an object value
fn value_component(value: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    match value.kind() {
        "identifier" | "member_expression" => node_text(value, source).map(|t| t.to_string()),
        "jsx_element" | "jsx_self_closing_element" => jsx_tag_name(value, source),
        _ => None,
    }
}
