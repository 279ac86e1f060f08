//! File-system routing conventions.
//!
//! These recognizers derive routes purely from a file's own path: a `pages/`
//! directory tree (Next.js pages router, Nuxt), an `app/` directory with
//! `page.*` files (Next.js app router), and a `routes/` directory with
//! `+page.*` files (SvelteKit). No parse tree is required; convention
//! matching runs even when parsing failed.
//!
//! Dynamic segments rewrite to path-pattern form:
//! `[id]` → `:id`, `[...rest]` → `*`, `[[...rest]]` → `*`.

use crate::ingest::routes::{RecognizerInput, RouteDecl, RouteRecognizer, CONVENTION_LINE};

/// Component label for Next.js-style convention routes
const NEXT_PAGE: &str = "Next.js Page";

/// Component label for SvelteKit-style convention routes
const SVELTE_PAGE: &str = "SvelteKit Page";

/// Extensions that participate in convention routing
const PAGE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "vue", "svelte"];

/// Rewrite one path segment's dynamic-parameter syntax
fn rewrite_segment(segment: &str) -> String {
    if segment.starts_with("[[...") && segment.ends_with("]]") {
        // Optional catch-all
        return "*".to_string();
    }
    if segment.starts_with("[...") && segment.ends_with(']') {
        return "*".to_string();
    }
    if segment.starts_with('[') && segment.ends_with(']') {
        return format!(":{}", &segment[1..segment.len() - 1]);
    }
    segment.to_string()
}

/// Split off the extension if it is a page extension
fn strip_page_extension(file_name: &str) -> Option<&str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if PAGE_EXTENSIONS.contains(&ext) {
        Some(stem)
    } else {
        None
    }
}

/// Segments after the first occurrence of a `<dir>/` component, if present
fn segments_after_dir<'a>(path: &'a str, dir: &str) -> Option<Vec<&'a str>> {
    let needle = format!("{}/", dir);
    let start = if let Some(stripped) = path.strip_prefix(&needle) {
        return Some(stripped.split('/').collect());
    } else {
        path.find(&format!("/{}", needle))? + needle.len() + 1
    };
    Some(path[start..].split('/').collect())
}

/// Join rewritten segments into a route path
fn to_route_path(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

// ---------------------------------------------------------------------------
// pages/ directory tree
// ---------------------------------------------------------------------------

/// Next.js pages-router convention: every source file under a `pages/`
/// directory is a route. A trailing `index` segment is stripped; files whose
/// name starts with `_` (`_app`, `_document`) and the `api/` subtree are not
/// user-visible routes.
pub struct PagesDirRecognizer;

impl RouteRecognizer for PagesDirRecognizer {
    fn name(&self) -> &'static str {
        "pages-dir"
    }

    fn recognize(&self, input: &RecognizerInput) -> Vec<RouteDecl> {
        let Some(raw_segments) = segments_after_dir(input.path, "pages") else {
            return Vec::new();
        };
        let Some((file_name, dirs)) = raw_segments.split_last() else {
            return Vec::new();
        };
        let Some(stem) = strip_page_extension(file_name) else {
            return Vec::new();
        };
        if stem.starts_with('_') || dirs.first() == Some(&"api") {
            return Vec::new();
        }

        let mut segments: Vec<String> = dirs.iter().map(|s| rewrite_segment(s)).collect();
        if stem != "index" {
            segments.push(rewrite_segment(stem));
        }

        vec![RouteDecl {
            path: to_route_path(&segments),
            component: NEXT_PAGE.to_string(),
            declaring_file: input.path.to_string(),
            line: CONVENTION_LINE,
        }]
    }
}

// ---------------------------------------------------------------------------
// app/ directory tree
// ---------------------------------------------------------------------------

/// Next.js app-router convention: `page.*` files under an `app/` directory
/// declare routes; route groups (`(marketing)`) vanish from the URL.
pub struct AppDirRecognizer;

impl RouteRecognizer for AppDirRecognizer {
    fn name(&self) -> &'static str {
        "app-dir"
    }

    fn recognize(&self, input: &RecognizerInput) -> Vec<RouteDecl> {
        let Some(raw_segments) = segments_after_dir(input.path, "app") else {
            return Vec::new();
        };
        let Some((file_name, dirs)) = raw_segments.split_last() else {
            return Vec::new();
        };
        if strip_page_extension(file_name) != Some("page") {
            return Vec::new();
        }

        let segments: Vec<String> = dirs
            .iter()
            .filter(|s| !(s.starts_with('(') && s.ends_with(')')))
            .map(|s| rewrite_segment(s))
            .collect();

        vec![RouteDecl {
            path: to_route_path(&segments),
            component: NEXT_PAGE.to_string(),
            declaring_file: input.path.to_string(),
            line: CONVENTION_LINE,
        }]
    }
}

// ---------------------------------------------------------------------------
// routes/ directory tree
// ---------------------------------------------------------------------------

/// SvelteKit convention: `+page.*` files under a `routes/` directory
/// declare routes.
pub struct RoutesDirRecognizer;

impl RouteRecognizer for RoutesDirRecognizer {
    fn name(&self) -> &'static str {
        "routes-dir"
    }

    fn recognize(&self, input: &RecognizerInput) -> Vec<RouteDecl> {
        let Some(raw_segments) = segments_after_dir(input.path, "routes") else {
            return Vec::new();
        };
        let Some((file_name, dirs)) = raw_segments.split_last() else {
            return Vec::new();
        };
        if strip_page_extension(file_name) != Some("+page") {
            return Vec::new();
        }

        let segments: Vec<String> = dirs.iter().map(|s| rewrite_segment(s)).collect();

        vec![RouteDecl {
            path: to_route_path(&segments),
            component: SVELTE_PAGE.to_string(),
            declaring_file: input.path.to_string(),
            line: CONVENTION_LINE,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize(recognizer: &dyn RouteRecognizer, path: &str) -> Vec<RouteDecl> {
        let input = RecognizerInput {
            path,
            tree: None,
            source: b"",
        };
        recognizer.recognize(&input)
    }

    #[test]
    fn test_pages_plain_file() {
        let routes = recognize(&PagesDirRecognizer, "pages/about.tsx");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/about");
        assert_eq!(routes[0].component, "Next.js Page");
        assert_eq!(routes[0].line, CONVENTION_LINE);
    }

    #[test]
    fn test_pages_index_stripped() {
        let routes = recognize(&PagesDirRecognizer, "pages/products/index.tsx");
        assert_eq!(routes[0].path, "/products");
    }

    #[test]
    fn test_pages_root_index() {
        let routes = recognize(&PagesDirRecognizer, "pages/index.tsx");
        assert_eq!(routes[0].path, "/");
    }

    #[test]
    fn test_pages_dynamic_segment() {
        let routes = recognize(&PagesDirRecognizer, "src/pages/users/[id].tsx");
        assert_eq!(routes[0].path, "/users/:id");
    }

    #[test]
    fn test_pages_catch_all() {
        let routes = recognize(&PagesDirRecognizer, "pages/docs/[...slug].tsx");
        assert_eq!(routes[0].path, "/docs/*");
    }

    #[test]
    fn test_pages_underscore_files_skipped() {
        assert!(recognize(&PagesDirRecognizer, "pages/_app.tsx").is_empty());
        assert!(recognize(&PagesDirRecognizer, "pages/_document.tsx").is_empty());
    }

    #[test]
    fn test_pages_api_subtree_skipped() {
        assert!(recognize(&PagesDirRecognizer, "pages/api/users.ts").is_empty());
    }

    #[test]
    fn test_pages_vue_file() {
        let routes = recognize(&PagesDirRecognizer, "pages/contact.vue");
        assert_eq!(routes[0].path, "/contact");
    }

    #[test]
    fn test_app_page_file() {
        let routes = recognize(&AppDirRecognizer, "app/users/[id]/page.tsx");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/users/:id");
        assert_eq!(routes[0].component, "Next.js Page");
    }

    #[test]
    fn test_app_root_page() {
        let routes = recognize(&AppDirRecognizer, "app/page.tsx");
        assert_eq!(routes[0].path, "/");
    }

    #[test]
    fn test_app_non_page_files_skipped() {
        assert!(recognize(&AppDirRecognizer, "app/users/layout.tsx").is_empty());
        assert!(recognize(&AppDirRecognizer, "app/users/loading.tsx").is_empty());
    }

    #[test]
    fn test_app_route_group_dropped() {
        let routes = recognize(&AppDirRecognizer, "app/(marketing)/pricing/page.tsx");
        assert_eq!(routes[0].path, "/pricing");
    }

    #[test]
    fn test_app_optional_catch_all() {
        let routes = recognize(&AppDirRecognizer, "app/docs/[[...slug]]/page.tsx");
        assert_eq!(routes[0].path, "/docs/*");
    }

    #[test]
    fn test_routes_svelte_page() {
        let routes = recognize(&RoutesDirRecognizer, "src/routes/about/+page.svelte");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/about");
        assert_eq!(routes[0].component, "SvelteKit Page");
    }

    #[test]
    fn test_routes_dynamic_segment() {
        let routes = recognize(&RoutesDirRecognizer, "src/routes/blog/[slug]/+page.svelte");
        assert_eq!(routes[0].path, "/blog/:slug");
    }

    #[test]
    fn test_routes_non_page_skipped() {
        assert!(recognize(&RoutesDirRecognizer, "src/routes/about/+layout.svelte").is_empty());
    }

    #[test]
    fn test_file_outside_convention_dirs() {
        assert!(recognize(&PagesDirRecognizer, "src/components/Button.tsx").is_empty());
        assert!(recognize(&AppDirRecognizer, "src/components/Button.tsx").is_empty());
    }

    #[test]
    fn test_pages_under_app_dir() {
        // The pages convention matches even when a pages/ tree sits inside
        // an app/ directory; the app convention wants a page.* file name
        let pages = recognize(&PagesDirRecognizer, "app/pages/index.tsx");
        assert_eq!(pages[0].path, "/");
        assert!(recognize(&AppDirRecognizer, "app/pages/index.tsx").is_empty());
    }
}
