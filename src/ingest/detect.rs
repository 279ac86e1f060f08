//! Grammar selection by file extension.
//!
//! Maps source-file extensions to the tree-sitter grammar that parses them.
//! `.vue` and `.svelte` files carry no grammar here; they still participate
//! in path-convention route recognition.

use std::path::Path;

/// Grammar used to parse a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// tree-sitter-javascript; understands JSX markup
    Javascript,
    /// tree-sitter-typescript, plain TS dialect (no markup)
    Typescript,
    /// tree-sitter-typescript, TSX dialect (markup-aware)
    Tsx,
}

impl Grammar {
    /// The markup-aware grammar used as a retry fallback when the
    /// extension-selected grammar fails to produce a tree.
    pub fn markup_fallback() -> Grammar {
        Grammar::Tsx
    }

    /// Whether this grammar understands embedded JSX markup
    pub fn markup_aware(&self) -> bool {
        matches!(self, Grammar::Javascript | Grammar::Tsx)
    }
}

/// How a file participates in fact extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Parsed with the given grammar; all extraction passes run
    Parsed(Grammar),
    /// No grammar, but path-convention route recognition still applies
    ConventionOnly,
}

/// Select the grammar (or convention-only handling) for a file path
///
/// # Returns
/// - `Some(FileKind::Parsed(_))` for `.js`/`.jsx`/`.ts`/`.tsx`
/// - `Some(FileKind::ConventionOnly)` for `.vue`/`.svelte`
/// - `None` for everything else (the file is out of analysis scope)
pub fn detect_file_kind(path: &Path) -> Option<FileKind> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    match ext {
        // .jsx shares the JavaScript grammar, which parses JSX natively
        "js" | "jsx" | "mjs" | "cjs" => Some(FileKind::Parsed(Grammar::Javascript)),
        "ts" | "mts" | "cts" => Some(FileKind::Parsed(Grammar::Typescript)),
        "tsx" => Some(FileKind::Parsed(Grammar::Tsx)),
        "vue" | "svelte" => Some(FileKind::ConventionOnly),
        _ => None,
    }
}

/// Convenience wrapper: the grammar for a path, if it has one
pub fn grammar_for(path: &Path) -> Option<Grammar> {
    match detect_file_kind(path)? {
        FileKind::Parsed(grammar) => Some(grammar),
        FileKind::ConventionOnly => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_parsed_extensions() {
        assert_eq!(
            detect_file_kind(&PathBuf::from("src/App.tsx")),
            Some(FileKind::Parsed(Grammar::Tsx))
        );
        assert_eq!(
            detect_file_kind(&PathBuf::from("src/util.ts")),
            Some(FileKind::Parsed(Grammar::Typescript))
        );
        assert_eq!(
            detect_file_kind(&PathBuf::from("src/legacy.jsx")),
            Some(FileKind::Parsed(Grammar::Javascript))
        );
        assert_eq!(
            detect_file_kind(&PathBuf::from("src/index.js")),
            Some(FileKind::Parsed(Grammar::Javascript))
        );
    }

    #[test]
    fn test_detect_convention_only() {
        assert_eq!(
            detect_file_kind(&PathBuf::from("pages/about.vue")),
            Some(FileKind::ConventionOnly)
        );
        assert_eq!(
            detect_file_kind(&PathBuf::from("src/routes/+page.svelte")),
            Some(FileKind::ConventionOnly)
        );
    }

    #[test]
    fn test_detect_unsupported() {
        assert_eq!(detect_file_kind(&PathBuf::from("style.css")), None);
        assert_eq!(detect_file_kind(&PathBuf::from("README.md")), None);
        assert_eq!(detect_file_kind(&PathBuf::from("no_extension")), None);
    }

    #[test]
    fn test_markup_fallback_is_markup_aware() {
        assert!(Grammar::markup_fallback().markup_aware());
        assert!(!Grammar::Typescript.markup_aware());
    }
}
