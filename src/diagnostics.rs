//! Structured diagnostics for scan and refresh operations.
//!
//! Every file the analyzer declines to extract facts from is recorded with a
//! deterministic, sortable skip reason. Skips are low-severity by design: a
//! skipped file yields an empty fact set, never an aborted batch.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Reason why a file was skipped during fact extraction.
///
/// Each variant represents a deterministic decision point in the filtering
/// pipeline. The order of variants matters for precedence when reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// File is not a regular file (directory, symlink, etc.)
    NotAFile,
    /// Extension not handled by any grammar or route convention
    UnsupportedExtension,
    /// Content contains a null byte
    Binary,
    /// Content exceeds the configured size threshold
    Oversized,
    /// File could not be read from disk
    Unreadable,
    /// Excluded by a configured glob pattern
    ExcludedByGlob,
    /// Matched by gitignore-style rules (.gitignore, .ignore)
    IgnoredByGitignore,
}

impl SkipReason {
    /// Stable sort key for deterministic ordering.
    ///
    /// Lower values = higher priority in reporting.
    pub fn sort_key(&self) -> u8 {
        match self {
            SkipReason::IgnoredByGitignore => 0,
            SkipReason::ExcludedByGlob => 1,
            SkipReason::UnsupportedExtension => 2,
            SkipReason::Binary => 3,
            SkipReason::Oversized => 4,
            SkipReason::Unreadable => 5,
            SkipReason::NotAFile => 6,
        }
    }

    /// Human-readable description for stderr output.
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::NotAFile => "not a regular file",
            SkipReason::UnsupportedExtension => "extension not supported",
            SkipReason::Binary => "binary content",
            SkipReason::Oversized => "exceeds size threshold",
            SkipReason::Unreadable => "could not be read",
            SkipReason::ExcludedByGlob => "excluded by pattern",
            SkipReason::IgnoredByGitignore => "matched by gitignore",
        }
    }

    /// Stable key used for JSON summaries.
    pub fn normalized_key(&self) -> &'static str {
        match self {
            SkipReason::NotAFile => "not_a_file",
            SkipReason::UnsupportedExtension => "unsupported_extension",
            SkipReason::Binary => "binary",
            SkipReason::Oversized => "oversized",
            SkipReason::Unreadable => "unreadable",
            SkipReason::ExcludedByGlob => "excluded_by_glob",
            SkipReason::IgnoredByGitignore => "ignored_by_gitignore",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl PartialOrd for SkipReason {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SkipReason {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// One skipped file with its reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDiagnostic {
    /// Project-relative path of the skipped file
    pub path: String,
    /// Why the file was skipped
    pub reason: SkipReason,
}

/// Accumulated diagnostics for one analyzer instance.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    skipped: Vec<FileDiagnostic>,
}

impl Diagnostics {
    /// Create an empty diagnostics accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped file
    pub fn record(&mut self, path: impl Into<String>, reason: SkipReason) {
        self.skipped.push(FileDiagnostic {
            path: path.into(),
            reason,
        });
    }

    /// Number of recorded skips
    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    /// True if nothing was skipped
    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Skips in deterministic order (reason precedence, then path)
    pub fn sorted(&self) -> Vec<FileDiagnostic> {
        let mut out = self.skipped.clone();
        out.sort_by(|a, b| a.reason.cmp(&b.reason).then_with(|| a.path.cmp(&b.path)));
        out
    }

    /// Count of skips per normalized reason key
    pub fn summary(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for diag in &self.skipped {
            *counts
                .entry(diag.reason.normalized_key().to_string())
                .or_insert(0) += 1;
        }
        counts
    }

    /// Drop all recorded diagnostics
    pub fn clear(&mut self) {
        self.skipped.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_is_deterministic() {
        let mut diags = Diagnostics::new();
        diags.record("b.png", SkipReason::Binary);
        diags.record("a.png", SkipReason::Binary);
        diags.record("z.tsx", SkipReason::Oversized);

        let sorted = diags.sorted();
        assert_eq!(sorted[0].path, "a.png");
        assert_eq!(sorted[1].path, "b.png");
        assert_eq!(sorted[2].path, "z.tsx");
    }

    #[test]
    fn test_summary_counts() {
        let mut diags = Diagnostics::new();
        diags.record("a.bin", SkipReason::Binary);
        diags.record("b.bin", SkipReason::Binary);
        diags.record("c.tsx", SkipReason::Unreadable);

        let summary = diags.summary();
        assert_eq!(summary.get("binary"), Some(&2));
        assert_eq!(summary.get("unreadable"), Some(&1));
    }

    #[test]
    fn test_reason_ordering() {
        assert!(SkipReason::IgnoredByGitignore < SkipReason::Binary);
        assert!(SkipReason::Binary < SkipReason::Unreadable);
    }
}
