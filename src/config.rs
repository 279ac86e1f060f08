//! Analyzer configuration
//!
//! All tunables live here and are owned by the [`RouteAnalyzer`] that the
//! caller constructs; there is no ambient global configuration state.
//!
//! [`RouteAnalyzer`]: crate::analyzer::RouteAnalyzer

use serde::{Deserialize, Serialize};

/// Configuration for route-impact analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Alias prefixes rewritten during import resolution, in match order.
    /// Each entry is (prefix, replacement), e.g. ("@/", "src/").
    pub aliases: Vec<(String, String)>,
    /// Source extensions tried during import resolution, in candidate order
    pub extensions: Vec<String>,
    /// Files larger than this are skipped entirely (bytes)
    pub max_file_size: usize,
    /// Number of files read concurrently during a full build
    pub batch_size: usize,
    /// BFS depth beyond which traversal stops once at least one route was found
    pub impact_depth_limit: usize,
    /// Disable early termination and walk the full importer closure
    pub exhaustive_impact: bool,
    /// Respect .gitignore rules during directory scans
    pub use_gitignore: bool,
    /// Glob patterns excluded from scans regardless of gitignore
    pub exclude: Vec<String>,
    /// Namespace component of the persisted snapshot key
    pub store_namespace: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            aliases: vec![("@/".to_string(), "src/".to_string())],
            extensions: vec![
                "tsx".to_string(),
                "ts".to_string(),
                "jsx".to_string(),
                "js".to_string(),
            ],
            max_file_size: 1_048_576,
            batch_size: 32,
            impact_depth_limit: 4,
            exhaustive_impact: false,
            use_gitignore: true,
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/dist/**".to_string(),
                "**/build/**".to_string(),
                "**/.next/**".to_string(),
                "**/coverage/**".to_string(),
            ],
            store_namespace: "wayfinder".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_candidate_order() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.extensions, vec!["tsx", "ts", "jsx", "js"]);
    }

    #[test]
    fn test_default_alias() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.aliases[0].0, "@/");
        assert_eq!(config.aliases[0].1, "src/");
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = AnalyzerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalyzerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.batch_size, config.batch_size);
        assert_eq!(back.exclude, config.exclude);
    }
}
