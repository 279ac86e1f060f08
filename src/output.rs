//! JSON output types for CLI commands
//!
//! Provides schema-versioned response types so downstream tooling can parse
//! command output without sniffing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analyzer::RouteInfo;
use crate::graph::component_map::RouteMatch;
use crate::graph::GraphMetrics;

/// Current JSON output schema version
pub const WAYFINDER_JSON_SCHEMA_VERSION: &str = "1.0.0";

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    Pretty,
}

impl OutputFormat {
    /// Parse a `--output` argument value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "human" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            "pretty" => Some(OutputFormat::Pretty),
            _ => None,
        }
    }
}

/// Wrapper for all JSON responses
///
/// Every JSON response carries schema_version and the emitting command for
/// parsing stability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    /// Schema version for parsing stability
    pub schema_version: String,
    /// Emitting tool
    pub tool: String,
    /// Emitting command
    pub command: String,
    /// RFC 3339 timestamp of the response
    pub timestamp: String,
    /// Response data
    pub data: T,
}

impl<T> JsonResponse<T> {
    /// Create a new JSON response for a command
    pub fn new(command: &str, data: T) -> Self {
        JsonResponse {
            schema_version: WAYFINDER_JSON_SCHEMA_VERSION.to_string(),
            tool: "wayfinder".to_string(),
            command: command.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            data,
        }
    }
}

/// Print a response as compact or pretty JSON to stdout
pub fn output_json<T: Serialize>(response: &JsonResponse<T>, format: OutputFormat) {
    let rendered = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(response),
        _ => serde_json::to_string(response),
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("error: failed to serialize response: {}", e),
    }
}

/// `detect` command payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    /// Changed file -> affected route paths
    pub routes: BTreeMap<String, Vec<String>>,
}

/// `info` command payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    /// Changed file -> route info
    pub files: BTreeMap<String, RouteInfo>,
}

/// `status` command payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub total_files: usize,
    pub route_files: usize,
    pub entry_points: usize,
    pub import_edges: usize,
    /// Skip counts per reason
    pub skipped: BTreeMap<String, usize>,
}

impl StatusResponse {
    /// Build from graph metrics and a skip summary
    pub fn new(metrics: &GraphMetrics, skipped: BTreeMap<String, usize>) -> Self {
        Self {
            total_files: metrics.total_files,
            route_files: metrics.route_files,
            entry_points: metrics.entry_points,
            import_edges: metrics.import_edges,
            skipped,
        }
    }
}

/// `build` command payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildResponse {
    pub files_indexed: usize,
    pub route_files: usize,
    pub import_edges: usize,
    pub persisted: bool,
}

/// `component` command payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentResponse {
    pub component_file: String,
    pub matches: Vec<RouteMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("human"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("pretty"), Some(OutputFormat::Pretty));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn test_json_response_envelope() {
        let response = JsonResponse::new(
            "detect",
            DetectResponse {
                routes: BTreeMap::new(),
            },
        );
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"schema_version\":\"1.0.0\""));
        assert!(json.contains("\"tool\":\"wayfinder\""));
        assert!(json.contains("\"command\":\"detect\""));
    }
}
