//! `wayfinder status` - graph statistics and skip counts.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use wayfinder::output::StatusResponse;
use wayfinder::{
    output_json, AnalyzerConfig, JsonResponse, LocalDirStore, OutputFormat, RouteAnalyzer,
};

pub fn run(
    root: PathBuf,
    store: Option<PathBuf>,
    rebuild: bool,
    output: OutputFormat,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let mut analyzer = RouteAnalyzer::new(&root, AnalyzerConfig::default())?;
    if let Some(dir) = store {
        analyzer = analyzer.with_store(Arc::new(LocalDirStore::new(dir)));
    }
    runtime.block_on(analyzer.initialize(rebuild))?;

    let metrics = analyzer.metrics();
    let skipped = analyzer.diagnostics().summary();

    match output {
        OutputFormat::Human => {
            println!("files:        {}", metrics.total_files);
            println!("route files:  {}", metrics.route_files);
            println!("entry points: {}", metrics.entry_points);
            println!("import edges: {}", metrics.import_edges);
            if !skipped.is_empty() {
                println!("skipped:");
                for (reason, count) in &skipped {
                    println!("  {}: {}", reason, count);
                }
            }
        }
        _ => {
            let response =
                JsonResponse::new("status", StatusResponse::new(&metrics, skipped));
            output_json(&response, output);
        }
    }
    Ok(())
}
