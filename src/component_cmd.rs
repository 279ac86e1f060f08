//! `wayfinder component` - routes served by a specific component file.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use wayfinder::output::ComponentResponse;
use wayfinder::{
    output_json, AnalyzerConfig, JsonResponse, LocalDirStore, OutputFormat, RouteAnalyzer,
};

pub fn run(
    root: PathBuf,
    file: String,
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

    let matches = analyzer.find_routes_serving_component(&file);

    match output {
        OutputFormat::Human => {
            if matches.is_empty() {
                println!("{}: not served by any recognized route", file);
            }
            for m in &matches {
                println!(
                    "{} -> {} (as {} in {}:{})",
                    file, m.route_path, m.component, m.route_file, m.line
                );
            }
        }
        _ => {
            let response = JsonResponse::new(
                "component",
                ComponentResponse {
                    component_file: file,
                    matches,
                },
            );
            output_json(&response, output);
        }
    }
    Ok(())
}
