//! `wayfinder detect` - routes affected by a set of changed files.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use wayfinder::output::DetectResponse;
use wayfinder::{
    output_json, AnalyzerConfig, JsonResponse, LocalDirStore, OutputFormat, RouteAnalyzer,
};

#[allow(clippy::too_many_arguments)]
pub fn run(
    root: PathBuf,
    files: Vec<String>,
    store: Option<PathBuf>,
    rebuild: bool,
    exhaustive: bool,
    depth: Option<usize>,
    output: OutputFormat,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let mut config = AnalyzerConfig {
        exhaustive_impact: exhaustive,
        ..AnalyzerConfig::default()
    };
    if let Some(depth) = depth {
        config.impact_depth_limit = depth;
    }

    let mut analyzer = RouteAnalyzer::new(&root, config)?;
    if let Some(dir) = store {
        analyzer = analyzer.with_store(Arc::new(LocalDirStore::new(dir)));
    }

    let routes = runtime.block_on(async {
        analyzer.initialize(rebuild).await?;
        Ok::<_, anyhow::Error>(analyzer.detect_routes(&files).await)
    })?;
    analyzer.persist();

    match output {
        OutputFormat::Human => {
            for (file, affected) in &routes {
                if affected.is_empty() {
                    println!("{}: no affected routes", file);
                } else {
                    println!("{}: {}", file, affected.join(", "));
                }
            }
        }
        _ => {
            let response = JsonResponse::new("detect", DetectResponse { routes });
            output_json(&response, output);
        }
    }
    Ok(())
}
