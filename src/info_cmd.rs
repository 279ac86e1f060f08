//! `wayfinder info` - affected routes plus route-file classification.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use wayfinder::output::InfoResponse;
use wayfinder::{
    output_json, AnalyzerConfig, JsonResponse, LocalDirStore, OutputFormat, RouteAnalyzer,
    RouteFileType,
};

pub fn run(
    root: PathBuf,
    files: Vec<String>,
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

    let info = runtime.block_on(async {
        analyzer.initialize(rebuild).await?;
        Ok::<_, anyhow::Error>(analyzer.route_info(&files).await)
    })?;
    analyzer.persist();

    match output {
        OutputFormat::Human => {
            for (file, entry) in &info {
                let kind = match entry.route_file_type {
                    Some(RouteFileType::Test) => " [test]",
                    Some(RouteFileType::Primary) => " [primary]",
                    Some(RouteFileType::ComponentWithRoutes) => " [component-with-routes]",
                    None => "",
                };
                println!(
                    "{}{}: definer={} routes={}",
                    file,
                    kind,
                    entry.is_route_definer,
                    if entry.routes.is_empty() {
                        "-".to_string()
                    } else {
                        entry.routes.join(", ")
                    }
                );
            }
        }
        _ => {
            let response = JsonResponse::new("info", InfoResponse { files: info });
            output_json(&response, output);
        }
    }
    Ok(())
}
