//! `wayfinder build` - full graph construction with snapshot persistence.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use wayfinder::output::BuildResponse;
use wayfinder::{
    output_json, AnalyzerConfig, JsonResponse, LocalDirStore, OutputFormat, RouteAnalyzer,
};

pub fn run(
    root: PathBuf,
    store: Option<PathBuf>,
    use_gitignore: bool,
    output: OutputFormat,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let config = AnalyzerConfig {
        use_gitignore,
        ..AnalyzerConfig::default()
    };
    let mut analyzer = RouteAnalyzer::new(&root, config)?;
    let persisted = store.is_some();
    if let Some(dir) = store {
        analyzer = analyzer.with_store(Arc::new(LocalDirStore::new(dir)));
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let progress_bar = bar.clone();
    let progress = move |processed: usize, total: usize| {
        progress_bar.set_length(total as u64);
        progress_bar.set_position(processed as u64);
    };

    let files_indexed =
        runtime.block_on(analyzer.build_graph(Some(&progress)))?;
    bar.finish_and_clear();
    analyzer.persist();

    let metrics = analyzer.metrics();
    match output {
        OutputFormat::Human => {
            println!(
                "indexed {} files ({} route files, {} import edges)",
                files_indexed, metrics.route_files, metrics.import_edges
            );
            if persisted {
                println!("snapshot written: {}", analyzer.snapshot_key());
            }
        }
        _ => {
            let response = JsonResponse::new(
                "build",
                BuildResponse {
                    files_indexed,
                    route_files: metrics.route_files,
                    import_edges: metrics.import_edges,
                    persisted,
                },
            );
            output_json(&response, output);
        }
    }
    Ok(())
}
