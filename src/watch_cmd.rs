//! `wayfinder watch` - keep the graph fresh while the project changes.
//!
//! Events flow: debounced watcher -> fact refresh -> impact resolution.
//! Affected routes print per event; the snapshot persists after each
//! processed event so a crash loses at most one update.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wayfinder::{
    detect_file_kind, relative_to_root, AnalyzerConfig, FileSystemWatcher, LocalDirStore,
    RouteAnalyzer, WatcherConfig,
};

pub fn run(root: PathBuf, store: Option<PathBuf>, debounce_ms: u64) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let mut analyzer = RouteAnalyzer::new(&root, AnalyzerConfig::default())?;
    let persisting = store.is_some();
    if let Some(dir) = store {
        analyzer = analyzer.with_store(Arc::new(LocalDirStore::new(dir)));
    }

    eprintln!("building graph for {} ...", root.display());
    runtime.block_on(analyzer.initialize(false))?;
    let metrics = analyzer.metrics();
    eprintln!(
        "watching {} ({} files, {} route files, debounce {}ms)",
        root.display(),
        metrics.total_files,
        metrics.route_files,
        debounce_ms
    );

    let watcher = FileSystemWatcher::new(root.clone(), WatcherConfig { debounce_ms })?;

    while let Some(event) = watcher.recv_event() {
        let Ok(relative) = relative_to_root(&root, &event.path) else {
            continue;
        };
        // Deletions must pass through: the extension check runs on the
        // path string, not on disk state
        if detect_file_kind(Path::new(&relative)).is_none() {
            continue;
        }

        let results = runtime.block_on(analyzer.detect_routes(&[relative.clone()]));
        for (file, routes) in &results {
            if routes.is_empty() {
                println!("{}: no affected routes", file);
            } else {
                println!("{}: {}", file, routes.join(", "));
            }
        }
        if persisting {
            analyzer.persist();
        }
    }

    Ok(())
}
