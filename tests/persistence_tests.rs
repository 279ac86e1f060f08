//! Snapshot persistence: cache equivalence and degradation to rebuild.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wayfinder::{
    snapshot_key, AnalyzerConfig, ByteStore, LocalDirStore, RouteAnalyzer,
};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/App.tsx",
        "import Home from './Home';\nexport const routes = [{ path: \"/\", element: <Home /> }];\n",
    );
    write(
        root,
        "src/Home.tsx",
        "import Card from './Card';\nexport default function Home() { return <Card />; }\n",
    );
    write(root, "src/Card.tsx", "export default function Card() { return null; }\n");
    dir
}

#[tokio::test]
async fn fresh_build_and_hydrated_build_answer_identically() {
    let project = fixture_project();
    let store_dir = TempDir::new().unwrap();
    let changed: Vec<String> = vec![
        "src/App.tsx".to_string(),
        "src/Home.tsx".to_string(),
        "src/Card.tsx".to_string(),
    ];

    // Build fresh and persist
    let mut fresh = RouteAnalyzer::new(project.path(), AnalyzerConfig::default())
        .unwrap()
        .with_store(Arc::new(LocalDirStore::new(store_dir.path())));
    fresh.initialize(true).await.unwrap();
    fresh.persist();
    let fresh_answer = fresh.detect_routes(&changed).await;

    // Second analyzer hydrates from the snapshot
    let mut hydrated = RouteAnalyzer::new(project.path(), AnalyzerConfig::default())
        .unwrap()
        .with_store(Arc::new(LocalDirStore::new(store_dir.path())));
    hydrated.initialize(false).await.unwrap();
    let hydrated_answer = hydrated.detect_routes(&changed).await;

    assert_eq!(fresh_answer, hydrated_answer);
    assert_eq!(fresh.metrics(), hydrated.metrics());
}

#[tokio::test]
async fn corrupt_snapshot_degrades_to_rebuild() {
    let project = fixture_project();
    let store_dir = TempDir::new().unwrap();
    let store = LocalDirStore::new(store_dir.path());
    let key = snapshot_key("wayfinder", project.path());
    store.upload(&key, b"{ not valid json").unwrap();

    let mut analyzer = RouteAnalyzer::new(project.path(), AnalyzerConfig::default())
        .unwrap()
        .with_store(Arc::new(LocalDirStore::new(store_dir.path())));
    // Must not fail; the corrupt blob is a cache miss
    analyzer.initialize(false).await.unwrap();

    let results = analyzer.detect_routes(&["src/Card.tsx".to_string()]).await;
    assert_eq!(results["src/Card.tsx"], vec!["/".to_string()]);
}

#[tokio::test]
async fn missing_snapshot_triggers_build_and_writes_one() {
    let project = fixture_project();
    let store_dir = TempDir::new().unwrap();

    let mut analyzer = RouteAnalyzer::new(project.path(), AnalyzerConfig::default())
        .unwrap()
        .with_store(Arc::new(LocalDirStore::new(store_dir.path())));
    analyzer.initialize(false).await.unwrap();

    let store = LocalDirStore::new(store_dir.path());
    let keys = store.list("wayfinder/").unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].ends_with("/import-graph.json"));
}

#[tokio::test]
async fn force_rebuild_ignores_snapshot() {
    let project = fixture_project();
    let store_dir = TempDir::new().unwrap();

    let mut first = RouteAnalyzer::new(project.path(), AnalyzerConfig::default())
        .unwrap()
        .with_store(Arc::new(LocalDirStore::new(store_dir.path())));
    first.initialize(true).await.unwrap();
    first.persist();

    // Change the project after the snapshot was taken
    write(
        project.path(),
        "src/App.tsx",
        "import Home from './Home';\nexport const routes = [{ path: \"/changed\", element: <Home /> }];\n",
    );

    let mut forced = RouteAnalyzer::new(project.path(), AnalyzerConfig::default())
        .unwrap()
        .with_store(Arc::new(LocalDirStore::new(store_dir.path())));
    forced.initialize(true).await.unwrap();

    let results = forced.detect_routes(&["src/Card.tsx".to_string()]).await;
    assert_eq!(results["src/Card.tsx"], vec!["/changed".to_string()]);
}

#[tokio::test]
async fn snapshot_key_derives_from_project_name() {
    let key = snapshot_key("wayfinder", Path::new("/work/checkout/my-frontend"));
    assert_eq!(key, "wayfinder/my-frontend/import-graph.json");
}
