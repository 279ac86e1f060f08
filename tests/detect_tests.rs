//! End-to-end route detection over a fixture project.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wayfinder::{AnalyzerConfig, RouteAnalyzer, RouteFileType};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small React-style app:
/// main -> App -> routes -> { Home (static), Settings (lazy) } -> Button
fn fixture_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "src/main.tsx",
        "import App from './App';\nexport default App;\n",
    );
    write(
        root,
        "src/App.tsx",
        "import { routes } from './routes';\nexport default function App() { return routes; }\n",
    );
    write(
        root,
        "src/routes.tsx",
        r#"import Home from './views/Home';
const Settings = lazy(() => import('./views/Settings'));

export const routes = [
  { path: "/", element: <Home /> },
  { path: "/settings", element: <Settings /> },
];
"#,
    );
    write(
        root,
        "src/views/Home.tsx",
        "import Button from '@/components/Button';\nexport default function Home() { return <Button />; }\n",
    );
    write(
        root,
        "src/views/Settings.tsx",
        "export default function Settings() { return null; }\n",
    );
    write(
        root,
        "src/components/Button.tsx",
        "export default function Button() { return null; }\n",
    );
    write(
        root,
        "src/orphan.ts",
        "export const unused = true;\n",
    );

    dir
}

async fn built_analyzer(root: &Path) -> RouteAnalyzer {
    let mut analyzer = RouteAnalyzer::new(root, AnalyzerConfig::default()).unwrap();
    analyzer.initialize(true).await.unwrap();
    analyzer
}

#[tokio::test]
async fn detect_routes_for_transitively_imported_component() {
    let dir = fixture_project();
    let mut analyzer = built_analyzer(dir.path()).await;

    let results = analyzer
        .detect_routes(&["src/components/Button.tsx".to_string()])
        .await;
    let routes = &results["src/components/Button.tsx"];
    assert_eq!(routes, &vec!["/".to_string(), "/settings".to_string()]);
}

#[tokio::test]
async fn detect_routes_for_lazy_imported_page() {
    let dir = fixture_project();
    let mut analyzer = built_analyzer(dir.path()).await;

    let results = analyzer
        .detect_routes(&["src/views/Settings.tsx".to_string()])
        .await;
    let routes = &results["src/views/Settings.tsx"];
    assert!(routes.contains(&"/".to_string()));
    assert!(routes.contains(&"/settings".to_string()));
}

#[tokio::test]
async fn orphan_file_yields_empty_route_set() {
    let dir = fixture_project();
    let mut analyzer = built_analyzer(dir.path()).await;

    let results = analyzer.detect_routes(&["src/orphan.ts".to_string()]).await;
    assert!(results["src/orphan.ts"].is_empty());
}

#[tokio::test]
async fn unknown_file_yields_empty_route_set() {
    let dir = fixture_project();
    let mut analyzer = built_analyzer(dir.path()).await;

    let results = analyzer
        .detect_routes(&["src/does/not/Exist.tsx".to_string()])
        .await;
    assert!(results["src/does/not/Exist.tsx"].is_empty());
}

#[tokio::test]
async fn repeated_queries_are_deterministic() {
    let dir = fixture_project();
    let mut analyzer = built_analyzer(dir.path()).await;
    let changed = vec![
        "src/components/Button.tsx".to_string(),
        "src/views/Home.tsx".to_string(),
        "src/orphan.ts".to_string(),
    ];

    let first = analyzer.detect_routes(&changed).await;
    for _ in 0..4 {
        let next = analyzer.detect_routes(&changed).await;
        assert_eq!(next, first);
    }
}

#[tokio::test]
async fn absolute_paths_normalize_to_project_keys() {
    let dir = fixture_project();
    let mut analyzer = built_analyzer(dir.path()).await;

    let absolute = dir
        .path()
        .join("src/components/Button.tsx")
        .to_string_lossy()
        .to_string();
    let results = analyzer.detect_routes(&[absolute.clone()]).await;
    assert!(!results[&absolute].is_empty());
}

#[tokio::test]
async fn binary_file_degrades_to_empty_fact() {
    let dir = fixture_project();
    fs::write(dir.path().join("src/blob.ts"), b"\x00\x01\x02binary").unwrap();
    let mut analyzer = built_analyzer(dir.path()).await;

    let results = analyzer.detect_routes(&["src/blob.ts".to_string()]).await;
    assert!(results["src/blob.ts"].is_empty());
}

#[tokio::test]
async fn oversized_file_degrades_to_empty_fact() {
    let dir = fixture_project();
    let config = AnalyzerConfig {
        max_file_size: 64,
        ..AnalyzerConfig::default()
    };
    let mut analyzer = RouteAnalyzer::new(dir.path(), config).unwrap();
    analyzer.initialize(true).await.unwrap();

    // routes.tsx is well over 64 bytes, so its fact is empty and it stops
    // being a route file
    let results = analyzer.detect_routes(&["src/routes.tsx".to_string()]).await;
    assert!(results["src/routes.tsx"].is_empty());
}

#[tokio::test]
async fn metrics_reflect_fixture_shape() {
    let dir = fixture_project();
    let analyzer = built_analyzer(dir.path()).await;

    let metrics = analyzer.metrics();
    assert_eq!(metrics.total_files, 7);
    assert_eq!(metrics.route_files, 1);
    assert!(metrics.import_edges >= 5);
    // main.tsx has no importers and an entry-like name
    assert!(metrics.entry_points >= 1);
}

#[tokio::test]
async fn route_info_classifies_definers() {
    let dir = fixture_project();
    let mut analyzer = built_analyzer(dir.path()).await;

    let info = analyzer
        .route_info(&[
            "src/routes.tsx".to_string(),
            "src/components/Button.tsx".to_string(),
        ])
        .await;

    let definer = &info["src/routes.tsx"];
    assert!(definer.is_route_definer);
    assert_eq!(definer.route_file_type, Some(RouteFileType::Primary));

    let component = &info["src/components/Button.tsx"];
    assert!(!component.is_route_definer);
    assert_eq!(component.route_file_type, None);
    assert!(!component.routes.is_empty());
}

#[tokio::test]
async fn route_info_flags_test_files() {
    let dir = fixture_project();
    write(
        dir.path(),
        "src/__tests__/routes.test.tsx",
        "export const r = [{ path: \"/only-in-test\" }];\n",
    );
    let mut analyzer = built_analyzer(dir.path()).await;

    let info = analyzer
        .route_info(&["src/__tests__/routes.test.tsx".to_string()])
        .await;
    let entry = &info["src/__tests__/routes.test.tsx"];
    assert!(entry.is_route_definer);
    assert_eq!(entry.route_file_type, Some(RouteFileType::Test));
}
