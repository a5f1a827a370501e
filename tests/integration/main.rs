//! Integration tests for Strata
//!
//! These run the whole analysis pipeline against an in-memory repository.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use strata_core::{EdgeCategory, NodeKind, RepoMeta, Role, TreeItem, TtlCache};
use strata_github::{CachedSource, RepoId, RepoSource, SourceError};
use strata_indexer::AnalysisConfig;
use strata_server::{AnalysisResponse, Analyzer};

/// A small FastAPI-style service with a SQL schema.
struct PythonRepo {
    files: BTreeMap<&'static str, &'static str>,
    content_requests: AtomicUsize,
}

impl PythonRepo {
    fn new() -> Self {
        let files = BTreeMap::from([
            (
                "main.py",
                "from fastapi import FastAPI\nfrom .routes.users import router\n\napp = FastAPI()\napp.include_router(router)\n",
            ),
            (
                "routes/users.py",
                "from fastapi import APIRouter\n\
                 from ..services.user_service import all_users\n\
                 from ..db.models.user import User\n\n\
                 router = APIRouter()\n\n\
                 @router.get(\"/users\")\n\
                 def list_users():\n    return all_users()\n",
            ),
            (
                "services/user_service.py",
                "import redis\n\
                 from ..db.models.user import User\n\n\
                 cache = redis.Redis()\n\n\
                 def all_users():\n    return [User()]\n",
            ),
            ("db/models/user.py", "class User:\n    id: int\n    email: str\n"),
            (
                "db/schema.sql",
                "CREATE TABLE users (\n  id INTEGER PRIMARY KEY,\n  email TEXT NOT NULL\n);\n\n\
                 CREATE TABLE posts (\n  id INTEGER PRIMARY KEY,\n  user_id INTEGER REFERENCES users(id)\n);\n",
            ),
            (
                "tests/test_users.py",
                "from ..routes.users import list_users\n\ndef test_list():\n    assert list_users()\n",
            ),
            ("README.md", "# users service\n"),
        ]);
        Self {
            files,
            content_requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl RepoSource for PythonRepo {
    async fn get_meta(&self, repo: &RepoId) -> Result<RepoMeta, SourceError> {
        Ok(RepoMeta {
            name: repo.repo.clone(),
            full_name: repo.to_string(),
            description: None,
            language: None,
            stars: 0,
            forks: 0,
            default_branch: "main".to_string(),
        })
    }

    async fn get_tree(&self, _repo: &RepoId, _reference: &str) -> Result<Vec<TreeItem>, SourceError> {
        let mut tree = vec![
            TreeItem::tree("routes"),
            TreeItem::tree("services"),
            TreeItem::tree("db"),
            TreeItem::tree("db/models"),
            TreeItem::tree("tests"),
        ];
        tree.extend(
            self.files
                .iter()
                .map(|(path, text)| TreeItem::blob(*path, Some(text.len() as u64))),
        );
        Ok(tree)
    }

    async fn get_file_content(&self, _repo: &RepoId, path: &str) -> String {
        self.content_requests.fetch_add(1, Ordering::SeqCst);
        self.files.get(path).map(|text| text.to_string()).unwrap_or_default()
    }

    fn name(&self) -> &str {
        "python-fixture"
    }
}

fn results_cache() -> Arc<TtlCache<AnalysisResponse>> {
    Arc::new(TtlCache::new(10, Duration::from_secs(60)))
}

async fn analyze_fixture() -> AnalysisResponse {
    let analyzer = Analyzer::new(Arc::new(PythonRepo::new()), results_cache(), AnalysisConfig::default());
    analyzer
        .analyze_url("https://github.com/acme/users-service")
        .await
        .unwrap()
}

fn edge<'a>(response: &'a AnalysisResponse, source: &str, target: &str) -> Option<&'a strata_core::RepoEdge> {
    response
        .edges
        .iter()
        .find(|e| e.source == source && e.target == target && e.category.is_dependency())
}

#[tokio::test]
async fn test_python_repository_end_to_end() {
    let response = analyze_fixture().await;

    assert_eq!(response.meta.language.as_deref(), Some("Python"));
    assert_eq!(response.stats.total_files, 7);
    assert_eq!(response.stats.total_folders, 5);
    assert_eq!(response.stats.parsed_files, 5);
    assert_eq!(response.stats.entry_points, 1);
    assert_eq!(response.stats.api_endpoints, 1);
    assert_eq!(response.stats.schema_files, 1);
    assert_eq!(response.stats.external_apis, 1);
    // db/schema.sql counts as a model alongside db/models/user.py
    assert_eq!(
        response.summary,
        "A Python repository with 7 files. Architecture: 1 entry point(s), 1 API route(s), \
         1 service(s), 2 model(s). External integrations: Redis."
    );

    let route = response.nodes.iter().find(|n| n.id == "routes/users.py").unwrap();
    assert_eq!(route.kind, NodeKind::Api);
    assert_eq!(route.role, Role::Controller);
    assert_eq!(route.api_methods.as_deref(), Some(&["GET".to_string()][..]));
    assert!(response.nodes.iter().all(|n| n.position.is_some()));
}

#[tokio::test]
async fn test_dependency_edges() {
    let response = analyze_fixture().await;

    let import = edge(&response, "main.py", "routes/users.py").unwrap();
    assert_eq!(import.category, EdgeCategory::Import);
    assert_eq!(import.label.as_deref(), Some("imports"));

    let call = edge(&response, "routes/users.py", "services/user_service.py").unwrap();
    assert_eq!(call.category, EdgeCategory::Call);
    assert_eq!(call.label.as_deref(), Some("calls all_users"));

    let constructor = edge(&response, "services/user_service.py", "db/models/user.py").unwrap();
    assert_eq!(constructor.label.as_deref(), Some("calls User"));

    assert!(edge(&response, "tests/test_users.py", "routes/users.py").is_some());
    assert!(response.edges.iter().all(|e| e.source != e.target));
}

#[tokio::test]
async fn test_diagrams_and_schema() {
    let response = analyze_fixture().await;

    let names: Vec<&str> = response.schema_entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["users", "posts"]);
    assert!(response.erd_diagram.contains("    users {"));
    assert!(!response.erd_diagram.contains("||--o{"));

    let flow = &response.logic_flows["routes/users.py"];
    assert_eq!(&response.mermaid.sequence, flow);
    assert!(flow.contains("Client->>+routes_users_py: GET Request"));
    assert!(flow.contains("routes_users_py->>+services_user_service_py: all_users()"));
    assert!(flow.contains("services_user_service_py->>+db_models_user_py: query"));

    assert!(response.mermaid.flow.contains("main_py"));
    assert!(!response.mermaid.flow.contains("README"));
}

#[tokio::test]
async fn test_shared_content_cache_across_analyzers() {
    let trees = Arc::new(TtlCache::new(10, Duration::from_secs(60)));
    let files = Arc::new(TtlCache::new(100, Duration::from_secs(60)));
    let source = Arc::new(CachedSource::new(PythonRepo::new(), trees, files));

    let first = Analyzer::new(source.clone(), results_cache(), AnalysisConfig::default());
    first.analyze(&RepoId::new("acme", "users-service")).await.unwrap();
    let requests = source.inner().content_requests.load(Ordering::SeqCst);
    assert_eq!(requests, 6);

    // A fresh result cache forces a full pipeline run, but contents come from the shared cache
    let second = Analyzer::new(source.clone(), results_cache(), AnalysisConfig::default());
    let response = second.analyze(&RepoId::new("acme", "users-service")).await.unwrap();
    assert!(!response.stats.cached);
    assert_eq!(source.inner().content_requests.load(Ordering::SeqCst), requests);
}

#[tokio::test]
async fn test_response_serializes_with_tree_shape() {
    let response = analyze_fixture().await;
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["stats"]["parsed_files"], 5);
    assert_eq!(json["meta"]["full_name"], "acme/users-service");
    assert!(json["file_contents"]["main.py"].is_string());
    assert!(json["file_contents"].get("db/schema.sql").is_none());
}
