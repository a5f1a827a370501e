//! Unit tests for the analysis pipeline

use std::collections::BTreeMap;

use strata_core::{EdgeCategory, NodeKind, Role, TreeItem};

use crate::test_utils::{sample_contents, sample_tree};
use crate::*;

fn contents(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(path, text)| (path.to_string(), text.to_string()))
        .collect()
}

#[test]
fn test_named_import_call_scenario() {
    let tree = vec![
        TreeItem::blob("src/index.ts", None),
        TreeItem::blob("src/services/user.ts", None),
    ];
    let texts = contents(&[(
        "src/index.ts",
        "import { getUser } from './services/user'\n\nconsole.log(getUser())\n",
    )]);
    let analysis = analyze(&tree, &texts, &AnalysisConfig::default()).unwrap();

    let deps: Vec<_> = analysis.graph.dependency_edges().collect();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].category, EdgeCategory::Call);
    assert_eq!(deps[0].source, "src/index.ts");
    assert_eq!(deps[0].target, "src/services/user.ts");
    assert!(deps[0].label.as_deref().unwrap_or_default().contains("getUser"));
}

#[test]
fn test_route_file_scenario() {
    let path = "app/api/users/route.ts";
    assert_eq!(classify(path, None), Role::Api);

    let tree = vec![TreeItem::blob(path, None)];
    let texts = contents(&[(path, "export async function GET(req: Request) {}")]);
    let analysis = analyze(&tree, &texts, &AnalysisConfig::default()).unwrap();
    let node = analysis.graph.node(path).unwrap();
    assert_eq!(node.kind, NodeKind::Api);
    assert_eq!(node.api_methods, Some(vec!["GET".to_string()]));
    assert!(analysis.diagrams.sequences.contains_key(path));
}

#[test]
fn test_schema_text_past_cap_is_not_enriched() {
    let tree = vec![
        TreeItem::blob("a.ts", None),
        TreeItem::tree("app"),
        TreeItem::blob("app/models.py", None),
    ];
    let texts = contents(&[
        ("a.ts", "export const a = 1\n"),
        ("app/models.py", "from .db import Base\n\nclass User(Base):\n    pass\n"),
    ]);
    let config = AnalysisConfig {
        max_parsed_files: 1,
        ..AnalysisConfig::default()
    };
    assert_eq!(config.select_parseable_files(&tree), vec!["a.ts"]);

    let analysis = analyze(&tree, &texts, &config).unwrap();
    assert_eq!(analysis.parsed_files, 1);
    assert_eq!(analysis.schema_files, vec!["app/models.py"]);
    let models = analysis.graph.node("app/models.py").unwrap();
    assert_eq!(models.exports, None);
    assert_eq!(models.imports, None);
    assert_eq!(analysis.graph.node("a.ts").unwrap().exports, Some(vec!["a".to_string()]));
}

#[test]
fn test_single_sql_table_scenario() {
    let tree = vec![TreeItem::blob("db/schema.sql", None)];
    let texts = contents(&[("db/schema.sql", "CREATE TABLE users (id INT PRIMARY KEY, name TEXT)")]);
    let analysis = analyze(&tree, &texts, &AnalysisConfig::default()).unwrap();

    assert_eq!(analysis.schema_entities.len(), 1);
    let users = &analysis.schema_entities[0];
    assert_eq!(users.name, "users");
    assert!(users.fields[0].is_primary);
    assert!(!users.fields[1].is_primary && !users.fields[1].is_relation);

    let erd = &analysis.diagrams.erd;
    assert!(erd.contains("    users {\n"));
    assert!(erd.contains("INT id PK"));
    assert!(erd.contains("TEXT name\n"));
    assert!(!erd.contains("||--o{"));
}

#[test]
fn test_first_non_empty_schema_file_is_used() {
    let tree = vec![
        TreeItem::blob("db/a_empty.sql", None),
        TreeItem::blob("prisma/schema.prisma", None),
    ];
    let texts = contents(&[
        ("db/a_empty.sql", "-- nothing yet\n"),
        ("prisma/schema.prisma", "model Account {\n  id Int @id\n}\n"),
    ]);
    let analysis = analyze(&tree, &texts, &AnalysisConfig::default()).unwrap();
    assert_eq!(analysis.schema_files, vec!["db/a_empty.sql", "prisma/schema.prisma"]);
    assert_eq!(analysis.schema_entities[0].name, "Account");
    assert!(analysis.diagrams.erd.starts_with("erDiagram\n"));
}

#[test]
fn test_structural_completeness() {
    let analysis = analyze(&sample_tree(), &sample_contents(), &AnalysisConfig::default()).unwrap();
    let graph = &analysis.graph;

    for node in graph.nodes() {
        let mut prefix = node.id.as_str();
        while let Some(parent) = strata_core::parent_path(prefix) {
            assert!(graph.contains(parent), "missing ancestor {parent} of {}", node.id);
            prefix = parent;
        }

        let parents: Vec<_> = graph
            .edges_to(&node.id)
            .into_iter()
            .filter(|e| e.category == EdgeCategory::Tree)
            .collect();
        assert!(parents.len() <= 1);
        if let Some(edge) = parents.first() {
            assert_eq!(Some(edge.source.as_str()), node.parent());
        }
    }
}

#[test]
fn test_dependency_edges_are_resolved_and_not_self_loops() {
    let analysis = analyze(&sample_tree(), &sample_contents(), &AnalysisConfig::default()).unwrap();
    for edge in analysis.graph.dependency_edges() {
        assert!(analysis.graph.contains(&edge.target));
        assert_ne!(edge.source, edge.target);
    }
    assert!(analysis.graph.has_edge_between(
        "app/api/users/route.ts",
        "lib/users.ts",
        EdgeCategory::Call
    ));
    assert!(analysis.graph.has_edge_between(
        "lib/users.ts",
        "models/user.ts",
        EdgeCategory::Import
    ));
}

#[test]
fn test_sample_enrichment() {
    let analysis = analyze(&sample_tree(), &sample_contents(), &AnalysisConfig::default()).unwrap();
    let graph = &analysis.graph;

    let route = graph.node("app/api/users/route.ts").unwrap();
    assert_eq!(route.api_methods, Some(vec!["GET".to_string(), "POST".to_string()]));
    let calls = route.function_calls.as_ref().unwrap();
    assert_eq!(calls[0].target, "lib/users.ts");
    assert_eq!(calls[0].functions, vec!["listUsers", "createUser"]);

    let lib = graph.node("lib/users.ts").unwrap();
    assert_eq!(lib.role, Role::Util);
    assert_eq!(
        lib.external_apis.as_deref().unwrap_or_default(),
        ["https://hooks.example.com/users/{...}", "Prisma ORM"]
    );
    assert_eq!(lib.exports.as_deref().unwrap_or_default(), ["listUsers", "createUser"]);

    assert_eq!(analysis.parsed_files, 3);
    assert_eq!(analysis.api_endpoints(), 1);
    assert_eq!(analysis.schema_entities.len(), 2);
    assert!(analysis.diagrams.erd.contains("    Post ||--o{ User : \"author\"\n"));
    assert!(graph.nodes().all(|n| n.position.is_some()));
}

#[test]
fn test_sample_sequence_diagram() {
    let analysis = analyze(&sample_tree(), &sample_contents(), &AnalysisConfig::default()).unwrap();
    let sequence = &analysis.diagrams.sequences["app/api/users/route.ts"];
    insta::assert_snapshot!(sequence, @r"
sequenceDiagram
    participant Client
    participant app_api_users_route_ts as route.ts
    participant lib_users_ts as users.ts
    Client->>+app_api_users_route_ts: GET, POST Request
    app_api_users_route_ts->>+lib_users_ts: listUsers, createUser()
    lib_users_ts-->>-app_api_users_route_ts: result
    app_api_users_route_ts-->>-Client: Response
");
}

#[test]
fn test_pipeline_is_idempotent() {
    let config = AnalysisConfig::default();
    let first = analyze(&sample_tree(), &sample_contents(), &config).unwrap();
    let second = analyze(&sample_tree(), &sample_contents(), &config).unwrap();

    let (nodes_a, edges_a) = first.graph.into_parts();
    let (nodes_b, edges_b) = second.graph.into_parts();
    assert_eq!(nodes_a, nodes_b);
    assert_eq!(edges_a, edges_b);
    assert_eq!(first.schema_entities, second.schema_entities);
    assert_eq!(first.diagrams, second.diagrams);
}

#[test]
fn test_missing_contents_leave_structure_only() {
    let analysis = analyze(&sample_tree(), &BTreeMap::new(), &AnalysisConfig::default()).unwrap();
    assert_eq!(analysis.parsed_files, 0);
    assert_eq!(analysis.graph.dependency_edges().count(), 0);
    assert!(analysis.schema_entities.is_empty());
    assert_eq!(analysis.diagrams.architecture, "");
    assert_eq!(analysis.diagrams.erd, "");
}

#[test]
fn test_merge_all_schema_selection() {
    let tree = vec![TreeItem::blob("db/a.sql", None), TreeItem::blob("db/b.sql", None)];
    let texts = contents(&[
        ("db/a.sql", "CREATE TABLE a (id INT)"),
        ("db/b.sql", "CREATE TABLE b (id INT)"),
    ]);
    let config = AnalysisConfig {
        schema_selection: SchemaSelection::MergeAll,
        ..AnalysisConfig::default()
    };
    let analysis = analyze(&tree, &texts, &config).unwrap();
    assert_eq!(analysis.schema_entities.len(), 2);
}
