//! Level 2: content-derived overlay
//!
//! `compute_enrichment` reads a structural graph and file texts and returns
//! an [`Enrichment`] without touching the graph. `apply_enrichment` merges the
//! two into a new graph. Content-aware roles replace the path-only ones.

use std::collections::{BTreeMap, HashSet};

use strata_core::{CallTrace, Graph, GraphError, NodeKind, RepoEdge, Role};

use crate::config::AnalysisConfig;
use crate::extractors::{
    ResolvedImport, detect_external_apis, detect_http_methods, extract_exports, extract_imports,
    trace_calls,
};
use crate::roles::classify;

/// Suffixes tried, in order, when matching an import against node ids.
const RESOLUTION_SUFFIXES: [&str; 9] = [
    "",
    ".ts",
    ".tsx",
    ".js",
    ".jsx",
    "/index.ts",
    "/index.tsx",
    "/index.js",
    ".py",
];

/// Everything learned about one file from its text.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEnrichment {
    pub role: Role,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub external_apis: Vec<String>,
    /// Present only for files whose final role is an endpoint.
    pub api_methods: Option<Vec<String>>,
    pub function_calls: Vec<CallTrace>,
}

/// Per-node overlay plus the dependency edges to add.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub nodes: BTreeMap<String, NodeEnrichment>,
    pub edges: Vec<RepoEdge>,
}

/// Extract imports, exports, APIs, call traces and roles for every parseable
/// file node that has non-empty content.
pub fn compute_enrichment(
    graph: &Graph,
    contents: &BTreeMap<String, String>,
    config: &AnalysisConfig,
) -> Enrichment {
    let mut enrichment = Enrichment::default();
    let mut edge_ids: HashSet<String> = HashSet::new();

    for node in graph.nodes().filter(|n| n.kind != NodeKind::Folder) {
        let Some(content) = contents.get(&node.id).filter(|c| !c.is_empty()) else {
            continue;
        };
        if !config.is_parseable(&node.id) {
            continue;
        }

        let imports = extract_imports(content, &node.id);
        let resolved = resolve_imports(graph, &node.id, &imports);
        let function_calls = trace_calls(content, &node.id, &resolved);

        for import in &resolved {
            let functions = function_calls
                .iter()
                .find(|trace| trace.target == import.target)
                .map(|trace| trace.functions.as_slice())
                .unwrap_or_default();
            let edge = RepoEdge::dependency(&node.id, &import.target, functions);
            if edge_ids.insert(edge.id.clone()) {
                enrichment.edges.push(edge);
            }
        }

        let role = classify(&node.id, Some(content));
        let api_methods = role.is_endpoint().then(|| detect_http_methods(content));

        enrichment.nodes.insert(
            node.id.clone(),
            NodeEnrichment {
                role,
                imports,
                exports: extract_exports(content),
                external_apis: detect_external_apis(content),
                api_methods,
                function_calls,
            },
        );
    }

    tracing::debug!(
        "Enriched {} files, {} dependency edges",
        enrichment.nodes.len(),
        enrichment.edges.len()
    );
    enrichment
}

/// First candidate for each import that names an existing file other than
/// `source`. Unresolved imports are dropped.
fn resolve_imports(graph: &Graph, source: &str, imports: &[String]) -> Vec<ResolvedImport> {
    let mut seen = HashSet::new();
    imports
        .iter()
        .filter_map(|import| {
            let target = RESOLUTION_SUFFIXES
                .iter()
                .map(|suffix| format!("{import}{suffix}"))
                .find(|candidate| {
                    graph
                        .node(candidate)
                        .is_some_and(|n| n.kind != NodeKind::Folder)
                })?;
            (target != source && seen.insert(target.clone())).then(|| ResolvedImport {
                import: import.clone(),
                target,
            })
        })
        .collect()
}

/// Merge an overlay into a copy of `graph`.
///
/// Enriched nodes take the overlay's role, and their kind follows it. Edges
/// whose id already exists are skipped.
pub fn apply_enrichment(graph: &Graph, enrichment: &Enrichment) -> Result<Graph, GraphError> {
    let mut merged = graph.clone();

    for (id, overlay) in &enrichment.nodes {
        let Some(node) = merged.node_mut(id) else {
            return Err(GraphError::UnknownNode(id.clone()));
        };
        node.role = overlay.role;
        node.kind = if overlay.role.is_endpoint() {
            NodeKind::Api
        } else {
            NodeKind::File
        };
        node.imports = Some(overlay.imports.clone());
        node.exports = Some(overlay.exports.clone());
        node.external_apis = Some(overlay.external_apis.clone());
        node.api_methods = overlay.api_methods.clone();
        node.function_calls = Some(overlay.function_calls.clone());
    }

    for edge in &enrichment.edges {
        merged.add_edge(edge.clone())?;
    }

    Ok(merged)
}
