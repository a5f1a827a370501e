//! Synchronous analysis entry point
//!
//! Everything here is CPU-bound and runs to completion once file contents
//! have been fetched.

use std::collections::BTreeMap;

use strata_core::{
    AnalysisError, Diagrams, Graph, NodeKind, SchemaEntity, TreeItem, apply_layout,
    generate_diagrams,
};

use crate::config::AnalysisConfig;
use crate::enrichment::{apply_enrichment, compute_enrichment};
use crate::schema::{detect_schema_files, parse_schema, select_entities};
use crate::structure::build_structure;

/// Finished graph, schema, and diagrams for one repository.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: Graph,
    /// Every schema-looking blob, in path order.
    pub schema_files: Vec<String>,
    pub schema_entities: Vec<SchemaEntity>,
    pub diagrams: Diagrams,
    /// Number of files that received a content overlay.
    pub parsed_files: usize,
}

impl Analysis {
    /// Nodes rendered as API endpoints.
    pub fn api_endpoints(&self) -> usize {
        self.graph
            .nodes()
            .filter(|n| n.kind == NodeKind::Api)
            .count()
    }
}

/// Schema-looking blob paths, sorted.
pub fn schema_candidates(tree: &[TreeItem]) -> Vec<String> {
    let mut files = detect_schema_files(
        tree.iter()
            .filter(|item| item.is_blob())
            .map(|item| item.path.as_str()),
    );
    files.sort();
    files
}

/// Build the structural graph, overlay dependencies, parse schemas, lay out
/// and render diagrams.
///
/// `contents` maps paths to fetched text. Only files picked by
/// [`AnalysisConfig::select_parseable_files`] are enriched; other texts, such
/// as schema files past the cap, feed schema parsing alone. Files absent
/// from it, or with empty text, keep their structural node only.
pub fn analyze(
    tree: &[TreeItem],
    contents: &BTreeMap<String, String>,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    let structure = build_structure(tree)?;
    let selected: BTreeMap<String, String> = config
        .select_parseable_files(tree)
        .into_iter()
        .filter_map(|path| contents.get(&path).map(|text| (path, text.clone())))
        .collect();
    let enrichment = compute_enrichment(&structure, &selected, config);
    let parsed_files = enrichment.nodes.len();
    let mut graph = apply_enrichment(&structure, &enrichment)?;

    let schema_files = schema_candidates(tree);
    let parsed_schemas: Vec<(String, Vec<SchemaEntity>)> = schema_files
        .iter()
        .filter_map(|path| {
            let text = contents.get(path).filter(|text| !text.is_empty())?;
            Some((path.clone(), parse_schema(text)))
        })
        .collect();
    let schema_entities = select_entities(parsed_schemas, config.schema_selection);

    apply_layout(&mut graph, &config.layout);
    let diagrams = generate_diagrams(&graph, &schema_entities);

    tracing::debug!(
        "Analysis built {} nodes, {} edges, {} entities",
        graph.node_count(),
        graph.edge_count(),
        schema_entities.len()
    );

    Ok(Analysis {
        graph,
        schema_files,
        schema_entities,
        diagrams,
        parsed_files,
    })
}
