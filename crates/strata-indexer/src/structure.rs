//! Level 1: the structural folder/file graph

use std::collections::BTreeSet;

use strata_core::{Graph, GraphError, RepoEdge, RepoNode, TreeItem};

use crate::roles::classify;

/// Build folder and file nodes with `tree` edges to their parents.
///
/// Folder nodes are created for every proper path prefix of every entry, in
/// sorted order, followed by one file node per blob in tree order. Roles are
/// classified from the path alone.
pub fn build_structure(tree: &[TreeItem]) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();

    let folders: BTreeSet<String> = tree
        .iter()
        .flat_map(|item| ancestor_prefixes(&item.path))
        .collect();

    for folder in &folders {
        graph.add_node(RepoNode::folder(folder));
        if let Some(parent) = strata_core::parent_path(folder).filter(|p| graph.contains(p)) {
            graph.add_edge(RepoEdge::tree(parent, folder))?;
        }
    }

    for item in tree.iter().filter(|item| item.is_blob()) {
        let role = classify(&item.path, None);
        if !graph.add_node(RepoNode::file(&item.path, role, item.size)) {
            tracing::debug!("Skipping duplicate path {}", item.path);
            continue;
        }
        // A file whose parent was never discovered stays attached to the root.
        if let Some(parent) = strata_core::parent_path(&item.path).filter(|p| graph.contains(p)) {
            graph.add_edge(RepoEdge::tree(parent, &item.path))?;
        }
    }

    tracing::debug!(
        "Structure graph: {} folders, {} nodes, {} edges",
        folders.len(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// `a/b/c.ts` -> `a`, `a/b`.
fn ancestor_prefixes(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.split('/').collect();
    (1..segments.len())
        .filter(|&end| !segments[end - 1].is_empty())
        .map(|end| segments[..end].join("/"))
        .collect()
}
