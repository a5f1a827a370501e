//! Architecture view: drop files that play no structural role

use std::collections::HashSet;

use strata_core::{Graph, GraphError, NodeKind, Role};

const KEY_ROLES: [Role; 5] = [Role::Entry, Role::Controller, Role::Api, Role::Service, Role::Model];

/// Keep files with a key role or any dependency edge, plus their ancestor
/// folders. Edges survive when both endpoints do.
pub fn filter_architecture(graph: &Graph) -> Result<Graph, GraphError> {
    let connected: HashSet<&str> = graph
        .dependency_edges()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();

    let mut keep: HashSet<String> = HashSet::new();
    for node in graph.nodes().filter(|n| n.kind != NodeKind::Folder) {
        if KEY_ROLES.contains(&node.role) || connected.contains(node.id.as_str()) {
            let mut current = node.id.as_str();
            keep.insert(current.to_string());
            while let Some(parent) = strata_core::parent_path(current) {
                keep.insert(parent.to_string());
                current = parent;
            }
        }
    }

    let mut filtered = Graph::new();
    for node in graph.nodes().filter(|n| keep.contains(&n.id)) {
        filtered.add_node(node.clone());
    }
    for edge in graph
        .edges()
        .filter(|e| keep.contains(&e.source) && keep.contains(&e.target))
    {
        filtered.add_edge(edge.clone())?;
    }
    Ok(filtered)
}
