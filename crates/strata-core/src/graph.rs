//! Graph wrapper using petgraph::StableDiGraph keyed by repository path

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use crate::error::GraphError;
use crate::model::{EdgeCategory, RepoEdge, RepoNode};

/// The repository graph. Nodes and edges iterate in insertion order.
#[derive(Clone)]
pub struct Graph {
    inner: StableDiGraph<RepoNode, RepoEdge>,
    by_id: HashMap<String, NodeIndex>,
    edge_ids: HashSet<String>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            by_id: HashMap::new(),
            edge_ids: HashSet::new(),
        }
    }

    /// Add a node. Returns `false` if a node with the same id already exists.
    pub fn add_node(&mut self, node: RepoNode) -> bool {
        if self.by_id.contains_key(&node.id) {
            return false;
        }
        let id = node.id.clone();
        let idx = self.inner.add_node(node);
        self.by_id.insert(id, idx);
        true
    }

    /// Add an edge between two existing nodes.
    ///
    /// Returns `Ok(false)` when an edge with the same id is already present.
    pub fn add_edge(&mut self, edge: RepoEdge) -> Result<bool, GraphError> {
        let source = self.index_of(&edge.source)?;
        let target = self.index_of(&edge.target)?;
        if !self.edge_ids.insert(edge.id.clone()) {
            return Ok(false);
        }
        self.inner.add_edge(source, target, edge);
        Ok(true)
    }

    fn index_of(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::DanglingEdge(id.to_string()))
    }

    pub fn node(&self, id: &str) -> Option<&RepoNode> {
        self.by_id
            .get(id)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut RepoNode> {
        let idx = *self.by_id.get(id)?;
        self.inner.node_weight_mut(idx)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &RepoNode> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges.
    pub fn edges(&self) -> impl Iterator<Item = &RepoEdge> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx))
    }

    /// Import and call edges only.
    pub fn dependency_edges(&self) -> impl Iterator<Item = &RepoEdge> {
        self.edges().filter(|e| e.category.is_dependency())
    }

    /// Outgoing edges of a node, in insertion order.
    pub fn edges_from(&self, id: &str) -> Vec<&RepoEdge> {
        self.directed(id, Direction::Outgoing)
    }

    /// Incoming edges of a node, in insertion order.
    pub fn edges_to(&self, id: &str) -> Vec<&RepoEdge> {
        self.directed(id, Direction::Incoming)
    }

    fn directed(&self, id: &str, direction: Direction) -> Vec<&RepoEdge> {
        let Some(&idx) = self.by_id.get(id) else {
            return Vec::new();
        };
        let mut indices: Vec<EdgeIndex> = self
            .inner
            .edges_directed(idx, direction)
            .map(|e| e.id())
            .collect();
        indices.sort();
        indices
            .into_iter()
            .filter_map(|e| self.inner.edge_weight(e))
            .collect()
    }

    /// Check if an edge of the given category exists between two nodes.
    pub fn has_edge_between(&self, source: &str, target: &str, category: EdgeCategory) -> bool {
        self.edges_from(source)
            .iter()
            .any(|e| e.target == target && e.category == category)
    }

    /// Ids of every folder above a node, nearest first.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut current = id.to_string();
        while let Some(parent) = self
            .edges_to(&current)
            .into_iter()
            .find(|e| e.category == EdgeCategory::Tree)
            .map(|e| e.source.clone())
        {
            ancestors.push(parent.clone());
            current = parent;
        }
        ancestors
    }

    /// Split into owned node and edge lists, preserving order.
    pub fn into_parts(self) -> (Vec<RepoNode>, Vec<RepoEdge>) {
        let mut inner = self.inner;
        let edges = inner
            .edge_indices()
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|idx| inner.remove_edge(idx))
            .collect();
        let nodes = inner
            .node_indices()
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|idx| inner.remove_node(idx))
            .collect();
        (nodes, edges)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
