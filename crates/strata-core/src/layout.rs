//! Left-to-right layered layout
//!
//! Ranks come from the longest path over the graph's strongly connected
//! components, so cycles collapse into a single rank. Within a rank nodes are
//! ordered by the mean position of their predecessors, falling back to
//! insertion order. The result depends only on the node and edge order.

use std::collections::HashMap;

use petgraph::algo::{condensation, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::model::{NodeKind, Position, RepoNode};

/// Spacing parameters, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical gap between nodes sharing a rank.
    pub node_sep: f64,
    /// Horizontal gap between ranks.
    pub rank_sep: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            node_sep: 60.0,
            rank_sep: 200.0,
            margin_x: 40.0,
            margin_y: 40.0,
        }
    }
}

/// Rendered box size of a node.
pub fn node_size(node: &RepoNode) -> (f64, f64) {
    let width = (node.label.chars().count() as f64 * 9.0 + 80.0).max(160.0);
    let height = if node.kind == NodeKind::Api { 70.0 } else { 55.0 };
    (width, height)
}

/// Compute a top-left position for every node in the graph.
pub fn compute_layout(graph: &Graph, config: &LayoutConfig) -> HashMap<String, Position> {
    let nodes: Vec<&RepoNode> = graph.nodes().collect();
    if nodes.is_empty() {
        return HashMap::new();
    }

    let mut dag: DiGraph<usize, ()> = DiGraph::new();
    let mut index_of: HashMap<&str, NodeIndex> = HashMap::new();
    for (order, node) in nodes.iter().enumerate() {
        index_of.insert(node.id.as_str(), dag.add_node(order));
    }
    for edge in graph.edges() {
        if let (Some(&s), Some(&t)) = (
            index_of.get(edge.source.as_str()),
            index_of.get(edge.target.as_str()),
        ) {
            dag.add_edge(s, t, ());
        }
    }

    let ranks = assign_ranks(&dag, nodes.len());

    let mut columns: Vec<Vec<usize>> = Vec::new();
    for (order, &rank) in ranks.iter().enumerate() {
        if columns.len() <= rank {
            columns.resize(rank + 1, Vec::new());
        }
        columns[rank].push(order);
    }

    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in dag.raw_edges() {
        let (s, t) = (dag[edge.source()], dag[edge.target()]);
        if ranks[s] < ranks[t] {
            predecessors[t].push(s);
        }
    }

    let mut slot: Vec<f64> = vec![0.0; nodes.len()];
    let mut positions = HashMap::with_capacity(nodes.len());
    let mut x = config.margin_x;

    for column in &mut columns {
        let mut keyed: Vec<(f64, usize)> = column
            .iter()
            .map(|&order| {
                let preds = &predecessors[order];
                let key = if preds.is_empty() {
                    f64::MAX
                } else {
                    preds.iter().map(|&p| slot[p]).sum::<f64>() / preds.len() as f64
                };
                (key, order)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        *column = keyed.into_iter().map(|(_, order)| order).collect();

        let mut y = config.margin_y;
        let mut widest: f64 = 0.0;
        for (i, &order) in column.iter().enumerate() {
            let node = nodes[order];
            let (width, height) = node_size(node);
            slot[order] = i as f64;
            positions.insert(node.id.clone(), Position { x, y });
            y += height + config.node_sep;
            widest = widest.max(width);
        }
        x += widest + config.rank_sep;
    }

    positions
}

/// Longest-path rank of every node, indexed by insertion order.
fn assign_ranks(dag: &DiGraph<usize, ()>, len: usize) -> Vec<usize> {
    let condensed = condensation(dag.clone(), true);
    let mut ranks = vec![0usize; len];

    let Ok(order) = toposort(&condensed, None) else {
        tracing::warn!("condensed graph was cyclic; placing every node in rank 0");
        return ranks;
    };

    let mut component_rank = vec![0usize; condensed.node_count()];
    for component in order {
        let rank = condensed
            .neighbors_directed(component, petgraph::Direction::Incoming)
            .map(|pred| component_rank[pred.index()] + 1)
            .max()
            .unwrap_or(0);
        component_rank[component.index()] = rank;
        for &member in &condensed[component] {
            ranks[member] = rank;
        }
    }
    ranks
}

/// Write positions from `compute_layout` into the graph.
pub fn apply_layout(graph: &mut Graph, config: &LayoutConfig) {
    let positions = compute_layout(graph, config);
    for (id, position) in positions {
        if let Some(node) = graph.node_mut(&id) {
            node.position = Some(position);
        }
    }
}
