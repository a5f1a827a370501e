//! Illustrative request flow for one API endpoint
//!
//! The sequence is synthesised from the endpoint's direct dependencies and is
//! not a runtime trace.

use std::fmt::Write;

use super::diagram_id;
use crate::graph::Graph;
use crate::model::{RepoNode, Role};

const MAX_SERVICES: usize = 3;
const MAX_MODELS: usize = 2;

struct Participant<'a> {
    alias: String,
    node: &'a RepoNode,
}

impl<'a> Participant<'a> {
    fn new(node: &'a RepoNode) -> Self {
        Participant {
            alias: diagram_id(&node.id, "node"),
            node,
        }
    }
}

/// Render the sequence diagram for `endpoint`.
pub fn sequence_diagram(endpoint: &RepoNode, graph: &Graph) -> String {
    let dependencies: Vec<&RepoNode> = graph
        .edges_from(&endpoint.id)
        .into_iter()
        .filter(|e| e.category.is_dependency())
        .filter_map(|e| graph.node(&e.target))
        .collect();

    let services: Vec<Participant> = dependencies
        .iter()
        .filter(|n| matches!(n.role, Role::Service | Role::Util))
        .take(MAX_SERVICES)
        .map(|n| Participant::new(n))
        .collect();
    let models: Vec<Participant> = dependencies
        .iter()
        .filter(|n| n.role == Role::Model)
        .take(MAX_MODELS)
        .map(|n| Participant::new(n))
        .collect();

    let ep = Participant::new(endpoint);
    let request = match endpoint.api_methods.as_deref() {
        Some(methods) if !methods.is_empty() => format!("{} Request", methods.join(", ")),
        _ => "Request".to_string(),
    };

    let mut out = String::from("sequenceDiagram\n");
    let _ = writeln!(out, "    participant Client");
    for p in std::iter::once(&ep).chain(&services).chain(&models) {
        let _ = writeln!(out, "    participant {} as {}", p.alias, p.node.label);
    }

    let _ = writeln!(out, "    Client->>+{}: {}", ep.alias, request);
    for svc in &services {
        let _ = writeln!(
            out,
            "    {}->>+{}: {}()",
            ep.alias,
            svc.alias,
            traced_functions(endpoint, &svc.node.id)
        );
        for mdl in &models {
            let _ = writeln!(out, "    {}->>+{}: query", svc.alias, mdl.alias);
            let _ = writeln!(out, "    {}-->>-{}: data", mdl.alias, svc.alias);
        }
        let _ = writeln!(out, "    {}-->>-{}: result", svc.alias, ep.alias);
    }
    let _ = writeln!(out, "    {}-->>-Client: Response", ep.alias);
    out
}

/// Up to two functions the endpoint was seen calling on `target`.
fn traced_functions(endpoint: &RepoNode, target: &str) -> String {
    endpoint
        .function_calls
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|trace| trace.target == target)
        .filter(|trace| !trace.functions.is_empty())
        .map(|trace| trace.functions.iter().take(2).cloned().collect::<Vec<_>>().join(", "))
        .unwrap_or_else(|| "process".to_string())
}
