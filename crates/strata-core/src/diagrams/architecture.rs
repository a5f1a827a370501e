//! Flowchart of file-level dependencies

use std::collections::HashSet;
use std::fmt::Write;

use super::{diagram_id, escape_label};
use crate::graph::Graph;
use crate::model::Role;

const CLASS_DEFS: [&str; 6] = [
    "classDef entry fill:#22c55e,stroke:#16a34a,color:#fff",
    "classDef controller fill:#3b82f6,stroke:#2563eb,color:#fff",
    "classDef api fill:#a855f7,stroke:#9333ea,color:#fff",
    "classDef service fill:#06b6d4,stroke:#0891b2,color:#fff",
    "classDef model fill:#f97316,stroke:#ea580c,color:#fff",
    "classDef util fill:#6b7280,stroke:#4b5563,color:#fff",
];

fn role_class(role: Role) -> Option<&'static str> {
    match role {
        Role::Entry => Some("entry"),
        Role::Controller => Some("controller"),
        Role::Api => Some("api"),
        Role::Service => Some("service"),
        Role::Model => Some("model"),
        Role::Util => Some("util"),
        _ => None,
    }
}

/// Render nodes that take part in an import or call edge, and those edges.
///
/// Returns an empty string when the graph has no dependency edges.
pub fn architecture_diagram(graph: &Graph) -> String {
    let connected: HashSet<&str> = graph
        .dependency_edges()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();
    if connected.is_empty() {
        return String::new();
    }

    let mut out = String::from("graph TD\n");
    for def in CLASS_DEFS {
        let _ = writeln!(out, "    {def}");
    }

    for node in graph.nodes().filter(|n| connected.contains(n.id.as_str())) {
        let style = role_class(node.role)
            .map(|class| format!(":::{class}"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "    {}[\"{}\"]{}",
            diagram_id(&node.id, "node"),
            escape_label(&node.label),
            style
        );
    }

    for edge in graph.dependency_edges() {
        let label = edge.label.as_deref().unwrap_or("imports");
        let _ = writeln!(
            out,
            "    {} -->|{}| {}",
            diagram_id(&edge.source, "node"),
            escape_label(label),
            diagram_id(&edge.target, "node")
        );
    }

    out
}
