//! Mermaid renderings of the repository graph and schema

pub mod architecture;
pub mod erd;
pub mod sequence;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::model::{NodeKind, SchemaEntity};

pub use architecture::architecture_diagram;
pub use erd::erd_diagram;
pub use sequence::sequence_diagram;

/// Every diagram produced for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagrams {
    /// Flowchart of import/call dependencies. Empty when there are none.
    pub architecture: String,
    /// Sequence diagram per API node, keyed by node id.
    pub sequences: BTreeMap<String, String>,
    /// Entity-relationship diagram. Empty when no entities were parsed.
    pub erd: String,
}

/// Render all diagrams for a finished graph.
pub fn generate_diagrams(graph: &Graph, entities: &[SchemaEntity]) -> Diagrams {
    let sequences = graph
        .nodes()
        .filter(|n| n.kind == NodeKind::Api)
        .map(|n| (n.id.clone(), sequence_diagram(n, graph)))
        .collect();
    Diagrams {
        architecture: architecture_diagram(graph),
        sequences,
        erd: erd_diagram(entities),
    }
}

/// Reduce an identifier to `[A-Za-z0-9_]`, trimming leading and trailing
/// underscores.
pub fn sanitize_id(id: &str) -> String {
    let replaced: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    replaced.trim_matches('_').to_string()
}

/// `sanitize_id`, falling back to `fallback` when nothing survives.
pub(crate) fn sanitize_or(id: &str, fallback: &str) -> String {
    let clean = sanitize_id(id);
    if clean.is_empty() {
        fallback.to_string()
    } else {
        clean
    }
}

/// Words the flowchart and sequence grammars treat as keywords, plus the
/// fixed `Client` participant.
const RESERVED: [&str; 26] = [
    "end", "graph", "flowchart", "subgraph", "direction", "style", "linkStyle", "class",
    "classDef", "click", "call", "href", "default", "participant", "actor", "loop", "alt",
    "opt", "else", "par", "and", "rect", "note", "critical", "break", "client",
];

/// Node identifier for flowchart and sequence diagrams: `sanitize_or`, with
/// `n_` prepended when the result is a keyword.
pub(crate) fn diagram_id(id: &str, fallback: &str) -> String {
    let clean = sanitize_or(id, fallback);
    if RESERVED.iter().any(|word| word.eq_ignore_ascii_case(&clean)) {
        format!("n_{clean}")
    } else {
        clean
    }
}

/// Entity, attribute type, or attribute name for an ER diagram. These must
/// not start with a digit.
pub(crate) fn erd_token(text: &str, fallback: &str) -> String {
    let clean = sanitize_or(text, fallback);
    if clean.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{clean}")
    } else {
        clean
    }
}

/// Escape characters that terminate a quoted label or an edge label.
pub(crate) fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;").replace('|', "#124;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_id() {
        assert_eq!(sanitize_id("src/services/user.ts"), "src_services_user_ts");
        assert_eq!(sanitize_id("./lib/[id].ts"), "lib__id__ts");
        assert_eq!(sanitize_id("__init__.py"), "init___py");
        assert_eq!(sanitize_id("..."), "");
    }

    #[test]
    fn test_sanitize_or_falls_back() {
        assert_eq!(sanitize_or("---", "node"), "node");
        assert_eq!(sanitize_or("a-b", "node"), "a_b");
    }

    #[test]
    fn test_diagram_id_avoids_keywords() {
        assert_eq!(diagram_id("scripts/end", "node"), "scripts_end");
        assert_eq!(diagram_id("end", "node"), "n_end");
        assert_eq!(diagram_id("End", "node"), "n_End");
        assert_eq!(diagram_id("client", "node"), "n_client");
        assert_eq!(diagram_id("src/end.ts", "node"), "src_end_ts");
    }

    #[test]
    fn test_erd_token_never_starts_with_digit() {
        assert_eq!(erd_token("1x", "unknown"), "_1x");
        assert_eq!(erd_token("2fa_secret", "field"), "_2fa_secret");
        assert_eq!(erd_token("VARCHAR", "unknown"), "VARCHAR");
        assert_eq!(erd_token("--", "unknown"), "unknown");
    }

    #[test]
    fn test_generate_diagrams_on_empty_input() {
        let diagrams = generate_diagrams(&Graph::new(), &[]);
        assert_eq!(diagrams, Diagrams::default());
    }
}
