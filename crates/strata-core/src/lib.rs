//! Strata core: repository graph model, layout, diagrams, and caching

pub mod cache;
pub mod diagrams;
pub mod error;
pub mod graph;
pub mod layout;
pub mod model;


pub use cache::{CacheStats, TtlCache, content_hash};
pub use diagrams::{Diagrams, generate_diagrams, sanitize_id};
pub use error::{AnalysisError, GraphError};
pub use graph::Graph;
pub use layout::{LayoutConfig, apply_layout, compute_layout, node_size};
pub use model::{
    CallTrace, EdgeCategory, ItemKind, Language, NodeKind, Position, RepoEdge, RepoMeta, RepoNode,
    Role, SchemaEntity, SchemaField, TreeItem, basename, parent_path,
};
