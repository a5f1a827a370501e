//! Error types shared across the workspace

use thiserror::Error;

/// Structural violations of the graph invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("edge references unknown node: {0}")]
    DanglingEdge(String),

    #[error("overlay references unknown node: {0}")]
    UnknownNode(String),
}

/// Failures surfaced to the caller of an analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Empty or unparseable repository identifier.
    #[error("invalid repository: {0}")]
    InvalidRepository(String),

    /// Metadata or tree retrieval failed.
    #[error("source error: {0}")]
    Source(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("analysis failed: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Whether the failure was caused by the request rather than the system.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AnalysisError::InvalidRepository(_))
    }
}
