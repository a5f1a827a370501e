//! Source collaborator contract

use std::fmt;

use strata_core::{RepoMeta, TreeItem};
use thiserror::Error;

/// `owner/repo` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("invalid API url: {0}")]
    InvalidUrl(String),
}

impl SourceError {
    /// The host answered that the repository or reference does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::Status { status: 404, .. })
    }
}

/// Read access to a hosted repository.
#[async_trait::async_trait]
pub trait RepoSource: Send + Sync {
    async fn get_meta(&self, repo: &RepoId) -> Result<RepoMeta, SourceError>;

    /// Recursive listing at `reference`. Root-level dotfiles are excluded.
    async fn get_tree(&self, repo: &RepoId, reference: &str) -> Result<Vec<TreeItem>, SourceError>;

    /// File text, or an empty string if it could not be fetched.
    async fn get_file_content(&self, repo: &RepoId, path: &str) -> String;

    fn name(&self) -> &str;
}
