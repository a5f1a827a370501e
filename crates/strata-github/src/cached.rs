//! Caching decorator for any [`RepoSource`]

use std::sync::Arc;

use strata_core::{RepoMeta, TreeItem, TtlCache};

use crate::source::{RepoId, RepoSource, SourceError};

/// Serves trees and file contents from shared caches before asking the
/// wrapped source. Metadata is always fetched fresh.
pub struct CachedSource<S> {
    inner: S,
    trees: Arc<TtlCache<Vec<TreeItem>>>,
    files: Arc<TtlCache<String>>,
}

impl<S: RepoSource> CachedSource<S> {
    pub fn new(inner: S, trees: Arc<TtlCache<Vec<TreeItem>>>, files: Arc<TtlCache<String>>) -> Self {
        Self { inner, trees, files }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<S: RepoSource> RepoSource for CachedSource<S> {
    async fn get_meta(&self, repo: &RepoId) -> Result<RepoMeta, SourceError> {
        self.inner.get_meta(repo).await
    }

    async fn get_tree(&self, repo: &RepoId, reference: &str) -> Result<Vec<TreeItem>, SourceError> {
        let key = repo.to_string();
        if let Some(tree) = self.trees.get(&key) {
            tracing::debug!("Tree cache hit: {}", key);
            return Ok(tree);
        }
        let tree = self.inner.get_tree(repo, reference).await?;
        self.trees.set(key, tree.clone());
        Ok(tree)
    }

    async fn get_file_content(&self, repo: &RepoId, path: &str) -> String {
        let key = format!("{repo}/{path}");
        if let Some(content) = self.files.get(&key) {
            return content;
        }
        let content = self.inner.get_file_content(repo, path).await;
        // Failed fetches come back empty; leave them uncached so they can be retried.
        if !content.is_empty() {
            self.files.set(key, content.clone());
        }
        content
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
