//! Provider contract and the cached, fallible-provider front end

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use strata_core::{TtlCache, content_hash};

use crate::providers::local::LocalProvider;

/// Short description of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileSummary {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub exports: Vec<String>,
    /// Model output uses `apiCalls`.
    #[serde(default, alias = "apiCalls")]
    pub api_calls: Vec<String>,
}

/// A file handed to the connection explainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub path: String,
    pub content: String,
}

/// LLM backend.
#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
    /// Describe what a file does.
    async fn summarize_file(&self, content: &str, filename: &str) -> Result<FileSummary>;

    /// Explain how two files relate, as Markdown prose.
    async fn explain_connection(&self, file_a: &FileRef, file_b: &FileRef) -> Result<String>;

    /// Get provider name
    fn name(&self) -> &str;
}

pub(crate) const EXPLAIN_FAILED: &str = "Failed to generate AI explanation. Please try again.";

/// Front end used by the server: summaries are cached by content hash and
/// provider failures degrade instead of surfacing.
pub struct AiBridge {
    provider: Box<dyn AiProvider>,
    summaries: Arc<TtlCache<FileSummary>>,
}

impl AiBridge {
    pub fn new(provider: Box<dyn AiProvider>, summaries: Arc<TtlCache<FileSummary>>) -> Self {
        Self { provider, summaries }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn summarize(&self, content: &str, filename: &str) -> FileSummary {
        let key = content_hash(content);
        if let Some(summary) = self.summaries.get(&key) {
            tracing::info!("Summary cache hit: {}", filename);
            return summary;
        }

        let summary = match self.provider.summarize_file(content, filename).await {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!("{} summary failed for {}: {:#}", self.provider.name(), filename, err);
                LocalProvider::basic_summary(content, filename)
            }
        };
        self.summaries.set(key, summary.clone());
        tracing::info!("Summary cached: {}", filename);
        summary
    }

    pub async fn explain(&self, file_a: &FileRef, file_b: &FileRef) -> String {
        match self.provider.explain_connection(file_a, file_b).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    "{} could not explain {} -> {}: {:#}",
                    self.provider.name(),
                    file_a.path,
                    file_b.path,
                    err
                );
                EXPLAIN_FAILED.to_string()
            }
        }
    }
}
