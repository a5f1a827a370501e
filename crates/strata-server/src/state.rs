//! Shared server state

use std::sync::Arc;

use serde::Serialize;
use strata_ai::{AiBridge, FileSummary, provider_from_env};
use strata_core::{CacheStats, TreeItem, TtlCache};
use strata_github::{CachedSource, GitHubSource};

use crate::config::{CacheSettings, Settings};
use crate::pipeline::{AnalysisResponse, Analyzer};

/// Cache handles shared by every request.
#[derive(Clone)]
pub struct Caches {
    pub repos: Arc<TtlCache<AnalysisResponse>>,
    pub files: Arc<TtlCache<String>>,
    pub summaries: Arc<TtlCache<FileSummary>>,
    pub trees: Arc<TtlCache<Vec<TreeItem>>>,
}

/// Occupancy of every cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheReport {
    pub repo: CacheStats,
    pub file: CacheStats,
    pub summary: CacheStats,
    pub tree: CacheStats,
}

impl Caches {
    pub fn new(settings: &CacheSettings) -> Self {
        Self {
            repos: settings.repos.build(),
            files: settings.files.build(),
            summaries: settings.summaries.build(),
            trees: settings.trees.build(),
        }
    }

    pub fn report(&self) -> CacheReport {
        CacheReport {
            repo: self.repos.stats(),
            file: self.files.stats(),
            summary: self.summaries.stats(),
            tree: self.trees.stats(),
        }
    }
}

pub struct AppState {
    pub analyzer: Analyzer,
    pub ai: AiBridge,
    pub caches: Caches,
}

impl AppState {
    pub fn new(analyzer: Analyzer, ai: AiBridge, caches: Caches) -> Self {
        Self {
            analyzer,
            ai,
            caches,
        }
    }

    /// GitHub behind the tree and file caches, with the AI provider picked
    /// from the environment.
    pub fn from_settings(settings: &Settings) -> Self {
        let caches = Caches::new(&settings.cache);
        let github = GitHubSource::new(Settings::github_token());
        let source = CachedSource::new(github, Arc::clone(&caches.trees), Arc::clone(&caches.files));
        let analyzer = Analyzer::new(
            Arc::new(source),
            Arc::clone(&caches.repos),
            settings.analysis.clone(),
        );
        let ai = AiBridge::new(
            provider_from_env(settings.ai.provider),
            Arc::clone(&caches.summaries),
        );
        Self::new(analyzer, ai, caches)
    }
}
