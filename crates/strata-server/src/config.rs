//! Settings file loading

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use strata_ai::ProviderKind;
use strata_core::TtlCache;
use strata_indexer::AnalysisConfig;

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "strata.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub analysis: AnalysisConfig,
    pub cache: CacheSettings,
    pub ai: AiSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7890,
        }
    }
}

/// Size and lifetime of one cache. Both fields are required when a table
/// is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheLimit {
    pub max_entries: usize,
    pub ttl_secs: u64,
}

impl CacheLimit {
    pub const fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self { max_entries, ttl_secs }
    }

    pub fn build<V: Clone>(&self) -> Arc<TtlCache<V>> {
        Arc::new(TtlCache::new(self.max_entries, Duration::from_secs(self.ttl_secs)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Whole analysis results, keyed by `owner/repo`
    pub repos: CacheLimit,
    /// Raw file contents, keyed by `owner/repo/path`
    pub files: CacheLimit,
    /// AI summaries, keyed by content hash
    pub summaries: CacheLimit,
    /// Tree listings, keyed by `owner/repo`
    pub trees: CacheLimit,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            repos: CacheLimit::new(50, 600),
            files: CacheLimit::new(500, 900),
            summaries: CacheLimit::new(200, 1800),
            trees: CacheLimit::new(50, 600),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Force a provider instead of choosing by available API keys.
    pub provider: Option<ProviderKind>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("Invalid settings TOML")
    }

    /// Load `path`, or `strata.toml` in the working directory when it
    /// exists, or the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let settings = Self::from_toml_str(&text)
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                tracing::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(Some(default))
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Token for the GitHub API, from the environment.
    pub fn github_token() -> Option<String> {
        std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}
