//! HTTP API and analysis orchestration

pub mod config;
pub mod handlers;
pub mod pipeline;
pub mod router;
pub mod state;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use anyhow::Context;

pub use config::{CacheLimit, CacheSettings, ServerSettings, Settings};
pub use pipeline::{AnalysisResponse, AnalysisStats, Analyzer, MermaidDiagrams};
pub use router::create_router;
pub use state::{AppState, CacheReport, Caches};

/// The Strata HTTP server
pub struct StrataServer {
    state: Arc<AppState>,
    config: ServerSettings,
}

impl StrataServer {
    /// Wire the GitHub source, caches and AI provider from settings.
    pub fn new(settings: Settings) -> Self {
        let state = Arc::new(AppState::from_settings(&settings));
        Self {
            state,
            config: settings.server,
        }
    }

    pub fn with_state(state: Arc<AppState>, config: ServerSettings) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> anyhow::Result<()> {
        let address = self.address();
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        tracing::info!("Strata listening on http://{}", listener.local_addr()?);

        axum::serve(listener, create_router(self.state))
            .await
            .context("Server terminated")?;
        Ok(())
    }
}
