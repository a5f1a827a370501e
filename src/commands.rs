//! CLI command implementations

use anyhow::Context;
use strata_server::{AppState, Settings, StrataServer};

pub async fn serve(
    mut settings: Settings,
    host: Option<String>,
    port: Option<u16>,
    open: bool,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let server = StrataServer::new(settings);
    tracing::info!("Starting Strata server on {}", server.address());

    if open {
        let url = format!("http://{}/api/health", server.address());
        tokio::spawn(async move {
            if let Err(e) = open::that(&url) {
                tracing::warn!("Could not open browser at {}: {}", url, e);
            }
        });
    }

    server.start().await
}

pub async fn analyze(
    settings: Settings,
    url: &str,
    pretty: bool,
    architecture: bool,
) -> anyhow::Result<()> {
    let state = AppState::from_settings(&settings);
    let mut response = state
        .analyzer
        .analyze_url(url)
        .await
        .with_context(|| format!("Failed to analyze {url}"))?;
    if architecture {
        response = response
            .architecture_view()
            .context("Failed to build architecture view")?;
    }

    tracing::info!(
        "{} nodes, {} edges, {} schema entities",
        response.nodes.len(),
        response.edges.len(),
        response.schema_entities.len()
    );

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");
    Ok(())
}
