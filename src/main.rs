//! Strata CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Architecture maps, diagrams and schemas for GitHub repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to ./strata.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },
    /// Analyze one repository and print the result as JSON
    Analyze {
        /// github.com/owner/repo URL or owner/repo
        url: String,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Only keep files with an architectural role or a dependency
        #[arg(long)]
        architecture: bool,
    },
    /// Show version
    Version,
}

const CRATES: [&str; 6] = [
    "strata",
    "strata_core",
    "strata_indexer",
    "strata_github",
    "strata_ai",
    "strata_server",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES
            .iter()
            .map(|name| format!("{name}={log_level}"))
            .collect();
        EnvFilter::new(directives.join(","))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("Ignoring .env: {}", err),
    }

    let settings = strata_server::Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port, host, open } => {
            tracing::info!("Strata v{}", env!("CARGO_PKG_VERSION"));
            commands::serve(settings, host, port, open).await
        }
        Commands::Analyze {
            url,
            pretty,
            architecture,
        } => commands::analyze(settings, &url, pretty, architecture).await,
        Commands::Version => {
            println!("Strata v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
