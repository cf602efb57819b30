//! Tactical board server.
//!
//! # Usage
//!
//! ```bash
//! # Serve the board from the current directory on port 10000
//! cargo run -p pitch_server
//!
//! # Custom port, static directory and formation templates
//! cargo run -p pitch_server -- --port 8080 --static-dir public --formations formations.ron
//!
//! # Settings from a file, debug logging
//! cargo run -p pitch_server -- --config server.ron --verbose
//! ```
//!
//! Set `OPENROUTER_KEY` (environment or `.env`) to enable coach remarks and chat.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pitch_server::config::{Overrides, ServerConfig};
use pitch_server::prepare;

#[derive(Parser)]
#[command(name = "pitch_server")]
#[command(about = "Tactical board server: board analysis, coach chat, live relay")]
#[command(version)]
struct Cli {
    /// RON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to listen on
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory served for unmatched paths
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Custom formation template library (RON)
    #[arg(long)]
    formations: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            bind: self.bind,
            port: self.port,
            static_dir: self.static_dir.clone(),
            formations: self.formations.clone(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "debug,hyper=info,reqwest=info"
    } else {
        "info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli).await {
        tracing::error!("Server failed: {err:#}");
        return Err(err);
    }
    Ok(())
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_ron_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_process_env();
    config.apply_overrides(&cli.overrides());

    let (listener, app) = prepare(&config).await?;
    let addr = listener.local_addr().context("listener has no local address")?;
    tracing::info!(
        %addr,
        static_dir = %config.static_dir.display(),
        model = %config.completion.model,
        "Tactical board server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}
