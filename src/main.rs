use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ufo_fold::{BridgeServer, Config};

// One logical thread: commands and mutation events interleave only at await points
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let log_path = setup_logging(&config)?;

    info!("Starting ufo-fold bridge (log: {})", log_path.display());

    let server = BridgeServer::new(config, tokio::io::stdout());
    server.run(tokio::io::stdin()).await?;

    info!("ufo-fold bridge shutting down");
    Ok(())
}

/// stdout carries the channel, so logs go to a file
fn setup_logging(config: &Config) -> Result<PathBuf> {
    let log_path = config.log_file();
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let filter = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| config.log.filter.clone())
        .unwrap_or_else(|| "ufo_fold=debug,info".to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(fmt::layer().with_writer(Arc::new(log_file)).with_ansi(false))
        .init();

    Ok(log_path)
}
