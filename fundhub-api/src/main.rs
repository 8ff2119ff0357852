//! Fundhub API service
//!
//! Serves recorded fund investments, investor summaries and fund statistics.

use anyhow::{Context, Result};
use clap::Parser;
use fundhub_api::{api, ApiServerConfig, InMemoryStore, InvestmentStore};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fundhub-api")]
#[command(about = "Fund investment records API")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "fundhub-api.toml")]
    config: String,

    /// Override bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = std::path::Path::new(&cli.config).exists();
    let mut config = if config_found {
        ApiServerConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load {}", cli.config))?
    } else {
        ApiServerConfig::default()
    };

    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }
    if let Some(bind) = cli.bind {
        config.api.bind_address = bind;
    }
    config.validate()?;

    init_logging(&config);
    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    info!("Starting fundhub API");
    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let store = Arc::new(match &config.storage.snapshot_path {
        Some(path) => InMemoryStore::open(path).await?,
        None => InMemoryStore::new(),
    });

    let server = api::start_server(store.clone() as Arc<dyn InvestmentStore>, &config.api).await?;

    info!("API started. Press Ctrl+C to shutdown.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        _ = server => {
            info!("API server finished");
        }
    }

    store.save().await?;
    info!("Shutting down fundhub API");
    Ok(())
}

fn init_logging(config: &ApiServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "fundhub_api={},tower_http=info",
            config.monitoring.log_level
        )
        .into()
    });

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
