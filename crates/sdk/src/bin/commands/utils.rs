// Utility functions for CLI commands

use anyhow::{Context, Result};
use alloy::primitives::Address;
use fundhub_sdk::FundError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging; `RUST_LOG` takes precedence over `level`
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fundhub_sdk={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Parse an address from string
pub fn parse_address(s: &str) -> Result<Address> {
    s.trim()
        .parse()
        .with_context(|| format!("Invalid address: {}", s))
}

/// Parse a comma-separated list of addresses
pub fn parse_addresses(s: &str) -> Result<Vec<Address>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_address)
        .collect()
}

/// Turn a fund error into a CLI failure, treating user rejection as a cancellation
pub fn fail(err: FundError) -> Result<()> {
    if err.is_user_cancellation() {
        warn("Cancelled in wallet");
        return Ok(());
    }
    Err(anyhow::anyhow!(err))
}

/// Print success message
pub fn success(msg: &str) {
    println!("[OK] {}", msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("[INFO] {}", msg);
}

/// Print warning message
pub fn warn(msg: &str) {
    eprintln!("[WARN] {}", msg);
}
