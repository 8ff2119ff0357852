// Command modules for fundhub CLI

pub mod fund;
pub mod invest;
pub mod list;
pub mod swap;
pub mod token;
pub mod utils;

use anyhow::{Context as _, Result};
use fundhub_sdk::{AlloyConnection, FundClient, SdkConfig};

/// Client and connection settings shared by every command
pub struct Context {
    pub client: FundClient,
    rpc_url: String,
    private_key: Option<String>,
}

impl Context {
    pub fn load(config_path: &str, rpc_url: Option<&str>, private_key: Option<String>) -> Result<Self> {
        let mut config = SdkConfig::load(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path))?;
        if let Some(url) = rpc_url {
            config.rpc_url = url.to_string();
        }

        Ok(Self {
            rpc_url: config.rpc_url.clone(),
            client: FundClient::new(config),
            private_key,
        })
    }

    /// Connection that can only read
    pub fn reader(&self) -> Result<AlloyConnection> {
        AlloyConnection::read_only(&self.rpc_url).context("Failed to connect to RPC")
    }

    /// Connection signing with the configured private key
    pub fn signer(&self) -> Result<AlloyConnection> {
        let key = self
            .private_key
            .as_deref()
            .context("A private key is required (--private-key or FUNDHUB_PRIVATE_KEY)")?;
        AlloyConnection::with_private_key(&self.rpc_url, key).context("Failed to load signer")
    }
}
