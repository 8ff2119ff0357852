//! Configuration for the fundhub API service

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiServerConfig {
    #[validate]
    pub api: ApiConfig,
    #[validate]
    pub storage: StorageConfig,
    #[validate]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_address: String,
    pub enable_cors: bool,
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file the in-memory store is loaded from and saved to
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            enable_cors: true,
            request_timeout_secs: 30,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl ApiServerConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self)?;

        if self.api.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(anyhow::anyhow!(
                "Invalid bind address: {}",
                self.api.bind_address
            ));
        }
        if self.monitoring.log_level.parse::<tracing::Level>().is_err() {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}",
                self.monitoring.log_level
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiServerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.storage.snapshot_path.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbind_address = \"0.0.0.0:9000\"\n\n[storage]\nsnapshot_path = \"/tmp/investments.json\""
        )
        .unwrap();

        let config = ApiServerConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.api.bind_address, "0.0.0.0:9000");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(
            config.storage.snapshot_path,
            Some(PathBuf::from("/tmp/investments.json"))
        );
        assert_eq!(config.monitoring.log_level, "info");
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut config = ApiServerConfig::default();
        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ApiServerConfig::default();
        config.monitoring.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = ApiServerConfig::default();
        config.api.bind_address = "localhost".to_string();
        assert!(config.validate().is_err());
    }
}
