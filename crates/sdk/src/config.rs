use std::fs;
use std::path::Path;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Client configuration loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SdkConfig {
    /// JSON-RPC endpoint of the chain
    pub rpc_url: String,

    /// Protocol contracts of a single release
    pub addresses: ProtocolAddresses,

    /// Gas and slippage settings
    #[serde(default)]
    pub gas: GasConfig,
}

/// Contract addresses of one protocol release
///
/// The fee and policy modules must belong to the same release as the fund
/// deployer, otherwise the deployment probes reject them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProtocolAddresses {
    pub fund_deployer: Address,
    pub address_list_registry: Address,
    pub entrance_rate_direct_fee: Address,
    pub allowed_deposit_recipients_policy: Address,

    /// Extension reached through `callOnExtension` for adapter calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_manager: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniswap_v2_adapter: Option<Address>,
}

/// Gas allowances and default slippage
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Margin added to the deployment estimate (percent)
    pub deployment_margin_percent: u64,

    /// Fixed gas limit for address list creation
    pub address_list_gas_limit: u64,

    /// Fixed gas limit for extension calls
    pub extension_call_gas_limit: u64,

    /// Default tolerated shortfall of received shares (basis points)
    pub default_slippage_bps: u16,
}

impl SdkConfig {
    pub fn new(rpc_url: impl Into<String>, addresses: ProtocolAddresses) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            addresses,
            gas: GasConfig::default(),
        }
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: SdkConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::invalid("rpc_url", "empty", "a JSON-RPC endpoint"));
        }

        self.addresses.validate()?;
        self.gas.validate()?;

        Ok(())
    }
}

impl ProtocolAddresses {
    fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("fund_deployer", self.fund_deployer),
            ("address_list_registry", self.address_list_registry),
            ("entrance_rate_direct_fee", self.entrance_rate_direct_fee),
            (
                "allowed_deposit_recipients_policy",
                self.allowed_deposit_recipients_policy,
            ),
        ];
        for (field, address) in required {
            if address.is_zero() {
                return Err(ConfigError::invalid(field, "0x0", "a deployed contract address"));
            }
        }
        Ok(())
    }
}

impl GasConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.deployment_margin_percent > 100 {
            return Err(ConfigError::invalid(
                "deployment_margin_percent",
                &self.deployment_margin_percent.to_string(),
                "at most 100",
            ));
        }

        if self.address_list_gas_limit == 0 {
            return Err(ConfigError::invalid("address_list_gas_limit", "0", "greater than 0"));
        }

        if self.extension_call_gas_limit == 0 {
            return Err(ConfigError::invalid("extension_call_gas_limit", "0", "greater than 0"));
        }

        if self.default_slippage_bps > 10_000 {
            return Err(ConfigError::invalid(
                "default_slippage_bps",
                &self.default_slippage_bps.to_string(),
                "at most 10000 (100%)",
            ));
        }

        Ok(())
    }

    /// Apply the deployment margin to a gas estimate
    pub fn with_deployment_margin(&self, estimate: u64) -> u64 {
        let scaled = estimate as u128 * (100 + self.deployment_margin_percent as u128) / 100;
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            deployment_margin_percent: 20,
            address_list_gas_limit: 5_000_000,
            extension_call_gas_limit: 500_000,
            default_slippage_bps: 100, // 1%
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn addresses() -> ProtocolAddresses {
        ProtocolAddresses {
            fund_deployer: address!("9d2c19a267caa8e8b1b3b9c5ec6d8c1e7d4d9b13"),
            address_list_registry: address!("6d0b3882dd7d1ee3c2c76a4a6d1e1b3d3f1f1f1a"),
            entrance_rate_direct_fee: address!("e7a7b79b3d8a6f6d2b9bbd1a0a0a2b4c5d6e7f80"),
            allowed_deposit_recipients_policy: address!("0a1b2c3d4e5f60718293a4b5c6d7e8f901234567"),
            integration_manager: None,
            uniswap_v2_adapter: None,
        }
    }

    #[test]
    fn test_default_gas_config() {
        let gas = GasConfig::default();
        assert_eq!(gas.deployment_margin_percent, 20);
        assert_eq!(gas.address_list_gas_limit, 5_000_000);
        assert_eq!(gas.extension_call_gas_limit, 500_000);
        assert_eq!(gas.default_slippage_bps, 100);
        assert_eq!(gas.with_deployment_margin(1_000_000), 1_200_000);
        assert_eq!(gas.with_deployment_margin(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_validation() {
        let config = SdkConfig::new("http://localhost:8545", addresses());
        assert!(config.validate().is_ok());

        let mut missing = config.clone();
        missing.addresses.fund_deployer = Address::ZERO;
        assert!(missing.validate().is_err());

        let mut greedy = config.clone();
        greedy.gas.default_slippage_bps = 10_001;
        assert!(greedy.validate().is_err());

        let mut margin = config;
        margin.gas.deployment_margin_percent = 150;
        assert!(margin.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fundhub.toml");

        let mut config = SdkConfig::new("http://localhost:8545", addresses());
        config.addresses.integration_manager =
            Some(address!("31329024f1a3e4a4b3336e0b1dfa74cc3fec633e"));
        config.save(&path).unwrap();

        let loaded = SdkConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_gas_section_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.toml");
        std::fs::write(
            &path,
            r#"
rpc_url = "http://localhost:8545"

[addresses]
fund_deployer = "0x9d2c19a267caa8e8b1b3b9c5ec6d8c1e7d4d9b13"
address_list_registry = "0x6d0b3882dd7d1ee3c2c76a4a6d1e1b3d3f1f1f1a"
entrance_rate_direct_fee = "0xe7a7b79b3d8a6f6d2b9bbd1a0a0a2b4c5d6e7f80"
allowed_deposit_recipients_policy = "0x0a1b2c3d4e5f60718293a4b5c6d7e8f901234567"
"#,
        )
        .unwrap();

        let loaded = SdkConfig::load(&path).unwrap();
        assert_eq!(loaded.gas, GasConfig::default());
        assert_eq!(loaded.addresses.uniswap_v2_adapter, None);
    }
}
