//! Fund records exchanged with the interaction client

use alloy_primitives::{Address, B256, U256};
use serde::Serialize;

use crate::amount::TokenAmount;
use crate::error::{FundError, FundResult};

/// Entrance fee charged on deposits, paid directly to the recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntranceFee {
    /// Fee rate in basis points
    pub rate_bps: u16,
    /// Fee recipient, defaults to the deploying address
    pub recipient: Option<Address>,
}

impl EntranceFee {
    pub fn new(rate_bps: u16) -> Self {
        Self {
            rate_bps,
            recipient: None,
        }
    }

    pub fn with_recipient(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }
}

/// Parameters for deploying a new fund through the fund deployer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundDeploymentRequest {
    /// Fund owner, defaults to the signer
    pub manager: Option<Address>,
    pub fund_name: String,
    pub fund_symbol: String,
    pub denomination_asset: Address,
    /// Depositors allowed by the whitelist policy; empty means no policy
    pub whitelist: Vec<Address>,
    pub entrance_fee: Option<EntranceFee>,
    /// Shares action timelock in seconds
    pub shares_action_timelock: u64,
}

impl FundDeploymentRequest {
    pub fn new(
        fund_name: impl Into<String>,
        fund_symbol: impl Into<String>,
        denomination_asset: Address,
    ) -> Self {
        Self {
            manager: None,
            fund_name: fund_name.into(),
            fund_symbol: fund_symbol.into(),
            denomination_asset,
            whitelist: Vec::new(),
            entrance_fee: None,
            shares_action_timelock: 0,
        }
    }

    pub fn with_whitelist(mut self, addresses: Vec<Address>) -> Self {
        self.whitelist = addresses;
        self
    }

    pub fn with_entrance_fee(mut self, fee: EntranceFee) -> Self {
        self.entrance_fee = Some(fee);
        self
    }

    pub fn with_manager(mut self, manager: Address) -> Self {
        self.manager = Some(manager);
        self
    }

    pub fn validate(&self) -> FundResult<()> {
        if self.fund_name.trim().is_empty() {
            return Err(FundError::InvalidRequest("fund name must not be empty".into()));
        }
        if self.fund_symbol.trim().is_empty() {
            return Err(FundError::InvalidRequest("fund symbol must not be empty".into()));
        }
        if self.denomination_asset.is_zero() {
            return Err(FundError::InvalidRequest(
                "denomination asset must not be the zero address".into(),
            ));
        }
        if let Some(fee) = &self.entrance_fee {
            if fee.rate_bps == 0 || fee.rate_bps >= 10_000 {
                return Err(FundError::InvalidRequest(format!(
                    "entrance fee rate {} bps not in (0, 10000)",
                    fee.rate_bps
                )));
            }
        }
        Ok(())
    }
}

/// Identity of a deployed fund
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundHandle {
    pub vault_proxy: Address,
    pub comptroller_proxy: Address,
}

/// Outcome of a value-returning best-effort operation
///
/// Failures do not abort the caller but are kept so they can be logged or shown.
#[derive(Debug, Clone, PartialEq)]
pub enum BestEffort<T> {
    Completed(T),
    Skipped(FundError),
}

impl<T> BestEffort<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            BestEffort::Completed(value) => Some(value),
            BestEffort::Skipped(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FundError> {
        match self {
            BestEffort::Completed(_) => None,
            BestEffort::Skipped(err) => Some(err),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, BestEffort::Completed(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            BestEffort::Completed(value) => Some(value),
            BestEffort::Skipped(_) => None,
        }
    }
}

impl<T> From<FundResult<T>> for BestEffort<T> {
    fn from(result: FundResult<T>) -> Self {
        match result {
            Ok(value) => BestEffort::Completed(value),
            Err(err) => BestEffort::Skipped(err),
        }
    }
}

/// On-chain address list used by the deposit whitelist policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressList {
    pub list_id: U256,
    pub members: Vec<Address>,
}

/// Result of a confirmed fund deployment
#[derive(Debug, Clone, PartialEq)]
pub struct FundDeployment {
    pub tx_hash: B256,
    pub handle: FundHandle,
    /// Whitelist list attached to the fund; `None` when none was requested
    pub whitelist: Option<BestEffort<AddressList>>,
}

/// Fund state read fresh from the vault and comptroller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSnapshot {
    pub name: String,
    pub symbol: String,
    pub total_shares: TokenAmount,
    /// Gross asset value
    pub total_assets: TokenAmount,
    /// Gross share value (NAV per share)
    pub share_price: TokenAmount,
    pub denomination_asset: Address,
    pub vault_proxy: Address,
    pub comptroller_proxy: Address,
}

/// Approval granted by `owner` to `spender` on `token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAllowanceState {
    pub owner: Address,
    pub spender: Address,
    pub token: Address,
    pub allowance: TokenAmount,
}

impl TokenAllowanceState {
    pub fn decimals(&self) -> u8 {
        self.allowance.decimals()
    }
}
