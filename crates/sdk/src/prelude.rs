//! Prelude module for common imports

pub use alloy::primitives::{Address, B256, U256};

pub use crate::client::{ApprovalMode, DepositOptions, FundClient, MinShares, SwapOrder};
pub use crate::config::SdkConfig;
pub use crate::connection::{AlloyConnection, ChainConnection};
pub use fundhub_types::{
    BestEffort, EntranceFee, FundDeploymentRequest, FundError, FundHandle, FundSnapshot,
    TokenAmount,
};
