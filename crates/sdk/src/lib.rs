/// Fundhub SDK
///
/// Client for funds deployed through an Enzyme-style fund deployer.
/// Provides high-level abstractions for:
/// - Fund deployment with fee and whitelist policy probing
/// - Fund state and position queries
/// - Deposits and redemptions
/// - Token approvals and balances
/// - Address lists and adapter swaps

pub mod calls;
pub mod client;
pub mod config;
pub mod connection;
pub mod contracts;
pub mod error;
pub mod prelude;
pub mod testing;

pub use client::*;
pub use config::*;
pub use connection::{AlloyConnection, CallRequest, ChainConnection, ChainError, ChainReceipt};
pub use error::{classify, ConfigError, ConfigResult, SdkResult};

// Re-export shared fund types
pub use fundhub_types::*;
