//! Error taxonomy for fund operations

use thiserror::Error;

use crate::amount::{AmountError, TokenAmount};

/// Required versus available quantity behind a funds-related failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub required: TokenAmount,
    pub available: TokenAmount,
}

impl Shortfall {
    pub fn new(required: TokenAmount, available: TokenAmount) -> Self {
        Self { required, available }
    }

    /// Amount missing to cover the requirement
    pub fn missing(&self) -> TokenAmount {
        self.required.saturating_sub(&self.available)
    }
}

fn describe(shortfall: &Option<Shortfall>) -> String {
    match shortfall {
        Some(s) => format!(
            "need {}, have {} (short by {})",
            s.required,
            s.available,
            s.missing()
        ),
        None => "reported by the chain".to_string(),
    }
}

fn revert_suffix(reason: &Option<String>) -> String {
    reason.as_ref().map(|r| format!(": {}", r)).unwrap_or_default()
}

/// Coarse grouping used by callers to decide how to surface a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Fee or policy module does not match the factory release
    IncompatibleConfiguration,
    /// Balance, allowance, share or gas shortfall the user can fix
    InsufficientFunds,
    /// The user declined to sign
    UserRejected,
    /// The transaction or simulation reverted
    ExecutionReverted,
    /// The transaction succeeded but its result could not be read
    ResultUnresolved,
    /// Malformed input supplied by the caller
    InvalidInput,
    /// Connection, encoding or provider failure
    Transport,
}

/// Main error type for fund operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FundError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Entrance fee settings rejected by the deployer's dry run
    #[error("Incompatible fee module for this protocol release: {reason}")]
    IncompatibleFeeModule { reason: String },

    /// Deposit whitelist policy rejected by the deployer's dry run
    #[error("Incompatible policy module for this protocol release: {reason}")]
    IncompatiblePolicyModule { reason: String },

    // ========================================================================
    // Funds Errors
    // ========================================================================
    #[error("Insufficient token balance: {}", describe(.shortfall))]
    InsufficientBalance { shortfall: Option<Shortfall> },

    #[error("Insufficient allowance, approve the token first: {}", describe(.shortfall))]
    InsufficientAllowance { shortfall: Option<Shortfall> },

    #[error("Insufficient fund shares: {}", describe(.shortfall))]
    InsufficientShares { shortfall: Option<Shortfall> },

    #[error("Insufficient native balance to pay for gas")]
    InsufficientGasFunds,

    // ========================================================================
    // Signing and Execution Errors
    // ========================================================================
    #[error("Transaction rejected by the user")]
    UserRejected,

    #[error("Execution reverted{}", revert_suffix(.reason))]
    ExecutionReverted { reason: Option<String> },

    /// Deployment confirmed but the NewFundCreated event was missing
    #[error("Could not resolve fund addresses from transaction {tx_hash}")]
    AddressResolutionFailed { tx_hash: String },

    #[error("Event {event} not found in transaction {tx_hash}")]
    EventNotFound { event: String, tx_hash: String },

    // ========================================================================
    // Input Errors
    // ========================================================================
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No signer available on this connection")]
    MissingSigner,

    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),

    // ========================================================================
    // Transport Errors
    // ========================================================================
    #[error("RPC error (code {code:?}): {message}")]
    Rpc { message: String, code: Option<i64> },

    #[error("Failed to decode contract response: {0}")]
    Decode(String),
}

impl FundError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FundError::IncompatibleFeeModule { .. } | FundError::IncompatiblePolicyModule { .. } => {
                ErrorCategory::IncompatibleConfiguration
            }
            FundError::InsufficientBalance { .. }
            | FundError::InsufficientAllowance { .. }
            | FundError::InsufficientShares { .. }
            | FundError::InsufficientGasFunds => ErrorCategory::InsufficientFunds,
            FundError::UserRejected => ErrorCategory::UserRejected,
            FundError::ExecutionReverted { .. } => ErrorCategory::ExecutionReverted,
            FundError::AddressResolutionFailed { .. } | FundError::EventNotFound { .. } => {
                ErrorCategory::ResultUnresolved
            }
            FundError::InvalidAmount(_)
            | FundError::InvalidRequest(_)
            | FundError::MissingSigner
            | FundError::Overflow(_) => ErrorCategory::InvalidInput,
            FundError::Rpc { .. } | FundError::Decode(_) => ErrorCategory::Transport,
        }
    }

    /// A declined signature is a cancellation, not an application failure
    pub fn is_user_cancellation(&self) -> bool {
        matches!(self, FundError::UserRejected)
    }

    /// Only transport failures may be retried automatically
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    pub fn rpc(message: impl Into<String>) -> Self {
        FundError::Rpc {
            message: message.into(),
            code: None,
        }
    }
}

/// Result type alias for fund operations
pub type FundResult<T> = Result<T, FundError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn test_categories() {
        assert_eq!(
            FundError::IncompatibleFeeModule { reason: "x".into() }.category(),
            ErrorCategory::IncompatibleConfiguration
        );
        assert_eq!(
            FundError::AddressResolutionFailed { tx_hash: "0x1".into() }.category(),
            ErrorCategory::ResultUnresolved
        );
        assert_ne!(
            FundError::AddressResolutionFailed { tx_hash: "0x1".into() }.category(),
            FundError::ExecutionReverted { reason: None }.category()
        );
        assert!(FundError::UserRejected.is_user_cancellation());
        assert!(FundError::rpc("timeout").is_retryable());
        assert!(!FundError::ExecutionReverted { reason: None }.is_retryable());
    }

    #[test]
    fn test_shortfall_message() {
        let err = FundError::InsufficientBalance {
            shortfall: Some(Shortfall::new(
                TokenAmount::new(U256::from(1_500_000u64), 6),
                TokenAmount::new(U256::from(1_000_000u64), 6),
            )),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient token balance: need 1.5, have 1.0 (short by 0.5)"
        );
    }

    #[test]
    fn test_revert_message() {
        let err = FundError::ExecutionReverted {
            reason: Some("__preBuySharesHook: Sender not allowed".into()),
        };
        assert_eq!(
            err.to_string(),
            "Execution reverted: __preBuySharesHook: Sender not allowed"
        );
        assert_eq!(
            FundError::ExecutionReverted { reason: None }.to_string(),
            "Execution reverted"
        );
    }
}
