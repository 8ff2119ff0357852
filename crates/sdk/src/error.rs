use fundhub_types::FundError;
use thiserror::Error;

use crate::connection::ChainError;

/// Result type for client operations
pub type SdkResult<T> = Result<T, FundError>;

/// EIP-1193 code for a request the user declined in the wallet
pub const USER_REJECTED_CODE: i64 = 4001;

/// Map a raw chain failure onto the fund error taxonomy
///
/// Revert strings carry the underlying token error, so the balance checks run
/// before the generic revert match.
pub fn classify(err: &ChainError) -> FundError {
    let message = err.message.to_ascii_lowercase();

    if err.code == Some(USER_REJECTED_CODE)
        || message.contains("user rejected")
        || message.contains("user denied")
    {
        return FundError::UserRejected;
    }
    if message.contains("burn amount exceeds balance") {
        return FundError::InsufficientShares { shortfall: None };
    }
    if message.contains("transfer amount exceeds balance") {
        return FundError::InsufficientBalance { shortfall: None };
    }
    if message.contains("insufficient allowance") {
        return FundError::InsufficientAllowance { shortfall: None };
    }
    if message.contains("insufficient funds") {
        return FundError::InsufficientGasFunds;
    }
    if let Some(pos) = message.find("execution reverted") {
        let rest = err.message[pos + "execution reverted".len()..]
            .trim_start_matches(':')
            .trim();
        return FundError::ExecutionReverted {
            reason: (!rest.is_empty()).then(|| rest.to_string()),
        };
    }

    FundError::Rpc {
        message: err.message.clone(),
        code: err.code,
    }
}

impl From<ChainError> for FundError {
    fn from(err: ChainError) -> Self {
        classify(&err)
    }
}

/// Failure to decode a contract response
pub(crate) fn decode_error(err: alloy::sol_types::Error) -> FundError {
    FundError::Decode(err.to_string())
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Invalid parameter {field}: got {value}, expected {expected}")]
    InvalidParameter {
        field: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    pub fn invalid(field: &str, value: &str, expected: &str) -> Self {
        ConfigError::InvalidParameter {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(message: &str, code: Option<i64>) -> ChainError {
        ChainError {
            message: message.to_string(),
            code,
        }
    }

    #[test]
    fn test_classify_wallet_and_funds_errors() {
        assert_eq!(classify(&chain("whatever", Some(4001))), FundError::UserRejected);
        assert_eq!(
            classify(&chain("User rejected the request.", None)),
            FundError::UserRejected
        );
        assert_eq!(
            classify(&chain(
                "execution reverted: ERC20: transfer amount exceeds balance",
                Some(3)
            )),
            FundError::InsufficientBalance { shortfall: None }
        );
        assert_eq!(
            classify(&chain("execution reverted: ERC20: insufficient allowance", Some(3))),
            FundError::InsufficientAllowance { shortfall: None }
        );
        assert_eq!(
            classify(&chain("execution reverted: ERC20: burn amount exceeds balance", None)),
            FundError::InsufficientShares { shortfall: None }
        );
        assert_eq!(
            classify(&chain("insufficient funds for gas * price + value", Some(-32000))),
            FundError::InsufficientGasFunds
        );
    }

    #[test]
    fn test_classify_reverts_and_transport() {
        assert_eq!(
            classify(&chain("execution reverted: __preBuySharesHook: Rule evaluated to false", Some(3))),
            FundError::ExecutionReverted {
                reason: Some("__preBuySharesHook: Rule evaluated to false".to_string())
            }
        );
        assert_eq!(
            classify(&chain("execution reverted", Some(3))),
            FundError::ExecutionReverted { reason: None }
        );
        let transport = classify(&chain("connection refused", None));
        assert!(transport.is_retryable());
    }
}
