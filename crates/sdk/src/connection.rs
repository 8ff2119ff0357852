//! Chain connection port and its alloy-backed adapter
//!
//! Every client operation receives a connection explicitly. The connection
//! owns the transport and, when it can sign, the account that submits
//! transactions; the client itself holds no wallet state.

use std::fmt;

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, Bytes, Log, B256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use alloy::transports::TransportError;
use async_trait::async_trait;
use tracing::debug;

/// Raw failure reported by the node, the wallet or the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainError {
    pub message: String,
    /// JSON-RPC or wallet error code when one was returned
    pub code: Option<i64>,
}

impl ChainError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<TransportError> for ChainError {
    fn from(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => ChainError::with_code(payload.message.to_string(), payload.code),
            None => ChainError::new(err.to_string()),
        }
    }
}

/// A contract call or transaction to be simulated or submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub input: Bytes,
    pub gas_limit: Option<u64>,
}

impl CallRequest {
    pub fn new(to: Address, input: impl Into<Bytes>) -> Self {
        Self {
            from: None,
            to,
            input: input.into(),
            gas_limit: None,
        }
    }

    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Function selector of the encoded call, if present
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.input.get(..4).and_then(|s| s.try_into().ok())
    }

    fn to_transaction(&self) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .to(self.to)
            .input(self.input.clone().into());
        if let Some(from) = self.from {
            tx = tx.from(from);
        }
        if let Some(gas_limit) = self.gas_limit {
            tx = tx.gas_limit(gas_limit);
        }
        tx
    }
}

/// Confirmed transaction as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReceipt {
    pub tx_hash: B256,
    /// `false` when the transaction reverted on-chain
    pub success: bool,
    pub logs: Vec<Log>,
}

/// Connection to a chain through a node and, optionally, a signer
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// Account that signs submitted transactions
    fn account(&self) -> Option<Address>;

    /// Read-only call against the latest block
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError>;

    /// Dry-run a transaction and return its gas cost; fails when it would revert
    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError>;

    /// Sign and broadcast a transaction
    async fn send_transaction(&self, request: CallRequest) -> Result<B256, ChainError>;

    /// Block until the transaction is included
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ChainReceipt, ChainError>;
}

/// Connection over an alloy HTTP provider
#[derive(Clone)]
pub struct AlloyConnection {
    provider: DynProvider,
    account: Option<Address>,
}

impl AlloyConnection {
    /// Connection that can only read
    pub fn read_only(rpc_url: &str) -> Result<Self, ChainError> {
        let url = parse_url(rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self {
            provider,
            account: None,
        })
    }

    /// Connection that signs with a local private key
    pub fn with_signer(rpc_url: &str, signer: PrivateKeySigner) -> Result<Self, ChainError> {
        let url = parse_url(rpc_url)?;
        let account = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();
        Ok(Self {
            provider,
            account: Some(account),
        })
    }

    /// Connection that signs with a hex-encoded private key
    pub fn with_private_key(rpc_url: &str, private_key: &str) -> Result<Self, ChainError> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| ChainError::new(format!("invalid private key: {}", e)))?;
        Self::with_signer(rpc_url, signer)
    }
}

fn parse_url(rpc_url: &str) -> Result<Url, ChainError> {
    rpc_url
        .parse()
        .map_err(|e| ChainError::new(format!("invalid RPC url {}: {}", rpc_url, e)))
}

#[async_trait]
impl ChainConnection for AlloyConnection {
    fn account(&self) -> Option<Address> {
        self.account
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError> {
        let tx = CallRequest::new(to, input).to_transaction();
        Ok(self.provider.call(tx).await?)
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError> {
        let gas = self.provider.estimate_gas(request.to_transaction()).await?;
        debug!("Estimated {} gas for call to {}", gas, request.to);
        Ok(gas)
    }

    async fn send_transaction(&self, request: CallRequest) -> Result<B256, ChainError> {
        let pending = self.provider.send_transaction(request.to_transaction()).await?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ChainReceipt, ChainError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| ChainError::new(e.to_string()))?;

        Ok(ChainReceipt {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        })
    }
}
