use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use fundhub_types::FundError;
use tracing::{info, warn};

use crate::{
    config::{GasConfig, ProtocolAddresses, SdkConfig},
    connection::{CallRequest, ChainConnection, ChainReceipt},
    error::{decode_error, SdkResult},
};

/// Shared read and submit plumbing for the services
pub struct BaseClient {
    config: SdkConfig,
}

impl BaseClient {
    pub fn new(config: SdkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn addresses(&self) -> &ProtocolAddresses {
        &self.config.addresses
    }

    pub fn gas(&self) -> &GasConfig {
        &self.config.gas
    }

    /// Account that will sign, or `MissingSigner` for read-only connections
    pub fn signer(conn: &dyn ChainConnection) -> SdkResult<Address> {
        conn.account().ok_or(FundError::MissingSigner)
    }

    /// Read-only contract call decoded into the function's return type
    pub async fn read<C: SolCall>(
        &self,
        conn: &dyn ChainConnection,
        to: Address,
        call: C,
    ) -> SdkResult<C::Return> {
        let data = conn.call(to, call.abi_encode().into()).await?;
        C::abi_decode_returns(&data).map_err(decode_error)
    }

    /// Submit a transaction and wait for it to be mined
    ///
    /// A mined but reverted transaction is reported as `ExecutionReverted`.
    pub async fn submit(
        &self,
        conn: &dyn ChainConnection,
        request: CallRequest,
        label: &str,
    ) -> SdkResult<ChainReceipt> {
        let to = request.to;
        let tx_hash = conn.send_transaction(request).await?;
        info!("{} submitted to {}: {}", label, to, tx_hash);

        let receipt = conn.wait_for_receipt(tx_hash).await?;
        if !receipt.success {
            warn!("{} reverted: {}", label, tx_hash);
            return Err(FundError::ExecutionReverted { reason: None });
        }

        info!("{} confirmed: {}", label, tx_hash);
        Ok(receipt)
    }
}
