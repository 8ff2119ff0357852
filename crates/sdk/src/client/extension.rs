use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolCall;
use fundhub_types::{BestEffort, FundError, TokenAmount, SHARE_DECIMALS};
use tracing::{info, warn};

use crate::{
    calls::{encode_take_order_call, encode_uniswap_v2_order},
    client::BaseClient,
    connection::{CallRequest, ChainConnection},
    contracts::{IComptroller, INTEGRATION_ACTION_CALL_ON_INTEGRATION},
    error::SdkResult,
};

/// Asset swap routed through the integration manager and a Uniswap V2 adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOrder {
    pub comptroller: Address,
    pub from_token: Address,
    pub to_token: Address,
    pub from_amount: String,
    pub min_to_amount: String,
    pub from_decimals: u8,
    pub to_decimals: u8,
    /// Overrides the configured integration manager
    pub integration_manager: Option<Address>,
    /// Overrides the configured adapter
    pub adapter: Option<Address>,
}

impl SwapOrder {
    pub fn new(
        comptroller: Address,
        from_token: Address,
        to_token: Address,
        from_amount: impl Into<String>,
        min_to_amount: impl Into<String>,
    ) -> Self {
        Self {
            comptroller,
            from_token,
            to_token,
            from_amount: from_amount.into(),
            min_to_amount: min_to_amount.into(),
            from_decimals: SHARE_DECIMALS,
            to_decimals: SHARE_DECIMALS,
            integration_manager: None,
            adapter: None,
        }
    }

    pub fn with_decimals(mut self, from_decimals: u8, to_decimals: u8) -> Self {
        self.from_decimals = from_decimals;
        self.to_decimals = to_decimals;
        self
    }

    pub fn with_integration(mut self, integration_manager: Address, adapter: Address) -> Self {
        self.integration_manager = Some(integration_manager);
        self.adapter = Some(adapter);
        self
    }
}

/// Service for protocol extension calls made by the fund manager
#[derive(Clone)]
pub struct ExtensionService {
    base: Arc<BaseClient>,
}

impl ExtensionService {
    pub fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Swap vault assets; failures are logged and returned as `Skipped`
    pub async fn swap_via_uniswap(
        &self,
        conn: &dyn ChainConnection,
        order: &SwapOrder,
    ) -> BestEffort<B256> {
        match self.try_swap(conn, order).await {
            Ok(tx_hash) => BestEffort::Completed(tx_hash),
            Err(err) => {
                warn!(
                    "Swap {} -> {} via {} failed: {}",
                    order.from_token, order.to_token, order.comptroller, err
                );
                BestEffort::Skipped(err)
            }
        }
    }

    async fn try_swap(&self, conn: &dyn ChainConnection, order: &SwapOrder) -> SdkResult<B256> {
        let manager = BaseClient::signer(conn)?;
        let addresses = self.base.addresses();
        let integration_manager = order
            .integration_manager
            .or(addresses.integration_manager)
            .ok_or_else(|| FundError::InvalidRequest("no integration manager configured".into()))?;
        let adapter = order
            .adapter
            .or(addresses.uniswap_v2_adapter)
            .ok_or_else(|| FundError::InvalidRequest("no Uniswap V2 adapter configured".into()))?;

        let outgoing = TokenAmount::parse(&order.from_amount, order.from_decimals)?;
        let min_incoming = TokenAmount::parse(&order.min_to_amount, order.to_decimals)?;
        if outgoing.is_zero() {
            return Err(FundError::InvalidRequest("swap amount must be positive".into()));
        }

        let integration_data = encode_uniswap_v2_order(
            &[order.from_token, order.to_token],
            outgoing.raw(),
            min_incoming.raw(),
        );
        let call = IComptroller::callOnExtensionCall {
            extension: integration_manager,
            actionId: U256::from(INTEGRATION_ACTION_CALL_ON_INTEGRATION),
            callArgs: encode_take_order_call(adapter, integration_data),
        };
        let request = CallRequest::new(order.comptroller, call.abi_encode())
            .from(manager)
            .gas_limit(self.base.gas().extension_call_gas_limit);

        let receipt = self.base.submit(conn, request, "Adapter swap").await?;
        info!(
            "Swapped {} of {} for at least {} of {}",
            outgoing, order.from_token, min_incoming, order.to_token
        );
        Ok(receipt.tx_hash)
    }
}
