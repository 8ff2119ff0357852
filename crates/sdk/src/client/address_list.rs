use std::sync::Arc;

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use fundhub_types::{AddressList, BestEffort, FundError};
use tracing::{info, warn};

use crate::{
    calls::find_event,
    client::BaseClient,
    connection::{CallRequest, ChainConnection},
    contracts::{IAddressListRegistry, LIST_UPDATE_TYPE_NONE},
    error::SdkResult,
};

/// Service for address lists referenced by the deposit whitelist policy
#[derive(Clone)]
pub struct AddressListService {
    base: Arc<BaseClient>,
}

impl AddressListService {
    pub fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Create a fixed list owned by the signer
    ///
    /// Failure is not fatal to the caller; it is logged and returned as
    /// `BestEffort::Skipped`.
    pub async fn create_list(
        &self,
        conn: &dyn ChainConnection,
        members: &[Address],
    ) -> BestEffort<AddressList> {
        match self.try_create_list(conn, members).await {
            Ok(list) => {
                info!(
                    "Created address list {} with {} members",
                    list.list_id,
                    list.members.len()
                );
                BestEffort::Completed(list)
            }
            Err(err) => {
                warn!("Address list creation failed: {}", err);
                BestEffort::Skipped(err)
            }
        }
    }

    async fn try_create_list(
        &self,
        conn: &dyn ChainConnection,
        members: &[Address],
    ) -> SdkResult<AddressList> {
        let owner = BaseClient::signer(conn)?;
        let call = IAddressListRegistry::createListCall {
            owner,
            updateType: LIST_UPDATE_TYPE_NONE,
            initialItems: members.to_vec(),
        };
        let request = CallRequest::new(self.base.addresses().address_list_registry, call.abi_encode())
            .from(owner)
            .gas_limit(self.base.gas().address_list_gas_limit);

        let receipt = self.base.submit(conn, request, "Address list creation").await?;
        let registry = self.base.addresses().address_list_registry;
        let event = find_event::<IAddressListRegistry::ListCreated>(&receipt.logs, registry)
            .ok_or_else(|| FundError::EventNotFound {
                event: "ListCreated".to_string(),
                tx_hash: receipt.tx_hash.to_string(),
            })?;

        Ok(AddressList {
            list_id: event.id,
            members: members.to_vec(),
        })
    }
}
