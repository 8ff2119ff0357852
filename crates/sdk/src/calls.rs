//! Encoders for protocol settings blobs and event lookup in receipts

use alloy::primitives::{Address, Bytes, FixedBytes, Log, U256};
use alloy::sol_types::{SolCall, SolEvent, SolValue};

use crate::contracts::IIntegrationAdapter;

/// Fee or policy manager config: `abi.encode(address[] modules, bytes[] settings)`
pub fn encode_extension_config(modules: &[Address], settings: &[Bytes]) -> Bytes {
    (modules.to_vec(), settings.to_vec()).abi_encode_params().into()
}

/// Config with no fee or policy modules
pub fn empty_extension_config() -> Bytes {
    encode_extension_config(&[], &[])
}

/// Entrance rate direct fee settings: `abi.encode(uint256 rateBps, address recipient)`
pub fn encode_entrance_fee(rate_bps: u16, recipient: Address) -> Bytes {
    (U256::from(rate_bps), recipient).abi_encode_params().into()
}

/// Address-list policy settings: `abi.encode(uint256[] listIds, bytes[] newListsData)`
pub fn encode_list_policy(list_ids: &[U256]) -> Bytes {
    (list_ids.to_vec(), Vec::<Bytes>::new()).abi_encode_params().into()
}

/// Uniswap V2 take-order data: `abi.encode(address[] path, uint256 outgoing, uint256 minIncoming)`
pub fn encode_uniswap_v2_order(path: &[Address], outgoing: U256, min_incoming: U256) -> Bytes {
    (path.to_vec(), outgoing, min_incoming).abi_encode_params().into()
}

/// Integration manager call args: `abi.encode(address adapter, bytes4 selector, bytes data)`
pub fn encode_take_order_call(adapter: Address, integration_data: Bytes) -> Bytes {
    let selector = FixedBytes::<4>::from(IIntegrationAdapter::takeOrderCall::SELECTOR);
    (adapter, selector, integration_data).abi_encode_params().into()
}

/// First log emitted by `emitter` that decodes as event `E`
pub fn find_event<E: SolEvent>(logs: &[Log], emitter: Address) -> Option<E> {
    logs.iter()
        .filter(|log| log.address == emitter)
        .filter(|log| log.data.topics().first() == Some(&E::SIGNATURE_HASH))
        .find_map(|log| E::decode_log_data(&log.data).ok())
}
