//! Scripted chain connection for tests
//!
//! Reads are answered per (contract, selector). Gas estimates succeed unless a
//! failure rule matches. Every submitted transaction is recorded so tests can
//! assert what was, or was not, sent.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use alloy::primitives::{keccak256, Address, Bytes, FixedBytes, Log, B256};
use alloy::sol_types::{SolEvent, SolValue};
use async_trait::async_trait;

use crate::connection::{CallRequest, ChainConnection, ChainError, ChainReceipt};

type Selector = [u8; 4];
type EstimateRule = Box<dyn Fn(&CallRequest) -> bool + Send + Sync>;

/// Default gas returned by successful estimates
pub const MOCK_GAS_ESTIMATE: u64 = 1_000_000;

#[derive(Default)]
struct Recorded {
    sent: Vec<CallRequest>,
    estimated: Vec<CallRequest>,
    pending: HashMap<B256, Address>,
}

/// Chain connection with scripted responses
pub struct MockConnection {
    account: Option<Address>,
    reads: HashMap<(Address, Selector), Result<Bytes, ChainError>>,
    estimate_failures: Vec<(EstimateRule, ChainError)>,
    gas_estimate: u64,
    send_errors: HashMap<(Address, Selector), ChainError>,
    receipt_logs: HashMap<Address, Vec<Log>>,
    reverted: HashSet<Address>,
    recorded: Mutex<Recorded>,
}

impl MockConnection {
    /// Connection signing as `account`
    pub fn new(account: Address) -> Self {
        Self {
            account: Some(account),
            ..Self::read_only()
        }
    }

    /// Connection without a signer
    pub fn read_only() -> Self {
        Self {
            account: None,
            reads: HashMap::new(),
            estimate_failures: Vec::new(),
            gas_estimate: MOCK_GAS_ESTIMATE,
            send_errors: HashMap::new(),
            receipt_logs: HashMap::new(),
            reverted: HashSet::new(),
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Answer calls of `selector` on `to` with the ABI encoding of `value`
    pub fn with_return<V: SolValue>(mut self, to: Address, selector: Selector, value: V) -> Self {
        self.reads.insert((to, selector), Ok(value.abi_encode().into()));
        self
    }

    pub fn with_read_error(mut self, to: Address, selector: Selector, err: ChainError) -> Self {
        self.reads.insert((to, selector), Err(err));
        self
    }

    pub fn with_gas_estimate(mut self, gas: u64) -> Self {
        self.gas_estimate = gas;
        self
    }

    /// Fail gas estimation for requests matching `rule`
    pub fn fail_estimate_when(
        mut self,
        rule: impl Fn(&CallRequest) -> bool + Send + Sync + 'static,
        err: ChainError,
    ) -> Self {
        self.estimate_failures.push((Box::new(rule), err));
        self
    }

    /// Reject submission of `selector` calls to `to`
    pub fn with_send_error(mut self, to: Address, selector: Selector, err: ChainError) -> Self {
        self.send_errors.insert((to, selector), err);
        self
    }

    /// Logs attached to the receipt of any transaction sent to `to`
    pub fn with_receipt_logs(mut self, to: Address, logs: Vec<Log>) -> Self {
        self.receipt_logs.insert(to, logs);
        self
    }

    /// Transactions sent to `to` are mined but revert
    pub fn with_reverted(mut self, to: Address) -> Self {
        self.reverted.insert(to);
        self
    }

    /// Submitted transactions in order
    pub fn sent(&self) -> Vec<CallRequest> {
        self.recorded().sent.clone()
    }

    /// Submitted transactions to `to` with `selector`
    pub fn sent_to(&self, to: Address, selector: Selector) -> Vec<CallRequest> {
        self.recorded()
            .sent
            .iter()
            .filter(|req| req.to == to && req.selector() == Some(selector))
            .cloned()
            .collect()
    }

    /// Gas estimation requests in order, including failed ones
    pub fn estimated(&self) -> Vec<CallRequest> {
        self.recorded().estimated.clone()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Encode `event` as a log emitted by `address`
pub fn event_log<E: SolEvent>(address: Address, event: &E) -> Log {
    Log {
        address,
        data: event.encode_log_data(),
    }
}

fn selector_of(input: &Bytes) -> Result<Selector, ChainError> {
    input
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| ChainError::new("calldata shorter than a selector"))
}

#[async_trait]
impl ChainConnection for MockConnection {
    fn account(&self) -> Option<Address> {
        self.account
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError> {
        let selector = selector_of(&input)?;
        self.reads.get(&(to, selector)).cloned().unwrap_or_else(|| {
            Err(ChainError::new(format!(
                "execution reverted: no scripted response for {} on {}",
                FixedBytes::<4>::from(selector),
                to
            )))
        })
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError> {
        self.recorded().estimated.push(request.clone());
        match self.estimate_failures.iter().find(|(rule, _)| rule(request)) {
            Some((_, err)) => Err(err.clone()),
            None => Ok(self.gas_estimate),
        }
    }

    async fn send_transaction(&self, request: CallRequest) -> Result<B256, ChainError> {
        let selector = selector_of(&request.input)?;
        if let Some(err) = self.send_errors.get(&(request.to, selector)) {
            return Err(err.clone());
        }

        let mut recorded = self.recorded();
        let nonce = recorded.sent.len() as u64;
        let tx_hash = keccak256(nonce.to_be_bytes());
        recorded.pending.insert(tx_hash, request.to);
        recorded.sent.push(request);
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ChainReceipt, ChainError> {
        let to = self
            .recorded()
            .pending
            .get(&tx_hash)
            .copied()
            .ok_or_else(|| ChainError::new(format!("unknown transaction {}", tx_hash)))?;

        Ok(ChainReceipt {
            tx_hash,
            success: !self.reverted.contains(&to),
            logs: self.receipt_logs.get(&to).cloned().unwrap_or_default(),
        })
    }
}
