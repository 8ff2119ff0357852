//! Storage port for investment records

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use fundhub_types::{FundStatistics, InvestmentRecord, NewInvestment, UserInvestmentSummary};
use serde::Serialize;

use crate::error::StoreResult;

/// Store health report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreHealth {
    pub healthy: bool,
    pub record_count: usize,
}

/// Persistence of confirmed deposits and redemptions
///
/// Investor addresses are matched case-insensitively.
#[async_trait]
pub trait InvestmentStore: Send + Sync {
    /// Validate and persist a new record
    async fn record_investment(&self, investment: NewInvestment) -> StoreResult<InvestmentRecord>;

    /// Summary of one investor's position, valued at the fund's latest share price
    async fn user_investment_summary(
        &self,
        fund_id: &str,
        investor: &str,
    ) -> StoreResult<UserInvestmentSummary>;

    /// All records of a fund, newest first
    async fn fund_investment_history(&self, fund_id: &str) -> StoreResult<Vec<InvestmentRecord>>;

    /// One investor's records in a fund, newest first
    async fn user_fund_investment_history(
        &self,
        fund_id: &str,
        investor: &str,
    ) -> StoreResult<Vec<InvestmentRecord>>;

    async fn fund_statistics(&self, fund_id: &str) -> StoreResult<FundStatistics>;

    async fn health_check(&self) -> StoreResult<StoreHealth>;
}
