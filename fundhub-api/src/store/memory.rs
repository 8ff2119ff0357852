//! In-memory investment store with optional JSON snapshot persistence

use async_trait::async_trait;
use chrono::Utc;
use fundhub_types::{FundStatistics, InvestmentRecord, NewInvestment, UserInvestmentSummary};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{InvestmentStore, StoreHealth};
use crate::error::{StoreError, StoreResult};

pub struct InMemoryStore {
    records: RwLock<Vec<InvestmentRecord>>,
    snapshot_path: Option<PathBuf>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Store without persistence
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            snapshot_path: None,
        }
    }

    /// Store persisted to `path`, loading existing records when the file exists
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records: Vec<InvestmentRecord> = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(io_error(&path, e)),
        };
        info!(
            "Loaded {} investment records from {}",
            records.len(),
            path.display()
        );

        Ok(Self {
            records: RwLock::new(records),
            snapshot_path: Some(path),
        })
    }

    /// Write all records to the snapshot file, if one is configured
    pub async fn save(&self) -> StoreResult<()> {
        // the write guard keeps snapshot writers from interleaving
        let records = self.records.write().await;
        self.persist(&records).await
    }

    /// Replace the snapshot with `records` through a temporary file and rename
    async fn persist(&self, records: &[InvestmentRecord]) -> StoreResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(records)?;
        let staging = staging_path(path);
        tokio::fs::write(&staging, content)
            .await
            .map_err(|e| io_error(&staging, e))?;
        tokio::fs::rename(&staging, path)
            .await
            .map_err(|e| io_error(path, e))?;
        debug!("Saved investment snapshot to {}", path.display());
        Ok(())
    }

    async fn fund_records(&self, fund_id: &str) -> Vec<InvestmentRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.fund_id == fund_id)
            .cloned()
            .collect()
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    PathBuf::from(staging)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Latest first; records with equal timestamps keep reverse insertion order
fn newest_first(mut records: Vec<InvestmentRecord>) -> Vec<InvestmentRecord> {
    records.reverse();
    records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    records
}

#[async_trait]
impl InvestmentStore for InMemoryStore {
    async fn record_investment(&self, investment: NewInvestment) -> StoreResult<InvestmentRecord> {
        investment.validate()?;
        let record = investment.into_record(Utc::now());

        let mut records = self.records.write().await;
        records.push(record.clone());
        if let Err(e) = self.persist(&records).await {
            records.pop();
            return Err(e);
        }
        drop(records);

        info!(
            "Recorded {:?} of {} in fund {} for {}",
            record.kind, record.amount, record.fund_id, record.investor
        );
        Ok(record)
    }

    async fn user_investment_summary(
        &self,
        fund_id: &str,
        investor: &str,
    ) -> StoreResult<UserInvestmentSummary> {
        let records = self.fund_records(fund_id).await;
        let share_price = FundStatistics::from_records(fund_id, &records)
            .map_err(StoreError::Aggregation)?
            .current_share_price;
        UserInvestmentSummary::from_records(
            fund_id,
            investor,
            records.iter().filter(|r| r.belongs_to(investor)),
            share_price,
        )
        .map_err(StoreError::Aggregation)
    }

    async fn fund_investment_history(&self, fund_id: &str) -> StoreResult<Vec<InvestmentRecord>> {
        Ok(newest_first(self.fund_records(fund_id).await))
    }

    async fn user_fund_investment_history(
        &self,
        fund_id: &str,
        investor: &str,
    ) -> StoreResult<Vec<InvestmentRecord>> {
        let records = self
            .fund_records(fund_id)
            .await
            .into_iter()
            .filter(|r| r.belongs_to(investor))
            .collect();
        Ok(newest_first(records))
    }

    async fn fund_statistics(&self, fund_id: &str) -> StoreResult<FundStatistics> {
        let records = self.fund_records(fund_id).await;
        FundStatistics::from_records(fund_id, &records).map_err(StoreError::Aggregation)
    }

    async fn health_check(&self) -> StoreResult<StoreHealth> {
        Ok(StoreHealth {
            healthy: true,
            record_count: self.records.read().await.len(),
        })
    }
}
