//! Investment records and the summaries derived from them

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FundError, FundResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentKind {
    Deposit,
    Redeem,
}

/// A deposit or redemption recorded after its transaction confirmed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    pub id: Uuid,
    pub fund_id: String,
    pub investor: String,
    #[serde(rename = "type")]
    pub kind: InvestmentKind,
    /// Denomination asset amount
    pub amount: Decimal,
    pub shares: Decimal,
    pub share_price: Decimal,
    pub tx_hash: String,
    pub recorded_at: DateTime<Utc>,
}

impl InvestmentRecord {
    pub fn belongs_to(&self, investor: &str) -> bool {
        self.investor.eq_ignore_ascii_case(investor)
    }
}

/// Input for recording a confirmed deposit or redemption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub fund_id: String,
    pub investor: String,
    #[serde(rename = "type")]
    pub kind: InvestmentKind,
    pub amount: Decimal,
    pub shares: Decimal,
    pub share_price: Decimal,
    pub tx_hash: String,
}

impl NewInvestment {
    /// Deposit of `amount` at `share_price`; shares = amount / price
    pub fn deposit(
        fund_id: impl Into<String>,
        investor: impl Into<String>,
        amount: Decimal,
        share_price: Decimal,
        tx_hash: impl Into<String>,
    ) -> FundResult<Self> {
        let shares = amount
            .checked_div(positive_price(share_price)?)
            .ok_or_else(|| FundError::InvalidRequest("share computation overflowed".into()))?;
        Ok(Self {
            fund_id: fund_id.into(),
            investor: investor.into(),
            kind: InvestmentKind::Deposit,
            amount,
            shares,
            share_price,
            tx_hash: tx_hash.into(),
        })
    }

    /// Redemption of `shares` at `share_price`; amount = shares * price
    pub fn redeem(
        fund_id: impl Into<String>,
        investor: impl Into<String>,
        shares: Decimal,
        share_price: Decimal,
        tx_hash: impl Into<String>,
    ) -> FundResult<Self> {
        let amount = shares
            .checked_mul(positive_price(share_price)?)
            .ok_or_else(|| FundError::InvalidRequest("amount computation overflowed".into()))?;
        Ok(Self {
            fund_id: fund_id.into(),
            investor: investor.into(),
            kind: InvestmentKind::Redeem,
            amount,
            shares,
            share_price,
            tx_hash: tx_hash.into(),
        })
    }

    pub fn validate(&self) -> FundResult<()> {
        if self.fund_id.trim().is_empty() {
            return Err(FundError::InvalidRequest("fundId must not be empty".into()));
        }
        if self.investor.trim().is_empty() {
            return Err(FundError::InvalidRequest("investor must not be empty".into()));
        }
        if self.amount.is_sign_negative() || self.shares.is_sign_negative() {
            return Err(FundError::InvalidRequest("amounts must not be negative".into()));
        }
        positive_price(self.share_price)?;
        Ok(())
    }

    pub fn into_record(self, recorded_at: DateTime<Utc>) -> InvestmentRecord {
        InvestmentRecord {
            id: Uuid::new_v4(),
            fund_id: self.fund_id,
            investor: self.investor,
            kind: self.kind,
            amount: self.amount,
            shares: self.shares,
            share_price: self.share_price,
            tx_hash: self.tx_hash,
            recorded_at,
        }
    }
}

fn positive_price(price: Decimal) -> FundResult<Decimal> {
    if price <= Decimal::ZERO {
        return Err(FundError::InvalidRequest(format!(
            "share price must be positive, got {}",
            price
        )));
    }
    Ok(price)
}

/// Per-investor position in one fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvestmentSummary {
    pub fund_id: String,
    pub investor: String,
    pub total_deposited: Decimal,
    pub total_redeemed: Decimal,
    pub current_shares: Decimal,
    pub current_value: Decimal,
    pub total_return: Decimal,
    pub return_percentage: Decimal,
    pub deposit_count: u32,
    pub redeem_count: u32,
    pub first_investment_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl UserInvestmentSummary {
    /// Fold an investor's records at the given current share price
    pub fn from_records<'a>(
        fund_id: &str,
        investor: &str,
        records: impl IntoIterator<Item = &'a InvestmentRecord>,
        current_share_price: Decimal,
    ) -> FundResult<Self> {
        let mut summary = Self {
            fund_id: fund_id.to_string(),
            investor: investor.to_string(),
            total_deposited: Decimal::ZERO,
            total_redeemed: Decimal::ZERO,
            current_shares: Decimal::ZERO,
            current_value: Decimal::ZERO,
            total_return: Decimal::ZERO,
            return_percentage: Decimal::ZERO,
            deposit_count: 0,
            redeem_count: 0,
            first_investment_at: None,
            last_activity_at: None,
        };

        for record in records {
            match record.kind {
                InvestmentKind::Deposit => {
                    summary.total_deposited =
                        add(summary.total_deposited, record.amount, "total deposited")?;
                    summary.current_shares =
                        add(summary.current_shares, record.shares, "current shares")?;
                    summary.deposit_count += 1;
                    if summary.first_investment_at.map_or(true, |t| record.recorded_at < t) {
                        summary.first_investment_at = Some(record.recorded_at);
                    }
                }
                InvestmentKind::Redeem => {
                    summary.total_redeemed =
                        add(summary.total_redeemed, record.amount, "total redeemed")?;
                    summary.current_shares =
                        add(summary.current_shares, -record.shares, "current shares")?;
                    summary.redeem_count += 1;
                }
            }
            if summary.last_activity_at.map_or(true, |t| record.recorded_at > t) {
                summary.last_activity_at = Some(record.recorded_at);
            }
        }

        summary.current_value = mul(summary.current_shares, current_share_price, "current value")?;
        summary.total_return = summary
            .current_value
            .checked_add(summary.total_redeemed)
            .and_then(|v| v.checked_sub(summary.total_deposited))
            .ok_or(FundError::Overflow("total return"))?;
        if !summary.total_deposited.is_zero() {
            summary.return_percentage = summary
                .total_return
                .checked_div(summary.total_deposited)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or(FundError::Overflow("return percentage"))?;
        }
        Ok(summary)
    }
}

/// Fund-wide figures derived from its record history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundStatistics {
    pub fund_id: String,
    pub total_shares: Decimal,
    pub current_share_price: Decimal,
    pub total_assets: Decimal,
    pub total_investors: usize,
    pub record_count: usize,
}

impl FundStatistics {
    pub fn from_records(fund_id: &str, records: &[InvestmentRecord]) -> FundResult<Self> {
        let mut holdings: HashMap<String, Decimal> = HashMap::new();
        let mut total_shares = Decimal::ZERO;

        for record in records {
            let delta = match record.kind {
                InvestmentKind::Deposit => record.shares,
                InvestmentKind::Redeem => -record.shares,
            };
            total_shares = add(total_shares, delta, "total shares")?;
            let held = holdings.entry(record.investor.to_ascii_lowercase()).or_default();
            *held = add(*held, delta, "investor shares")?;
        }

        let current_share_price = records
            .iter()
            .max_by_key(|r| r.recorded_at)
            .map(|r| r.share_price)
            .unwrap_or(Decimal::ONE);

        Ok(Self {
            fund_id: fund_id.to_string(),
            total_shares,
            current_share_price,
            total_assets: mul(total_shares, current_share_price, "total assets")?,
            total_investors: holdings.values().filter(|s| **s > Decimal::ZERO).count(),
            record_count: records.len(),
        })
    }
}

fn add(a: Decimal, b: Decimal, what: &'static str) -> FundResult<Decimal> {
    a.checked_add(b).ok_or(FundError::Overflow(what))
}

fn mul(a: Decimal, b: Decimal, what: &'static str) -> FundResult<Decimal> {
    a.checked_mul(b).ok_or(FundError::Overflow(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn records() -> Vec<InvestmentRecord> {
        vec![
            NewInvestment::deposit("fund-1", "0xAbC", dec("100"), dec("1"), "0x01")
                .unwrap()
                .into_record(at(0)),
            NewInvestment::deposit("fund-1", "0xdef", dec("50"), dec("1.25"), "0x02")
                .unwrap()
                .into_record(at(10)),
            NewInvestment::redeem("fund-1", "0xabc", dec("40"), dec("1.25"), "0x03")
                .unwrap()
                .into_record(at(20)),
        ]
    }

    #[test]
    fn test_deposit_and_redeem_derivations() {
        let deposit = NewInvestment::deposit("f", "i", dec("105"), dec("1.05"), "0x").unwrap();
        assert_eq!(deposit.shares, dec("100"));

        let redeem = NewInvestment::redeem("f", "i", dec("10"), dec("1.5"), "0x").unwrap();
        assert_eq!(redeem.amount, dec("15"));

        assert!(NewInvestment::deposit("f", "i", dec("1"), Decimal::ZERO, "0x").is_err());
    }

    #[test]
    fn test_user_summary() {
        let all = records();
        let mine: Vec<_> = all.iter().filter(|r| r.belongs_to("0xabc")).collect();
        let summary = UserInvestmentSummary::from_records("fund-1", "0xabc", mine, dec("1.5")).unwrap();

        assert_eq!(summary.total_deposited, dec("100"));
        assert_eq!(summary.total_redeemed, dec("50"));
        assert_eq!(summary.current_shares, dec("60"));
        assert_eq!(summary.current_value, dec("90"));
        assert_eq!(summary.total_return, dec("40"));
        assert_eq!(summary.return_percentage, dec("40"));
        assert_eq!(summary.deposit_count, 1);
        assert_eq!(summary.redeem_count, 1);
        assert_eq!(summary.first_investment_at, Some(at(0)));
        assert_eq!(summary.last_activity_at, Some(at(20)));
    }

    #[test]
    fn test_empty_summary_has_zero_return() {
        let summary = UserInvestmentSummary::from_records("fund-1", "0x0", Vec::new(), dec("2")).unwrap();
        assert_eq!(summary.return_percentage, Decimal::ZERO);
        assert_eq!(summary.first_investment_at, None);
    }

    #[test]
    fn test_fund_statistics() {
        let stats = FundStatistics::from_records("fund-1", &records()).unwrap();
        assert_eq!(stats.total_shares, dec("100"));
        assert_eq!(stats.current_share_price, dec("1.25"));
        assert_eq!(stats.total_assets, dec("125"));
        assert_eq!(stats.total_investors, 2);
        assert_eq!(stats.record_count, 3);

        let empty = FundStatistics::from_records("fund-2", &[]).unwrap();
        assert_eq!(empty.current_share_price, Decimal::ONE);
        assert_eq!(empty.total_investors, 0);
    }

    #[test]
    fn test_overflowing_totals_are_errors() {
        let huge = |tx: &str| {
            NewInvestment::deposit("fund-1", "0xabc", Decimal::MAX, Decimal::ONE, tx)
                .unwrap()
                .into_record(at(0))
        };
        let records = vec![huge("0x01"), huge("0x02")];

        let stats = FundStatistics::from_records("fund-1", &records);
        assert!(matches!(stats, Err(FundError::Overflow(_))));

        let summary = UserInvestmentSummary::from_records("fund-1", "0xabc", &records, Decimal::ONE);
        assert!(matches!(summary, Err(FundError::Overflow(_))));

        // a single record fits but its value at a higher price does not
        let value = UserInvestmentSummary::from_records("fund-1", "0xabc", &records[..1], dec("2"));
        assert!(matches!(value, Err(FundError::Overflow("current value"))));
    }

    #[test]
    fn test_record_serializes_type_field() {
        let record = &records()[0];
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["type"], "deposit");
        assert_eq!(json["fundId"], "fund-1");
        assert_eq!(json["amount"], "100");
    }
}
