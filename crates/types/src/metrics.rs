//! Dashboard aggregation over fund figures

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FundError, FundResult};

/// Latest figures for one fund as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundPerformance {
    pub nav_per_share: Decimal,
    pub total_shares: Decimal,
    /// Change of NAV per share over the last 24 hours, in percent
    pub pct_24h: Decimal,
    pub investor_count: u32,
}

impl FundPerformance {
    /// Assets under management: NAV per share times shares outstanding
    pub fn aum(&self) -> FundResult<Decimal> {
        self.nav_per_share
            .checked_mul(self.total_shares)
            .ok_or(FundError::Overflow("assets under management"))
    }

    /// AUM 24 hours ago, reconstructed from the current NAV and its change
    pub fn previous_aum(&self) -> FundResult<Decimal> {
        let factor = self
            .pct_24h
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|p| p.checked_add(Decimal::ONE))
            .ok_or(FundError::Overflow("24h change factor"))?;
        if factor <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        self.nav_per_share
            .checked_div(factor)
            .and_then(|nav| nav.checked_mul(self.total_shares))
            .ok_or(FundError::Overflow("previous assets under management"))
    }
}

/// Portfolio-level totals across every fund on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub total_aum: Decimal,
    pub aum_change_24h: Decimal,
    pub active_funds: usize,
    pub total_investors: u32,
}

impl PortfolioMetrics {
    pub fn compute(funds: &[FundPerformance]) -> FundResult<Self> {
        let mut total_aum = Decimal::ZERO;
        let mut previous = Decimal::ZERO;
        for fund in funds {
            total_aum = total_aum
                .checked_add(fund.aum()?)
                .ok_or(FundError::Overflow("total assets under management"))?;
            previous = previous
                .checked_add(fund.previous_aum()?)
                .ok_or(FundError::Overflow("previous assets under management"))?;
        }

        Ok(Self {
            total_aum,
            aum_change_24h: percentage_change(previous, total_aum).unwrap_or(Decimal::ZERO),
            active_funds: funds.iter().filter(|f| !f.total_shares.is_zero()).count(),
            total_investors: funds.iter().map(|f| f.investor_count).sum(),
        })
    }
}

/// Relative change from `old` to `new` in percent; `None` when `old` is zero
/// or the change is not representable
pub fn percentage_change(old: Decimal, new: Decimal) -> Option<Decimal> {
    if old.is_zero() {
        return None;
    }
    new.checked_sub(old)?
        .checked_div(old)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// Percentage change between the latest point and the newest point at least
/// `window` older than it. Points must be sorted by timestamp.
pub fn price_change_over(points: &[PricePoint], window: Duration) -> Option<Decimal> {
    let latest = points.last()?;
    let cutoff = latest.timestamp - window;
    let reference = points.iter().rev().find(|p| p.timestamp <= cutoff)?;
    percentage_change(reference.price, latest.price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_aum_and_previous() {
        let fund = FundPerformance {
            nav_per_share: dec("1.1"),
            total_shares: dec("1000"),
            pct_24h: dec("10"),
            investor_count: 3,
        };
        assert_eq!(fund.aum().unwrap(), dec("1100"));
        assert_eq!(fund.previous_aum().unwrap(), dec("1000"));
    }

    #[test]
    fn test_oversized_funds_are_errors() {
        let fund = FundPerformance {
            nav_per_share: dec("2"),
            total_shares: Decimal::MAX,
            pct_24h: Decimal::ZERO,
            investor_count: 1,
        };
        assert!(matches!(fund.aum(), Err(FundError::Overflow(_))));

        let largest = FundPerformance {
            nav_per_share: Decimal::ONE,
            ..fund
        };
        assert_eq!(largest.aum().unwrap(), Decimal::MAX);
        assert!(PortfolioMetrics::compute(&[largest.clone(), largest]).is_err());

        assert_eq!(percentage_change(Decimal::MIN, Decimal::MAX), None);
    }

    #[test]
    fn test_portfolio_metrics() {
        let funds = vec![
            FundPerformance {
                nav_per_share: dec("1.1"),
                total_shares: dec("1000"),
                pct_24h: dec("10"),
                investor_count: 3,
            },
            FundPerformance {
                nav_per_share: dec("2"),
                total_shares: dec("450"),
                pct_24h: Decimal::ZERO,
                investor_count: 2,
            },
            FundPerformance {
                nav_per_share: Decimal::ONE,
                total_shares: Decimal::ZERO,
                pct_24h: Decimal::ZERO,
                investor_count: 0,
            },
        ];
        let metrics = PortfolioMetrics::compute(&funds).unwrap();
        assert_eq!(metrics.total_aum, dec("2000"));
        assert_eq!(metrics.aum_change_24h, dec("5"));
        assert_eq!(metrics.active_funds, 2);
        assert_eq!(metrics.total_investors, 5);

        let empty = PortfolioMetrics::compute(&[]).unwrap();
        assert_eq!(empty.aum_change_24h, Decimal::ZERO);
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(percentage_change(dec("200"), dec("250")), Some(dec("25")));
        assert_eq!(percentage_change(dec("200"), dec("150")), Some(dec("-25")));
        assert_eq!(percentage_change(Decimal::ZERO, dec("1")), None);
    }

    #[test]
    fn test_price_change_over_window() {
        let day = |d: i64| Utc.timestamp_opt(1_700_000_000 + d * 86_400, 0).unwrap();
        let points = vec![
            PricePoint { timestamp: day(0), price: dec("1.00") },
            PricePoint { timestamp: day(6), price: dec("1.20") },
            PricePoint { timestamp: day(7), price: dec("1.50") },
        ];

        assert_eq!(price_change_over(&points, Duration::days(1)), Some(dec("25")));
        assert_eq!(price_change_over(&points, Duration::days(7)), Some(dec("50")));
        assert_eq!(price_change_over(&points, Duration::days(30)), None);
        assert_eq!(price_change_over(&[], Duration::days(1)), None);
    }
}
