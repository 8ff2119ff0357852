//! Pre-submission checks for deposits and redemptions
//!
//! All comparisons happen in minimal units at the token's own precision, so a
//! request for exactly the held amount is never rejected by a rounding boundary.

use std::cmp::Ordering;

use crate::amount::{TokenAmount, SHARE_DECIMALS};
use crate::error::{FundError, FundResult, Shortfall};

fn ensure_same_precision(a: &TokenAmount, b: &TokenAmount) -> FundResult<Ordering> {
    a.compare(b).ok_or_else(|| {
        FundError::InvalidRequest(format!(
            "precision mismatch: {} vs {} decimals",
            a.decimals(),
            b.decimals()
        ))
    })
}

/// Check a deposit against the investor's token balance and current allowance
///
/// Balance is checked first: a deposit the investor cannot fund is reported as
/// a balance problem even when the allowance is also short.
pub fn validate_deposit(
    requested: &TokenAmount,
    balance: &TokenAmount,
    allowance: &TokenAmount,
) -> FundResult<()> {
    if requested.is_zero() {
        return Err(FundError::InvalidRequest("deposit amount must be positive".into()));
    }
    if ensure_same_precision(requested, balance)? == Ordering::Greater {
        return Err(FundError::InsufficientBalance {
            shortfall: Some(Shortfall::new(*requested, *balance)),
        });
    }
    if ensure_same_precision(requested, allowance)? == Ordering::Greater {
        return Err(FundError::InsufficientAllowance {
            shortfall: Some(Shortfall::new(*requested, *allowance)),
        });
    }
    Ok(())
}

/// Check a redemption against the holder's share balance
pub fn validate_redemption(requested: &TokenAmount, held: &TokenAmount) -> FundResult<()> {
    if requested.decimals() != SHARE_DECIMALS || held.decimals() != SHARE_DECIMALS {
        return Err(FundError::InvalidRequest(format!(
            "share quantities must use {} decimals",
            SHARE_DECIMALS
        )));
    }
    if requested.is_zero() {
        return Err(FundError::InvalidRequest("redemption amount must be positive".into()));
    }
    if requested.raw() > held.raw() {
        return Err(FundError::InsufficientShares {
            shortfall: Some(Shortfall::new(*requested, *held)),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdc(value: &str) -> TokenAmount {
        TokenAmount::parse(value, 6).unwrap()
    }

    fn shares(value: &str) -> TokenAmount {
        TokenAmount::parse_shares(value).unwrap()
    }

    #[test]
    fn test_deposit_exceeding_balance() {
        let err = validate_deposit(&usdc("100.000001"), &usdc("100"), &usdc("500")).unwrap_err();
        match err {
            FundError::InsufficientBalance { shortfall: Some(s) } => {
                assert_eq!(s.missing().to_string(), "0.000001");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_deposit_exceeding_allowance_only() {
        let err = validate_deposit(&usdc("50"), &usdc("100"), &usdc("49.99")).unwrap_err();
        assert!(matches!(err, FundError::InsufficientAllowance { .. }));
    }

    #[test]
    fn test_deposit_balance_checked_before_allowance() {
        let err = validate_deposit(&usdc("200"), &usdc("100"), &usdc("0")).unwrap_err();
        assert!(matches!(err, FundError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_deposit_within_limits() {
        assert!(validate_deposit(&usdc("100"), &usdc("100"), &usdc("100")).is_ok());
        assert!(validate_deposit(&usdc("0"), &usdc("100"), &usdc("100")).is_err());
    }

    #[test]
    fn test_deposit_precision_mismatch() {
        let err = validate_deposit(&usdc("1"), &shares("1"), &usdc("1")).unwrap_err();
        assert!(matches!(err, FundError::InvalidRequest(_)));
    }

    #[test]
    fn test_redeem_full_balance_accepted() {
        let held = TokenAmount::shares(alloy_primitives::U256::from(123_456_789_012_345_678_901u128));
        let requested = TokenAmount::parse_shares(&held.to_string()).unwrap();
        assert!(validate_redemption(&requested, &held).is_ok());
    }

    #[test]
    fn test_redeem_more_than_held() {
        let err = validate_redemption(&shares("10.000000000000000001"), &shares("10")).unwrap_err();
        assert!(matches!(err, FundError::InsufficientShares { .. }));
    }

    #[test]
    fn test_redeem_requires_share_precision() {
        assert!(validate_redemption(&usdc("1"), &usdc("2")).is_err());
    }
}
