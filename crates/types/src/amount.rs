//! On-chain fixed-point quantities
//!
//! Every token or share quantity that crosses the client boundary is carried as a
//! [`TokenAmount`]: the raw minimal-unit integer together with the precision it was
//! read or parsed with. Formatting and parsing never guess the precision.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Precision of fund shares, independent of the denomination asset
pub const SHARE_DECIMALS: u8 = 18;

/// Largest precision whose scale factor still fits in a `U256`
pub const MAX_DECIMALS: u8 = 77;

/// Errors raised while converting between human decimals and minimal units
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Empty amount")]
    Empty,

    #[error("Invalid amount '{0}': expected a non-negative decimal number")]
    Malformed(String),

    #[error("Amount '{value}' has more than {decimals} fractional digits")]
    TooManyDecimals { value: String, decimals: u8 },

    #[error("Amount '{0}' overflows 256 bits")]
    Overflow(String),

    #[error("Unsupported precision: {0} decimals (max {MAX_DECIMALS})")]
    UnsupportedPrecision(u8),
}

/// A token quantity in minimal units tagged with its decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// An 18-decimal fund share quantity
    pub fn shares(raw: U256) -> Self {
        Self::new(raw, SHARE_DECIMALS)
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::ZERO, decimals)
    }

    /// Parse a human-entered decimal string into minimal units
    pub fn parse(value: &str, decimals: u8) -> Result<Self, AmountError> {
        parse_units(value, decimals).map(|raw| Self::new(raw, decimals))
    }

    /// Parse a human-entered share quantity (always 18 decimals)
    pub fn parse_shares(value: &str) -> Result<Self, AmountError> {
        Self::parse(value, SHARE_DECIMALS)
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Compare two quantities in minimal units; `None` when precisions differ
    pub fn compare(&self, other: &TokenAmount) -> Option<Ordering> {
        (self.decimals == other.decimals).then(|| self.raw.cmp(&other.raw))
    }

    /// Minimal-unit difference `self - other`, zero when `other` is larger
    pub fn saturating_sub(&self, other: &TokenAmount) -> TokenAmount {
        Self::new(self.raw.saturating_sub(other.raw), self.decimals)
    }

    /// Lossy conversion for display arithmetic (AUM, returns)
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.to_string()).ok()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(self.raw, self.decimals))
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn scale(decimals: u8) -> Result<U256, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedPrecision(decimals));
    }
    Ok(U256::from(10u8).pow(U256::from(decimals)))
}

/// Convert a decimal string into minimal units at the given precision
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, AmountError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    scale(decimals)?;

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::Malformed(trimmed.to_string()));
    }

    let significant = fraction.trim_end_matches('0');
    if significant.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals {
            value: trimmed.to_string(),
            decimals,
        });
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(significant);
    for _ in significant.len()..decimals as usize {
        digits.push('0');
    }

    let ten = U256::from(10u8);
    digits.bytes().try_fold(U256::ZERO, |acc, b| {
        acc.checked_mul(ten)
            .and_then(|acc| acc.checked_add(U256::from(b - b'0')))
            .ok_or_else(|| AmountError::Overflow(trimmed.to_string()))
    })
}

/// Render minimal units as a decimal string with trailing zeros trimmed,
/// always keeping at least one fractional digit ("1000.0", "1.05")
pub fn format_units(raw: U256, decimals: u8) -> String {
    let Ok(unit) = scale(decimals) else {
        return raw.to_string();
    };
    let whole = raw / unit;
    let fraction = raw % unit;

    let mut fraction_str = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    while fraction_str.len() > 1 && fraction_str.ends_with('0') {
        fraction_str.pop();
    }
    if fraction_str.is_empty() {
        fraction_str.push('0');
    }
    format!("{}.{}", whole, fraction_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u8))
    }

    #[test]
    fn test_format_whole_and_fractional() {
        assert_eq!(format_units(ether(1000), 18), "1000.0");
        assert_eq!(format_units(U256::from(1_050_000_000_000_000_000u128), 18), "1.05");
        assert_eq!(format_units(U256::ZERO, 6), "0.0");
        assert_eq!(format_units(U256::from(1u8), 6), "0.000001");
        assert_eq!(format_units(U256::from(42u8), 0), "42.0");
    }

    #[test]
    fn test_parse_respects_precision() {
        assert_eq!(parse_units("1.5", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(parse_units(".5", 2).unwrap(), U256::from(50u8));
        assert_eq!(parse_units("7", 0).unwrap(), U256::from(7u8));
        assert_eq!(parse_units(" 2.000 ", 1).unwrap(), U256::from(20u8));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_units("", 18), Err(AmountError::Empty));
        assert!(matches!(parse_units("-1", 18), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_units("1.2.3", 18), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_units(".", 18), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_units("1e18", 18), Err(AmountError::Malformed(_))));
        assert!(matches!(
            parse_units("0.0000001", 6),
            Err(AmountError::TooManyDecimals { decimals: 6, .. })
        ));
        assert_eq!(parse_units("1", 78), Err(AmountError::UnsupportedPrecision(78)));
    }

    #[test]
    fn test_parse_overflow() {
        let huge = "9".repeat(80);
        assert!(matches!(parse_units(&huge, 0), Err(AmountError::Overflow(_))));
    }

    #[test]
    fn test_round_trip_across_precisions() {
        let inputs = ["0.1", "1.0", "123.456", "0.000001", "1000000.5"];
        for decimals in [6u8, 8, 18] {
            for input in inputs {
                let amount = TokenAmount::parse(input, decimals).unwrap();
                let reparsed = TokenAmount::parse(&amount.to_string(), decimals).unwrap();
                assert_eq!(amount, reparsed, "{} @ {} decimals", input, decimals);
                assert_eq!(
                    amount.to_decimal().unwrap(),
                    Decimal::from_str(input).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_compare_requires_same_precision() {
        let a = TokenAmount::parse("1", 6).unwrap();
        let b = TokenAmount::parse("1", 18).unwrap();
        assert_eq!(a.compare(&b), None);
        assert_eq!(a.compare(&a), Some(Ordering::Equal));
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let amount = TokenAmount::shares(ether(3));
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"3.0\"");
    }
}
