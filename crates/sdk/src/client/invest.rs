use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolCall;
use fundhub_types::{validate_deposit, validate_redemption, FundError, TokenAmount};
use tracing::{debug, info};

use crate::{
    client::{BaseClient, TokenService},
    connection::{CallRequest, ChainConnection},
    contracts::{IComptroller, IERC20, IVault},
    error::SdkResult,
};

const BPS_DENOMINATOR: u64 = 10_000;

/// How the comptroller gets permission to pull the deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApprovalMode {
    /// Approve exactly the deposit amount and wait for it before buying
    #[default]
    Approve,
    /// Rely on the current allowance; fail early when it is short
    UseExisting,
}

/// Floor on the shares a deposit must mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinShares {
    Exact(U256),
    /// Expected shares at the current share value less a tolerance
    Slippage { bps: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepositOptions {
    pub approval: ApprovalMode,
    /// `None` uses the configured default slippage
    pub min_shares: Option<MinShares>,
}

impl DepositOptions {
    pub fn with_approval(mut self, approval: ApprovalMode) -> Self {
        self.approval = approval;
        self
    }

    pub fn with_min_shares(mut self, min_shares: MinShares) -> Self {
        self.min_shares = Some(min_shares);
        self
    }
}

/// Minimum shares for a deposit of `amount` at `gross_share_value`
///
/// Expected shares are `amount * 1e18 / gross_share_value`; the floor removes
/// `slippage_bps` from that and never drops below one share unit.
pub fn min_shares_for(amount: U256, gross_share_value: U256, slippage_bps: u16) -> U256 {
    let one = U256::from(1u8);
    if gross_share_value.is_zero() {
        return one;
    }
    let unit = U256::from(10u8).pow(U256::from(18u8));
    let tolerance = U256::from(BPS_DENOMINATOR.saturating_sub(slippage_bps as u64));
    let floor = amount
        .checked_mul(unit)
        .map(|scaled| scaled / gross_share_value)
        .and_then(|expected| expected.checked_mul(tolerance))
        .map(|v| v / U256::from(BPS_DENOMINATOR))
        .unwrap_or(one);
    floor.max(one)
}

/// Service for buying and redeeming fund shares
#[derive(Clone)]
pub struct InvestmentService {
    base: Arc<BaseClient>,
    tokens: TokenService,
}

impl InvestmentService {
    pub fn new(base: Arc<BaseClient>, tokens: TokenService) -> Self {
        Self { base, tokens }
    }

    /// Deposit a human-entered amount of the denomination asset
    ///
    /// Approval and purchase are two sequential transactions. The balance is
    /// checked before either is submitted.
    pub async fn buy_shares(
        &self,
        conn: &dyn ChainConnection,
        comptroller: Address,
        amount: &str,
        options: DepositOptions,
    ) -> SdkResult<B256> {
        let investor = BaseClient::signer(conn)?;
        let asset = self
            .base
            .read(conn, comptroller, IComptroller::getDenominationAssetCall {})
            .await?;
        let decimals = self.tokens.decimals(conn, asset).await?;
        let amount = TokenAmount::parse(amount, decimals)?;

        let balance = TokenAmount::new(
            self.base
                .read(conn, asset, IERC20::balanceOfCall { account: investor })
                .await?,
            decimals,
        );
        let allowance = match options.approval {
            // covered by the approval submitted below
            ApprovalMode::Approve => amount,
            ApprovalMode::UseExisting => TokenAmount::new(
                self.base
                    .read(
                        conn,
                        asset,
                        IERC20::allowanceCall {
                            owner: investor,
                            spender: comptroller,
                        },
                    )
                    .await?,
                decimals,
            ),
        };
        validate_deposit(&amount, &balance, &allowance)?;

        let floor = options.min_shares.unwrap_or(MinShares::Slippage {
            bps: self.base.gas().default_slippage_bps,
        });
        let min_shares = match floor {
            MinShares::Exact(value) => value.max(U256::from(1u8)),
            MinShares::Slippage { bps } => {
                let gross_share_value = self
                    .base
                    .read(conn, comptroller, IComptroller::calcGrossShareValueCall {})
                    .await?;
                min_shares_for(amount.raw(), gross_share_value, bps)
            }
        };

        debug!(
            "buyShares amount {} ({} decimals, raw {}), min shares {}",
            amount,
            decimals,
            amount.raw(),
            min_shares
        );

        if options.approval == ApprovalMode::Approve {
            self.tokens
                .approve_raw(conn, asset, comptroller, amount.raw())
                .await?;
        }

        let call = IComptroller::buySharesCall {
            investmentAmount: amount.raw(),
            minSharesQuantity: min_shares,
        };
        let request = CallRequest::new(comptroller, call.abi_encode()).from(investor);
        let receipt = self.base.submit(conn, request, "Share purchase").await?;
        info!("Bought shares of {} for {}", comptroller, amount);
        Ok(receipt.tx_hash)
    }

    /// Redeem an 18-decimal share quantity in kind back to the signer
    ///
    /// No balance pre-check is made here; use `check_redemption` first.
    pub async fn redeem_shares(
        &self,
        conn: &dyn ChainConnection,
        comptroller: Address,
        shares: &str,
    ) -> SdkResult<B256> {
        let recipient = BaseClient::signer(conn)?;
        let shares = TokenAmount::parse_shares(shares)?;
        if shares.is_zero() {
            return Err(FundError::InvalidRequest(
                "redemption amount must be positive".into(),
            ));
        }

        let call = IComptroller::redeemSharesInKindCall {
            recipient,
            sharesQuantity: shares.raw(),
            additionalAssets: Vec::new(),
            assetsToSkip: Vec::new(),
        };
        let request = CallRequest::new(comptroller, call.abi_encode()).from(recipient);
        let receipt = self.base.submit(conn, request, "Share redemption").await?;
        info!("Redeemed {} shares of {}", shares, comptroller);
        Ok(receipt.tx_hash)
    }

    /// Validate a deposit against the investor's balance and allowance
    pub async fn check_deposit(
        &self,
        conn: &dyn ChainConnection,
        comptroller: Address,
        investor: Address,
        amount: &str,
    ) -> SdkResult<TokenAmount> {
        let asset = self
            .base
            .read(conn, comptroller, IComptroller::getDenominationAssetCall {})
            .await?;
        let (balance, allowance) = tokio::try_join!(
            self.tokens.balance(conn, asset, investor),
            self.tokens.allowance(conn, asset, investor, comptroller),
        )?;
        let requested = TokenAmount::parse(amount, balance.decimals())?;
        validate_deposit(&requested, &balance, &allowance)?;
        Ok(requested)
    }

    /// Validate a redemption against the holder's share balance
    pub async fn check_redemption(
        &self,
        conn: &dyn ChainConnection,
        vault: Address,
        holder: Address,
        shares: &str,
    ) -> SdkResult<TokenAmount> {
        let held = TokenAmount::shares(
            self.base
                .read(conn, vault, IVault::balanceOfCall { account: holder })
                .await?,
        );
        let requested = TokenAmount::parse_shares(shares)?;
        validate_redemption(&requested, &held)?;
        Ok(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(n: u64, decimals: u8) -> U256 {
        U256::from(n) * U256::from(10u8).pow(U256::from(decimals))
    }

    #[test]
    fn test_min_shares_at_unit_price() {
        // 100 USDC at 1 USDC per share
        let floor = min_shares_for(units(100, 6), units(1, 6), 100);
        assert_eq!(floor, units(99, 18));
    }

    #[test]
    fn test_min_shares_never_below_one() {
        assert_eq!(min_shares_for(U256::from(1u8), units(1, 18), 100), U256::from(1u8));
        assert_eq!(min_shares_for(units(5, 18), U256::ZERO, 100), U256::from(1u8));
        assert_eq!(min_shares_for(units(5, 18), units(1, 18), 10_000), U256::from(1u8));
    }

    #[test]
    fn test_zero_slippage_expects_full_amount() {
        // 105 WETH at 1.05 per share
        let gsv = U256::from(1_050_000_000_000_000_000u128);
        assert_eq!(min_shares_for(units(105, 18), gsv, 0), units(100, 18));
    }
}
