use std::sync::Arc;

use alloy::primitives::Address;
use fundhub_types::{FundSnapshot, TokenAmount};

use crate::{
    client::BaseClient,
    connection::ChainConnection,
    contracts::{IComptroller, IVault},
    error::SdkResult,
};

/// Service for reading fund state
#[derive(Clone)]
pub struct FundQueryService {
    base: Arc<BaseClient>,
}

impl FundQueryService {
    pub fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Read the fund state fresh from the chain
    ///
    /// All six reads run concurrently; any failure fails the whole query.
    pub async fn fund_snapshot(
        &self,
        conn: &dyn ChainConnection,
        vault: Address,
        comptroller: Address,
    ) -> SdkResult<FundSnapshot> {
        let (name, symbol, total_supply, gav, gross_share_value, denomination_asset) = tokio::try_join!(
            self.base.read(conn, vault, IVault::nameCall {}),
            self.base.read(conn, vault, IVault::symbolCall {}),
            self.base.read(conn, vault, IVault::totalSupplyCall {}),
            self.base.read(conn, comptroller, IComptroller::calcGavCall {}),
            self.base
                .read(conn, comptroller, IComptroller::calcGrossShareValueCall {}),
            self.base
                .read(conn, comptroller, IComptroller::getDenominationAssetCall {}),
        )?;

        Ok(FundSnapshot {
            name,
            symbol,
            total_shares: TokenAmount::shares(total_supply),
            total_assets: TokenAmount::shares(gav),
            share_price: TokenAmount::shares(gross_share_value),
            denomination_asset,
            vault_proxy: vault,
            comptroller_proxy: comptroller,
        })
    }

    /// Share balance of `holder` in the vault
    pub async fn position(
        &self,
        conn: &dyn ChainConnection,
        vault: Address,
        holder: Address,
    ) -> SdkResult<TokenAmount> {
        let raw = self
            .base
            .read(conn, vault, IVault::balanceOfCall { account: holder })
            .await?;
        Ok(TokenAmount::shares(raw))
    }
}
