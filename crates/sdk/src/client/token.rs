use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolCall;
use fundhub_types::{TokenAllowanceState, TokenAmount};
use tracing::debug;

use crate::{
    client::BaseClient,
    connection::{CallRequest, ChainConnection},
    contracts::IERC20,
    error::SdkResult,
};

/// Service for ERC20 approvals, allowances and balances
///
/// Every operation re-queries the token's precision instead of trusting a
/// value the caller may have cached.
#[derive(Clone)]
pub struct TokenService {
    base: Arc<BaseClient>,
}

impl TokenService {
    pub fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn decimals(&self, conn: &dyn ChainConnection, token: Address) -> SdkResult<u8> {
        self.base.read(conn, token, IERC20::decimalsCall {}).await
    }

    /// Approve `spender` for a human-entered amount of `token`
    pub async fn approve(
        &self,
        conn: &dyn ChainConnection,
        token: Address,
        spender: Address,
        amount: &str,
    ) -> SdkResult<B256> {
        let decimals = self.decimals(conn, token).await?;
        let amount = TokenAmount::parse(amount, decimals)?;
        debug!(
            "Approving {} (raw {}, {} decimals) of {} for {}",
            amount,
            amount.raw(),
            decimals,
            token,
            spender
        );
        self.approve_raw(conn, token, spender, amount.raw()).await
    }

    pub(crate) async fn approve_raw(
        &self,
        conn: &dyn ChainConnection,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> SdkResult<B256> {
        let owner = BaseClient::signer(conn)?;
        let call = IERC20::approveCall { spender, amount };
        let request = CallRequest::new(token, call.abi_encode()).from(owner);
        let receipt = self.base.submit(conn, request, "Token approval").await?;
        Ok(receipt.tx_hash)
    }

    pub async fn allowance(
        &self,
        conn: &dyn ChainConnection,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> SdkResult<TokenAmount> {
        let (raw, decimals) = tokio::try_join!(
            self.base
                .read(conn, token, IERC20::allowanceCall { owner, spender }),
            self.decimals(conn, token),
        )?;
        Ok(TokenAmount::new(raw, decimals))
    }

    pub async fn balance(
        &self,
        conn: &dyn ChainConnection,
        token: Address,
        owner: Address,
    ) -> SdkResult<TokenAmount> {
        let (raw, decimals) = tokio::try_join!(
            self.base
                .read(conn, token, IERC20::balanceOfCall { account: owner }),
            self.decimals(conn, token),
        )?;
        Ok(TokenAmount::new(raw, decimals))
    }

    pub async fn allowance_state(
        &self,
        conn: &dyn ChainConnection,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> SdkResult<TokenAllowanceState> {
        let allowance = self.allowance(conn, token, owner, spender).await?;
        Ok(TokenAllowanceState {
            owner,
            spender,
            token,
            allowance,
        })
    }
}
