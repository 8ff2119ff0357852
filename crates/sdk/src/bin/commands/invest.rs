// Deposit and redemption commands

use anyhow::Result;
use clap::{Args, Subcommand};
use fundhub_sdk::{ApprovalMode, ChainConnection, DepositOptions, MinShares};

use super::{
    utils::{fail, info, parse_address, success},
    Context,
};

#[derive(Args)]
pub struct InvestCmd {
    #[command(subcommand)]
    command: InvestSubcommand,
}

#[derive(Subcommand)]
enum InvestSubcommand {
    /// Buy shares with the denomination asset
    Buy {
        /// Comptroller proxy address
        #[arg(long)]
        comptroller: String,

        /// Amount of the denomination asset
        #[arg(long)]
        amount: String,

        /// Tolerated shortfall of received shares in basis points
        #[arg(long)]
        slippage_bps: Option<u16>,

        /// Use the existing allowance instead of approving first
        #[arg(long)]
        skip_approval: bool,
    },

    /// Redeem shares in kind
    Redeem {
        /// Comptroller proxy address
        #[arg(long)]
        comptroller: String,

        /// Vault proxy address, enables the share balance check
        #[arg(long)]
        vault: Option<String>,

        /// Share quantity
        #[arg(long)]
        shares: String,
    },
}

pub async fn execute(cmd: InvestCmd, ctx: &Context) -> Result<()> {
    match cmd.command {
        InvestSubcommand::Buy {
            comptroller,
            amount,
            slippage_bps,
            skip_approval,
        } => {
            info(&format!("Buying shares for {}...", amount));

            let mut options = DepositOptions::default();
            if skip_approval {
                options = options.with_approval(ApprovalMode::UseExisting);
            }
            if let Some(bps) = slippage_bps {
                options = options.with_min_shares(MinShares::Slippage { bps });
            }

            let conn = ctx.signer()?;
            match ctx
                .client
                .investment
                .buy_shares(&conn, parse_address(&comptroller)?, &amount, options)
                .await
            {
                Ok(tx_hash) => success(&format!("Shares bought! Transaction: {}", tx_hash)),
                Err(err) => return fail(err),
            }

            Ok(())
        }

        InvestSubcommand::Redeem {
            comptroller,
            vault,
            shares,
        } => {
            let conn = ctx.signer()?;

            if let (Some(vault), Some(holder)) = (vault, conn.account()) {
                if let Err(err) = ctx
                    .client
                    .investment
                    .check_redemption(&conn, parse_address(&vault)?, holder, &shares)
                    .await
                {
                    return fail(err);
                }
            }

            info(&format!("Redeeming {} shares...", shares));
            match ctx
                .client
                .investment
                .redeem_shares(&conn, parse_address(&comptroller)?, &shares)
                .await
            {
                Ok(tx_hash) => success(&format!("Shares redeemed! Transaction: {}", tx_hash)),
                Err(err) => return fail(err),
            }

            Ok(())
        }
    }
}
