// Fund deployment and query commands

use anyhow::Result;
use clap::{Args, Subcommand};
use fundhub_sdk::{BestEffort, EntranceFee, FundDeploymentRequest};

use super::{
    utils::{fail, info, parse_address, parse_addresses, success, warn},
    Context,
};

#[derive(Args)]
pub struct FundCmd {
    #[command(subcommand)]
    command: FundSubcommand,
}

#[derive(Subcommand)]
enum FundSubcommand {
    /// Deploy a new fund
    Create {
        /// Fund name
        #[arg(long)]
        name: String,

        /// Fund share symbol
        #[arg(long)]
        symbol: String,

        /// Denomination asset address
        #[arg(long)]
        asset: String,

        /// Entrance fee in basis points, 0 disables the fee
        #[arg(long, default_value_t = 100)]
        entrance_fee_bps: u16,

        /// Entrance fee recipient (defaults to the signer)
        #[arg(long)]
        fee_recipient: Option<String>,

        /// Comma-separated depositor whitelist
        #[arg(long)]
        whitelist: Option<String>,

        /// Fund owner (defaults to the signer)
        #[arg(long)]
        manager: Option<String>,
    },

    /// Show fund state
    Info {
        /// Vault proxy address
        #[arg(long)]
        vault: String,

        /// Comptroller proxy address
        #[arg(long)]
        comptroller: String,
    },

    /// Show a holder's share balance
    Position {
        /// Vault proxy address
        #[arg(long)]
        vault: String,

        /// Holder address
        #[arg(long)]
        holder: String,
    },
}

pub async fn execute(cmd: FundCmd, ctx: &Context) -> Result<()> {
    match cmd.command {
        FundSubcommand::Create {
            name,
            symbol,
            asset,
            entrance_fee_bps,
            fee_recipient,
            whitelist,
            manager,
        } => {
            info(&format!("Deploying fund {} ({})...", name, symbol));

            let mut request = FundDeploymentRequest::new(name, symbol, parse_address(&asset)?);
            if entrance_fee_bps > 0 {
                let mut fee = EntranceFee::new(entrance_fee_bps);
                if let Some(recipient) = fee_recipient {
                    fee = fee.with_recipient(parse_address(&recipient)?);
                }
                request = request.with_entrance_fee(fee);
            }
            if let Some(list) = whitelist {
                request = request.with_whitelist(parse_addresses(&list)?);
            }
            if let Some(manager) = manager {
                request = request.with_manager(parse_address(&manager)?);
            }

            let conn = ctx.signer()?;
            let deployment = match ctx.client.deployment.create_fund(&conn, &request).await {
                Ok(deployment) => deployment,
                Err(err) => return fail(err),
            };

            success(&format!("Fund deployed! Transaction: {}", deployment.tx_hash));
            info(&format!("Vault proxy: {}", deployment.handle.vault_proxy));
            info(&format!(
                "Comptroller proxy: {}",
                deployment.handle.comptroller_proxy
            ));
            match deployment.whitelist {
                Some(BestEffort::Completed(list)) => info(&format!(
                    "Deposit whitelist: list {} ({} addresses)",
                    list.list_id,
                    list.members.len()
                )),
                Some(BestEffort::Skipped(err)) => {
                    warn(&format!("Deployed without deposit whitelist: {}", err))
                }
                None => {}
            }

            Ok(())
        }

        FundSubcommand::Info { vault, comptroller } => {
            info("Fetching fund state...");

            let conn = ctx.reader()?;
            let snapshot = ctx
                .client
                .funds
                .fund_snapshot(&conn, parse_address(&vault)?, parse_address(&comptroller)?)
                .await?;

            info(&format!("Name: {} ({})", snapshot.name, snapshot.symbol));
            info(&format!("Total shares: {}", snapshot.total_shares));
            info(&format!("Gross asset value: {}", snapshot.total_assets));
            info(&format!("Share price: {}", snapshot.share_price));
            info(&format!("Denomination asset: {}", snapshot.denomination_asset));

            Ok(())
        }

        FundSubcommand::Position { vault, holder } => {
            let conn = ctx.reader()?;
            let shares = ctx
                .client
                .funds
                .position(&conn, parse_address(&vault)?, parse_address(&holder)?)
                .await?;

            info(&format!("Shares held: {}", shares));

            Ok(())
        }
    }
}
