// Adapter swap command

use anyhow::Result;
use clap::Args;
use fundhub_sdk::{BestEffort, SwapOrder};

use super::{
    utils::{info, parse_address, success, warn},
    Context,
};

#[derive(Args)]
pub struct SwapCmd {
    /// Comptroller proxy address
    #[arg(long)]
    comptroller: String,

    /// Token sold by the vault
    #[arg(long)]
    from_token: String,

    /// Token bought by the vault
    #[arg(long)]
    to_token: String,

    /// Amount sold
    #[arg(long)]
    amount: String,

    /// Minimum amount received
    #[arg(long)]
    min_received: String,

    #[arg(long, default_value_t = 18)]
    from_decimals: u8,

    #[arg(long, default_value_t = 18)]
    to_decimals: u8,

    /// Integration manager, overrides the configuration
    #[arg(long, requires = "adapter")]
    integration_manager: Option<String>,

    /// Uniswap V2 adapter, overrides the configuration
    #[arg(long, requires = "integration_manager")]
    adapter: Option<String>,
}

pub async fn execute(cmd: SwapCmd, ctx: &Context) -> Result<()> {
    let mut order = SwapOrder::new(
        parse_address(&cmd.comptroller)?,
        parse_address(&cmd.from_token)?,
        parse_address(&cmd.to_token)?,
        cmd.amount.clone(),
        cmd.min_received,
    )
    .with_decimals(cmd.from_decimals, cmd.to_decimals);
    if let (Some(manager), Some(adapter)) = (cmd.integration_manager, cmd.adapter) {
        order = order.with_integration(parse_address(&manager)?, parse_address(&adapter)?);
    }

    info(&format!("Swapping {}...", cmd.amount));
    let conn = ctx.signer()?;
    match ctx.client.extensions.swap_via_uniswap(&conn, &order).await {
        BestEffort::Completed(tx_hash) => success(&format!("Swap executed! Transaction: {}", tx_hash)),
        BestEffort::Skipped(err) => warn(&format!("Swap not executed: {}", err)),
    }

    Ok(())
}
