// Address list commands

use anyhow::Result;
use clap::{Args, Subcommand};
use fundhub_sdk::BestEffort;

use super::{
    utils::{info, parse_addresses, success, warn},
    Context,
};

#[derive(Args)]
pub struct ListCmd {
    #[command(subcommand)]
    command: ListSubcommand,
}

#[derive(Subcommand)]
enum ListSubcommand {
    /// Create a fixed address list owned by the signer
    Create {
        /// Comma-separated member addresses
        #[arg(long)]
        addresses: String,
    },
}

pub async fn execute(cmd: ListCmd, ctx: &Context) -> Result<()> {
    match cmd.command {
        ListSubcommand::Create { addresses } => {
            let members = parse_addresses(&addresses)?;
            info(&format!("Creating address list with {} members...", members.len()));

            let conn = ctx.signer()?;
            match ctx.client.address_lists.create_list(&conn, &members).await {
                BestEffort::Completed(list) => {
                    success(&format!("Address list created! List ID: {}", list.list_id))
                }
                BestEffort::Skipped(err) => warn(&format!("Address list not created: {}", err)),
            }

            Ok(())
        }
    }
}
