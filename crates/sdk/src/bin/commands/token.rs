// ERC20 token commands

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{
    utils::{fail, info, parse_address, success},
    Context,
};

#[derive(Args)]
pub struct TokenCmd {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Subcommand)]
enum TokenSubcommand {
    /// Approve a spender
    Approve {
        #[arg(long)]
        token: String,

        #[arg(long)]
        spender: String,

        /// Human-readable amount in the token's own precision
        #[arg(long)]
        amount: String,
    },

    /// Show the allowance granted by an owner to a spender
    Allowance {
        #[arg(long)]
        token: String,

        #[arg(long)]
        owner: String,

        #[arg(long)]
        spender: String,
    },

    /// Show a token balance
    Balance {
        #[arg(long)]
        token: String,

        #[arg(long)]
        owner: String,
    },
}

pub async fn execute(cmd: TokenCmd, ctx: &Context) -> Result<()> {
    match cmd.command {
        TokenSubcommand::Approve {
            token,
            spender,
            amount,
        } => {
            let conn = ctx.signer()?;
            match ctx
                .client
                .tokens
                .approve(&conn, parse_address(&token)?, parse_address(&spender)?, &amount)
                .await
            {
                Ok(tx_hash) => success(&format!("Approved {}! Transaction: {}", amount, tx_hash)),
                Err(err) => return fail(err),
            }
            Ok(())
        }

        TokenSubcommand::Allowance {
            token,
            owner,
            spender,
        } => {
            let conn = ctx.reader()?;
            let state = ctx
                .client
                .tokens
                .allowance_state(
                    &conn,
                    parse_address(&token)?,
                    parse_address(&owner)?,
                    parse_address(&spender)?,
                )
                .await?;
            info(&format!(
                "Allowance: {} ({} decimals)",
                state.allowance,
                state.decimals()
            ));
            Ok(())
        }

        TokenSubcommand::Balance { token, owner } => {
            let conn = ctx.reader()?;
            let balance = ctx
                .client
                .tokens
                .balance(&conn, parse_address(&token)?, parse_address(&owner)?)
                .await?;
            info(&format!("Balance: {}", balance));
            Ok(())
        }
    }
}
