// CLI tool for fundhub
//
// This binary provides a command-line interface to the fund client, covering
// fund deployment, deposits and redemptions, token approvals, address lists
// and adapter swaps.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::Context;

#[derive(Parser)]
#[command(name = "fundhub")]
#[command(about = "Fundhub vault CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the client configuration file
    #[arg(long, default_value = "fundhub.toml")]
    config: String,

    /// RPC URL, overrides the configuration file
    #[arg(long)]
    rpc_url: Option<String>,

    /// Hex-encoded private key used to sign transactions
    #[arg(long, env = "FUNDHUB_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fund deployment and state queries
    Fund(commands::fund::FundCmd),

    /// Buy and redeem fund shares
    Invest(commands::invest::InvestCmd),

    /// ERC20 approvals, allowances and balances
    Token(commands::token::TokenCmd),

    /// Address lists for deposit whitelists
    List(commands::list::ListCmd),

    /// Swap vault assets through the Uniswap V2 adapter
    Swap(commands::swap::SwapCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    commands::utils::init_logging(&cli.log_level);

    let ctx = Context::load(&cli.config, cli.rpc_url.as_deref(), cli.private_key)?;

    // Execute command
    match cli.command {
        Commands::Fund(cmd) => commands::fund::execute(cmd, &ctx).await,
        Commands::Invest(cmd) => commands::invest::execute(cmd, &ctx).await,
        Commands::Token(cmd) => commands::token::execute(cmd, &ctx).await,
        Commands::List(cmd) => commands::list::execute(cmd, &ctx).await,
        Commands::Swap(cmd) => commands::swap::execute(cmd, &ctx).await,
    }
}
