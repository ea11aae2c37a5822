//! Joyería CLI - read-only reports against the store API.
//!
//! # Usage
//!
//! ```bash
//! # Register totals: balances, receivables, payables, net
//! joyeria-cli cash
//!
//! # Debts owed by clients, in progress only
//! joyeria-cli debts receivable
//!
//! # Every debt owed to suppliers
//! joyeria-cli debts payable --status Todos
//!
//! # Grams on hand per gold grade
//! joyeria-cli inventory
//!
//! # Next payments due on both sides
//! joyeria-cli upcoming
//! ```
//!
//! The API location comes from the same `JOYERIA_API_*` variables as the
//! web binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "joyeria-cli")]
#[command(author, version, about = "Jewelry back-office reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the register summary
    Cash,
    /// List debts grouped by party
    Debts {
        /// Which side of the ledger
        #[arg(value_enum)]
        side: DebtSide,

        /// Status name to keep (`Todos` keeps every status)
        #[arg(short, long, default_value = "En Proceso")]
        status: String,
    },
    /// Print gold summaries per grade
    Inventory,
    /// List the next payments due
    Upcoming,
}

#[derive(Clone, Copy, ValueEnum)]
enum DebtSide {
    /// Owed to the store by clients
    Receivable,
    /// Owed by the store to suppliers
    Payable,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "joyeria_cli=info,joyeria_admin=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let api = commands::connect()?;
    match cli.command {
        Commands::Cash => commands::cash::summary(&api).await?,
        Commands::Debts { side, status } => {
            let side = match side {
                DebtSide::Receivable => commands::debts::Side::Receivable,
                DebtSide::Payable => commands::debts::Side::Payable,
            };
            commands::debts::list(&api, side, &status).await?;
        }
        Commands::Inventory => commands::inventory::summary(&api).await?,
        Commands::Upcoming => commands::debts::upcoming(&api).await?,
    }
    Ok(())
}
