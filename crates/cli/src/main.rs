//! Lendcore CLI - main entry point

use clap::{Parser, Subcommand};
use lendcore_cli::{commands, Mantissa};

#[derive(Parser)]
#[command(name = "lendcore")]
#[command(about = "Lendcore - collateralized lending risk engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a canned two-market scenario and print its events
    Demo,

    /// Evaluate account liquidity for a single-market position
    Liquidity {
        /// Pool token balance
        balance: u128,
        /// Outstanding borrow, in underlying units
        #[arg(long, default_value_t = 0)]
        borrow: u128,
        /// Collateral factor, e.g. 0.75
        #[arg(long, default_value = "0.5")]
        collateral_factor: Mantissa,
        /// Underlying price
        #[arg(long, default_value = "1")]
        price: Mantissa,
        /// Pool exchange rate
        #[arg(long, default_value = "1")]
        exchange_rate: Mantissa,
        /// Hypothetical withdrawal, in pool tokens
        #[arg(long, default_value_t = 0)]
        redeem: u128,
        /// Hypothetical extra borrow, in underlying units
        #[arg(long, default_value_t = 0)]
        borrow_more: u128,
    },

    /// Compute collateral tokens seized for a repayment
    Seize {
        /// Repaid amount of the borrowed underlying
        repay: u128,
        /// Liquidation incentive, e.g. 1.1
        #[arg(long, default_value = "1")]
        incentive: Mantissa,
        /// Price of the borrowed underlying
        #[arg(long, default_value = "1")]
        price_borrowed: Mantissa,
        /// Price of the collateral underlying
        #[arg(long, default_value = "1")]
        price_collateral: Mantissa,
        /// Collateral pool exchange rate
        #[arg(long, default_value = "1")]
        exchange_rate: Mantissa,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Demo => commands::demo(),
        Commands::Liquidity {
            balance,
            borrow,
            collateral_factor,
            price,
            exchange_rate,
            redeem,
            borrow_more,
        } => commands::liquidity(
            balance,
            borrow,
            collateral_factor,
            price,
            exchange_rate,
            redeem,
            borrow_more,
        ),
        Commands::Seize {
            repay,
            incentive,
            price_borrowed,
            price_collateral,
            exchange_rate,
        } => commands::seize(
            repay,
            incentive,
            price_borrowed,
            price_collateral,
            exchange_rate,
        ),
    }
}
