//! Quote calculator for constant-product pools
//!
//! Usage:
//!   dex-quote swap --reserve-a 1000000 --reserve-b 4000000 --amount 0.001 --decimals-in 9 --decimals-out 6
//!   dex-quote add --reserve-a 1000000 --reserve-b 4000000 --supply 2000000 --amount-a 0.1 --decimals-a 6
//!   dex-quote add --reserve-a 0 --reserve-b 0 --amount-a 1 --decimals-a 6 --amount-b 4 --decimals-b 6
//!   dex-quote remove --reserve-a 1000000 --reserve-b 4000000 --supply 2000000 --lp-balance 500000 --percentage 25
//!   dex-quote position --reserve-a 1000000 --reserve-b 4000000 --supply 2000000 --lp-balance 500000

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dex_amm::{
    format_units, human_rate, parse_units, Amount, ConstantProduct, Decimal, PoolSnapshot,
    PositionView, QuoteCalculator, SwapDirection,
};
use dex_config::{init_tracing, load_config, DexConfig};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{info, warn};

/// Fractional digits shown for human-readable amounts
const DISPLAY_DECIMALS: u8 = 6;

#[derive(Parser, Debug)]
#[command(name = "dex-quote")]
#[command(about = "Quote swaps and liquidity operations against a pool snapshot")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote a swap
    Swap {
        #[command(flatten)]
        pool: PoolArgs,
        /// Input amount in whole tokens
        #[arg(long)]
        amount: String,
        #[arg(long, value_enum, default_value_t = Side::AToB)]
        direction: Side,
        #[arg(long)]
        decimals_in: u8,
        #[arg(long)]
        decimals_out: u8,
        /// Slippage tolerance in percent
        #[arg(long)]
        slippage: Option<Decimal>,
        /// Wallet balance of the input token in whole tokens
        #[arg(long)]
        balance: Option<String>,
    },
    /// Quote adding liquidity; token B is paired at the pool ratio when omitted
    Add {
        #[command(flatten)]
        pool: PoolArgs,
        /// Token A amount in whole tokens
        #[arg(long)]
        amount_a: String,
        /// Token B amount in whole tokens
        #[arg(long, requires = "decimals_b")]
        amount_b: Option<String>,
        #[arg(long)]
        decimals_a: u8,
        #[arg(long)]
        decimals_b: Option<u8>,
        #[arg(long)]
        slippage: Option<Decimal>,
        /// Wallet balance of token A in whole tokens
        #[arg(long)]
        balance_a: Option<String>,
        /// Wallet balance of token B in whole tokens
        #[arg(long, requires = "decimals_b")]
        balance_b: Option<String>,
    },
    /// Quote removing a percentage of an LP balance
    Remove {
        #[command(flatten)]
        pool: PoolArgs,
        /// LP balance in base units
        #[arg(long)]
        lp_balance: Amount,
        #[arg(long)]
        percentage: u8,
        #[arg(long)]
        slippage: Option<Decimal>,
    },
    /// Value an LP balance
    Position {
        #[command(flatten)]
        pool: PoolArgs,
        /// LP balance in base units
        #[arg(long)]
        lp_balance: Amount,
    },
}

/// Pool snapshot, all amounts in base units
#[derive(Args, Debug)]
struct PoolArgs {
    #[arg(long)]
    reserve_a: Amount,
    #[arg(long)]
    reserve_b: Amount,
    #[arg(long, default_value = "0")]
    supply: Amount,
    /// Pool fee in basis points, defaults to the configured fee
    #[arg(long)]
    fee_bps: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Side {
    AToB,
    BToA,
}

impl From<Side> for SwapDirection {
    fn from(side: Side) -> Self {
        match side {
            Side::AToB => SwapDirection::AToB,
            Side::BToA => SwapDirection::BToA,
        }
    }
}

impl PoolArgs {
    fn snapshot(self, default_fee_bps: u32) -> PoolSnapshot {
        PoolSnapshot::new(
            self.reserve_a,
            self.reserve_b,
            self.supply,
            self.fee_bps.unwrap_or(default_fee_bps),
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    let output = run(cli.command, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Scale an optional human balance and reject `amount` if it needs more
fn check_balance(amount: &Amount, balance: Option<&str>, decimals: u8) -> Result<()> {
    if let Some(balance) = balance {
        let balance = parse_units(balance, decimals)?;
        ConstantProduct::check_balance(amount, &balance)?;
    }
    Ok(())
}

fn run(command: Command, config: &DexConfig) -> Result<Value> {
    let default_fee_bps = config.pricing.default_fee_bps;
    let calculator = QuoteCalculator::new(config.slippage.clone());

    let output = match command {
        Command::Swap {
            pool,
            amount,
            direction,
            decimals_in,
            decimals_out,
            slippage,
            balance,
        } => {
            let pool = pool.snapshot(default_fee_bps);
            let direction = SwapDirection::from(direction);
            let amount_in = parse_units(&amount, decimals_in)?;
            check_balance(&amount_in, balance.as_deref(), decimals_in)?;
            info!(%amount_in, ?direction, "quoting swap");

            let quote = calculator.quote_swap(&pool, direction, &amount_in, slippage)?;
            let (reserve_in, reserve_out) = pool.reserves(direction);
            let rate = match human_rate(reserve_in, reserve_out, decimals_in, decimals_out) {
                Ok(rate) => Some(rate),
                Err(err) => {
                    warn!(%err, "exchange rate omitted from quote");
                    None
                }
            };
            let amount_out = format_units(&quote.amount_out, decimals_out, DISPLAY_DECIMALS);
            let min_amount_out = format_units(&quote.min_amount_out, decimals_out, DISPLAY_DECIMALS);
            json!({
                "quote": quote,
                "amount_out": amount_out,
                "min_amount_out": min_amount_out,
                "rate": rate,
            })
        }
        Command::Add {
            pool,
            amount_a,
            amount_b,
            decimals_a,
            decimals_b,
            slippage,
            balance_a,
            balance_b,
        } => {
            let pool = pool.snapshot(default_fee_bps);
            let amount_a = parse_units(&amount_a, decimals_a)?;
            check_balance(&amount_a, balance_a.as_deref(), decimals_a)?;
            info!(%amount_a, initialized = pool.is_initialized(), "quoting deposit");

            let quote = match amount_b {
                Some(amount_b) => {
                    let decimals_b = decimals_b.context("--decimals-b is required with --amount-b")?;
                    let amount_b = parse_units(&amount_b, decimals_b)?;
                    calculator.quote_add_liquidity(&pool, &amount_a, &amount_b, slippage)?
                }
                None => calculator.quote_balanced_add(&pool, &amount_a, slippage)?,
            };
            if let Some(balance_b) = balance_b.as_deref() {
                let decimals_b = decimals_b.context("--decimals-b is required with --balance-b")?;
                check_balance(&quote.amount_b, Some(balance_b), decimals_b)?;
            }
            json!({ "quote": quote })
        }
        Command::Remove {
            pool,
            lp_balance,
            percentage,
            slippage,
        } => {
            let pool = pool.snapshot(default_fee_bps);
            info!(%lp_balance, percentage, "quoting withdrawal");

            let quote = calculator.quote_remove_liquidity(&pool, &lp_balance, percentage, slippage)?;
            json!({ "quote": quote })
        }
        Command::Position { pool, lp_balance } => {
            let pool = pool.snapshot(default_fee_bps);
            json!({ "position": PositionView::from_snapshot(&lp_balance, &pool) })
        }
    };

    Ok(output)
}
