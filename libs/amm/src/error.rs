//! Error types for the pricing engine
//!
//! Degenerate pool states (empty reserves) are not errors: the affected
//! calculations return neutral values instead. Everything here is a caller
//! contract violation that must surface before a transaction is built.

use crate::Amount;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// An input amount that must be positive was zero
    #[error("{what} must be positive")]
    ZeroAmount { what: &'static str },

    /// Pool fee is not in [0, FEE_DENOMINATOR)
    #[error("fee of {fee_bps} bps is outside [0, {max})")]
    FeeOutOfRange { fee_bps: u32, max: u32 },

    /// sqrt(amount_a * amount_b) does not exceed the permanently locked minimum
    #[error("initial liquidity too small: sqrt(a * b) = {root}, must exceed {minimum}")]
    InsufficientInitialLiquidity { root: Amount, minimum: u64 },

    /// A deposit into an initialised pool would mint nothing
    #[error("deposit mints zero LP tokens")]
    ZeroLiquidityMinted,

    /// Pool has issued shares but one of its reserves is empty
    #[error("pool has LP supply {total_supply} but an empty reserve")]
    EmptyReserves { total_supply: Amount },

    /// Withdrawal from a pool with no issued shares
    #[error("pool has no LP supply")]
    EmptySupply,

    /// Burning more LP tokens than exist
    #[error("cannot burn {lp_amount} LP tokens, total supply is {total_supply}")]
    BurnExceedsSupply { lp_amount: Amount, total_supply: Amount },

    /// Withdrawal percentage outside 1..=100
    #[error("withdrawal percentage {0} is outside 1..=100")]
    InvalidPercentage(u8),

    /// Slippage tolerance outside the configured policy
    #[error("slippage tolerance {pct}% is outside (0, {max}]")]
    InvalidSlippage { pct: Decimal, max: Decimal },

    /// Slippage tolerance that leaves no meaningful minimum amount
    #[error("slippage tolerance {0}% must be in (0, 100)")]
    SlippageOutOfRange(Decimal),

    /// Spending more than the wallet holds
    #[error("amount {amount} exceeds balance {balance}")]
    InsufficientBalance { amount: Amount, balance: Amount },

    /// Human-entered amount that is not a plain non-negative decimal
    #[error("invalid token amount: '{0}'")]
    InvalidAmount(String),

    /// Exchange rate does not fit in a Decimal
    #[error("exchange rate exceeds representable range")]
    RateOverflow,
}

pub type Result<T> = std::result::Result<T, AmmError>;
