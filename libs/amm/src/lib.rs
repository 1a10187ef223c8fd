//! # DEX AMM Library - Constant-Product Pricing Engine
//!
//! ## Purpose
//!
//! Exact integer math for a constant-product DEX: swap output, price impact,
//! LP-token issuance and proportional withdrawal, plus the quote helpers a
//! front-end needs to turn those numbers into transaction parameters. All
//! chain-state mutation happens in the pool contract; this library only
//! reproduces its arithmetic from a reserve snapshot.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool reserve snapshots and token decimals read from chain state
//! - **Output Destinations**: Swap and liquidity forms, transaction builders, position views
//! - **Precision**: Arbitrary-precision integers for every amount; Decimal only for display ratios
//! - **Rounding**: Floor everywhere, multiply before divide, matching the contract
//!
//! ## Architecture Role
//!
//! [`ConstantProduct`] holds the canonical formulas. [`PoolSnapshot`],
//! [`QuoteCalculator`] and [`PositionView`] compose them; [`units`] converts
//! between human strings and base units. Nothing here keeps state between
//! calls, so every function is safe to call from any thread.

pub mod constant_product;
pub mod error;
pub mod pool;
pub mod position;
pub mod quote;
pub mod units;

pub use constant_product::{
    ConstantProduct, DEFAULT_FEE_BPS, FEE_DENOMINATOR, IMPACT_SCALE, MINIMUM_LIQUIDITY,
};
pub use error::{AmmError, Result};
pub use pool::{PoolSnapshot, SwapDirection};
pub use position::PositionView;
pub use quote::{LiquidityQuote, QuoteCalculator, SwapQuote, WithdrawalQuote};
pub use units::{format_units, human_rate, parse_units};

/// Token amount in a token's smallest unit
pub type Amount = num_bigint::BigUint;

/// Common types for AMM calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
