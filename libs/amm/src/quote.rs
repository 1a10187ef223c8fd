//! Swap and liquidity quotes for transaction builders
//!
//! Combines the constant-product functions with a slippage tolerance into
//! the numbers a form displays and the minimum amounts a transaction
//! carries. A quote is tied to the snapshot it was computed from; callers
//! recompute whenever the amount, pool or direction changes.

use crate::error::{AmmError, Result};
use crate::units::amount_string;
use crate::{Amount, ConstantProduct, PoolSnapshot, SwapDirection};
use dex_config::SlippageSettings;
use num_traits::Zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Swap quote against one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub direction: SwapDirection,
    #[serde(with = "amount_string")]
    pub amount_in: Amount,
    #[serde(with = "amount_string")]
    pub amount_out: Amount,
    /// Portion of `amount_in` kept by the pool as fee
    #[serde(with = "amount_string")]
    pub fee_amount: Amount,
    pub price_impact_pct: Decimal,
    /// Lower bound passed to the swap transaction
    #[serde(with = "amount_string")]
    pub min_amount_out: Amount,
    pub has_liquidity: bool,
}

impl SwapQuote {
    /// Quote for a pool that cannot fill the trade
    pub fn no_liquidity(direction: SwapDirection, amount_in: Amount) -> Self {
        Self {
            direction,
            amount_in,
            amount_out: Amount::zero(),
            fee_amount: Amount::zero(),
            price_impact_pct: Decimal::ZERO,
            min_amount_out: Amount::zero(),
            has_liquidity: false,
        }
    }
}

/// Add-liquidity quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityQuote {
    #[serde(with = "amount_string")]
    pub amount_a: Amount,
    #[serde(with = "amount_string")]
    pub amount_b: Amount,
    #[serde(with = "amount_string")]
    pub lp_minted: Amount,
    /// Lower bound passed to the add-liquidity transaction
    #[serde(with = "amount_string")]
    pub min_lp_minted: Amount,
    /// Estimated share of the pool after the deposit, in percent
    pub share_pct: Decimal,
}

/// Remove-liquidity quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalQuote {
    #[serde(with = "amount_string")]
    pub lp_amount: Amount,
    #[serde(with = "amount_string")]
    pub amount_a: Amount,
    #[serde(with = "amount_string")]
    pub amount_b: Amount,
    #[serde(with = "amount_string")]
    pub min_amount_a: Amount,
    #[serde(with = "amount_string")]
    pub min_amount_b: Amount,
}

/// Builds quotes under a slippage policy
pub struct QuoteCalculator {
    slippage: SlippageSettings,
}

impl QuoteCalculator {
    pub fn new(slippage: SlippageSettings) -> Self {
        Self { slippage }
    }

    /// Quote selling `amount_in` into `pool`
    ///
    /// An empty pool, or a trade too small to produce any output, yields
    /// [`SwapQuote::no_liquidity`] rather than an error.
    pub fn quote_swap(
        &self,
        pool: &PoolSnapshot,
        direction: SwapDirection,
        amount_in: &Amount,
        slippage_pct: Option<Decimal>,
    ) -> Result<SwapQuote> {
        let slippage_pct = self.resolve_slippage(slippage_pct)?;
        let amount_out = pool.get_amount_out(amount_in, direction)?;
        if amount_out.is_zero() {
            debug!(%amount_in, ?direction, "swap produces no output");
            return Ok(SwapQuote::no_liquidity(direction, amount_in.clone()));
        }

        let (reserve_in, reserve_out) = pool.reserves(direction);
        let price_impact_pct =
            ConstantProduct::calculate_price_impact(amount_in, &amount_out, reserve_in, reserve_out);
        let fee_amount = ConstantProduct::calculate_swap_fee(amount_in, pool.fee_bps)?;
        let min_amount_out = ConstantProduct::min_amount_with_slippage(&amount_out, slippage_pct)?;

        debug!(
            %amount_in,
            %amount_out,
            %price_impact_pct,
            %min_amount_out,
            "swap quoted"
        );

        Ok(SwapQuote {
            direction,
            amount_in: amount_in.clone(),
            amount_out,
            fee_amount,
            price_impact_pct,
            min_amount_out,
            has_liquidity: true,
        })
    }

    /// Quote depositing exactly `amount_a` and `amount_b`
    pub fn quote_add_liquidity(
        &self,
        pool: &PoolSnapshot,
        amount_a: &Amount,
        amount_b: &Amount,
        slippage_pct: Option<Decimal>,
    ) -> Result<LiquidityQuote> {
        let slippage_pct = self.resolve_slippage(slippage_pct)?;

        let lp_minted = pool.get_lp_mint(amount_a, amount_b)?;
        let min_lp_minted = ConstantProduct::min_amount_with_slippage(&lp_minted, slippage_pct)?;
        let share_pct = ConstantProduct::share_after_deposit(amount_a, &pool.reserve_a);

        Ok(LiquidityQuote {
            amount_a: amount_a.clone(),
            amount_b: amount_b.clone(),
            lp_minted,
            min_lp_minted,
            share_pct,
        })
    }

    /// Quote depositing `amount_a` plus the token B amount matching the
    /// pool's current ratio
    ///
    /// An uninitialised pool has no ratio to follow; use
    /// [`quote_add_liquidity`](Self::quote_add_liquidity) with both amounts.
    pub fn quote_balanced_add(
        &self,
        pool: &PoolSnapshot,
        amount_a: &Amount,
        slippage_pct: Option<Decimal>,
    ) -> Result<LiquidityQuote> {
        let amount_b = ConstantProduct::paired_amount(amount_a, &pool.reserve_a, &pool.reserve_b)
            .ok_or_else(|| AmmError::EmptyReserves {
                total_supply: pool.total_supply.clone(),
            })?;
        self.quote_add_liquidity(pool, amount_a, &amount_b, slippage_pct)
    }

    /// Quote burning `percentage` percent of `lp_balance`
    pub fn quote_remove_liquidity(
        &self,
        pool: &PoolSnapshot,
        lp_balance: &Amount,
        percentage: u8,
        slippage_pct: Option<Decimal>,
    ) -> Result<WithdrawalQuote> {
        let slippage_pct = self.resolve_slippage(slippage_pct)?;

        let lp_amount = ConstantProduct::lp_for_percentage(lp_balance, percentage)?;
        let (amount_a, amount_b) = pool.get_withdrawal(&lp_amount)?;
        let min_amount_a = ConstantProduct::min_amount_with_slippage(&amount_a, slippage_pct)?;
        let min_amount_b = ConstantProduct::min_amount_with_slippage(&amount_b, slippage_pct)?;

        Ok(WithdrawalQuote {
            lp_amount,
            amount_a,
            amount_b,
            min_amount_a,
            min_amount_b,
        })
    }

    fn resolve_slippage(&self, requested: Option<Decimal>) -> Result<Decimal> {
        let pct = requested.unwrap_or(self.slippage.default_pct);
        if !self.slippage.is_valid(pct) {
            return Err(AmmError::InvalidSlippage {
                pct,
                max: self.slippage.max_pct,
            });
        }
        if self.slippage.is_high(pct) {
            warn!(%pct, "high slippage tolerance may result in an unfavorable trade");
        }
        Ok(pct)
    }
}

impl Default for QuoteCalculator {
    fn default() -> Self {
        Self::new(SlippageSettings::default())
    }
}
