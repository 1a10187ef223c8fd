//! Derived view of an LP position
//!
//! Positions are owned by the pool contract. This only recomputes what an LP
//! balance is worth against a given snapshot.

use crate::units::{amount_string, ratio_to_decimal};
use crate::{Amount, PoolSnapshot};
use num_traits::Zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fractional digits kept for a position's pool share
pub const POSITION_SHARE_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    #[serde(with = "amount_string")]
    pub lp_balance: Amount,
    #[serde(with = "amount_string")]
    pub amount_a: Amount,
    #[serde(with = "amount_string")]
    pub amount_b: Amount,
    /// Percent of total LP supply, truncated to two decimals
    pub share_pct: Decimal,
}

impl PositionView {
    /// Value `lp_balance` against a pool snapshot
    ///
    /// A pool with no LP supply values every balance at zero.
    pub fn from_snapshot(lp_balance: &Amount, pool: &PoolSnapshot) -> Self {
        if pool.total_supply.is_zero() {
            debug!(%lp_balance, "pool has no LP supply, position is empty");
            return Self {
                lp_balance: lp_balance.clone(),
                amount_a: Amount::zero(),
                amount_b: Amount::zero(),
                share_pct: Decimal::ZERO,
            };
        }

        let amount_a = lp_balance * &pool.reserve_a / &pool.total_supply;
        let amount_b = lp_balance * &pool.reserve_b / &pool.total_supply;
        let share_bps = lp_balance * 10_000u32 / &pool.total_supply;
        let share_pct = ratio_to_decimal(&share_bps, &Amount::from(100u32), POSITION_SHARE_SCALE)
            .unwrap_or(Decimal::ZERO);

        Self {
            lp_balance: lp_balance.clone(),
            amount_a,
            amount_b,
            share_pct,
        }
    }
}
