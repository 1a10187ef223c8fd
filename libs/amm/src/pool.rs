//! Pool snapshot and swap direction

use crate::error::Result;
use crate::units::amount_string;
use crate::{Amount, ConstantProduct};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Which side of the pair is sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    AToB,
    BToA,
}

/// Reserves, LP supply and fee of one pool as read from chain state.
///
/// A quote computed from a snapshot is only valid against that snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    #[serde(with = "amount_string")]
    pub reserve_a: Amount,
    #[serde(with = "amount_string")]
    pub reserve_b: Amount,
    #[serde(with = "amount_string")]
    pub total_supply: Amount,
    pub fee_bps: u32, // Fee in basis points (30 = 0.3%)
}

impl PoolSnapshot {
    pub fn new(reserve_a: Amount, reserve_b: Amount, total_supply: Amount, fee_bps: u32) -> Self {
        Self {
            reserve_a,
            reserve_b,
            total_supply,
            fee_bps,
        }
    }

    /// Pool before its first deposit
    pub fn empty(fee_bps: u32) -> Self {
        Self::new(Amount::zero(), Amount::zero(), Amount::zero(), fee_bps)
    }

    /// Both reserves non-zero, so trades are possible
    pub fn is_initialized(&self) -> bool {
        !self.reserve_a.is_zero() && !self.reserve_b.is_zero()
    }

    /// `(reserve_in, reserve_out)` for a direction
    pub fn reserves(&self, direction: SwapDirection) -> (&Amount, &Amount) {
        match direction {
            SwapDirection::AToB => (&self.reserve_a, &self.reserve_b),
            SwapDirection::BToA => (&self.reserve_b, &self.reserve_a),
        }
    }

    /// Swap output against this snapshot's reserves and fee
    pub fn get_amount_out(&self, amount_in: &Amount, direction: SwapDirection) -> Result<Amount> {
        let (reserve_in, reserve_out) = self.reserves(direction);
        ConstantProduct::calculate_output_amount(amount_in, reserve_in, reserve_out, self.fee_bps)
    }

    pub fn get_lp_mint(&self, amount_a: &Amount, amount_b: &Amount) -> Result<Amount> {
        ConstantProduct::calculate_lp_mint(
            amount_a,
            amount_b,
            &self.reserve_a,
            &self.reserve_b,
            &self.total_supply,
        )
    }

    pub fn get_withdrawal(&self, lp_amount: &Amount) -> Result<(Amount, Amount)> {
        ConstantProduct::calculate_withdrawal(
            lp_amount,
            &self.total_supply,
            &self.reserve_a,
            &self.reserve_b,
        )
    }
}
