//! Constant-product (x*y=k) pool math with exact integer arithmetic
//!
//! Every amount is an arbitrary-precision integer and every division floors,
//! multiplying before dividing so results match the pool contract's own
//! integer math. Decimal is only used for display ratios.

use crate::error::{AmmError, Result};
use crate::units::ratio_to_decimal;
use crate::Amount;
use num_traits::Zero;
use rust_decimal::Decimal;
use tracing::debug;

pub use dex_config::{DEFAULT_FEE_BPS, FEE_DENOMINATOR};

/// LP tokens locked forever on the first deposit into a pool
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Fractional digits kept for price impact percentages
pub const IMPACT_SCALE: u32 = 8;

/// Fractional digits kept for pool share estimates
pub const SHARE_SCALE: u32 = 4;

/// Constant-product math functions. Stateless; every call is independent.
pub struct ConstantProduct;

impl ConstantProduct {
    /// Calculate the output amount of a swap, fee taken from the input leg
    ///
    /// # Arguments
    /// * `amount_in` - Input token amount (base units), must be positive
    /// * `reserve_in` - Input token reserve
    /// * `reserve_out` - Output token reserve
    /// * `fee_bps` - Pool fee in basis points (30 = 0.3%)
    ///
    /// # Returns
    /// `floor(amount_in * (10000 - fee) * reserve_out / (reserve_in * 10000 + amount_in * (10000 - fee)))`,
    /// or zero when either reserve is empty.
    pub fn calculate_output_amount(
        amount_in: &Amount,
        reserve_in: &Amount,
        reserve_out: &Amount,
        fee_bps: u32,
    ) -> Result<Amount> {
        check_fee(fee_bps)?;
        if amount_in.is_zero() {
            return Err(AmmError::ZeroAmount { what: "swap input" });
        }
        if reserve_in.is_zero() || reserve_out.is_zero() {
            debug!(%reserve_in, %reserve_out, "no liquidity, swap output is zero");
            return Ok(Amount::zero());
        }

        let amount_in_with_fee = amount_in * (FEE_DENOMINATOR - fee_bps);
        let numerator = &amount_in_with_fee * reserve_out;
        let denominator = reserve_in * FEE_DENOMINATOR + &amount_in_with_fee;

        Ok(numerator / denominator)
    }

    /// Calculate price impact of a trade as a percentage (>= 0)
    ///
    /// Compares the pre-trade spot rate `reserve_out / reserve_in` with the
    /// average execution rate `amount_out / amount_in`:
    /// `max(0, (spot - execution) / spot * 100)`, evaluated as the exact
    /// rational `1 - (amount_out * reserve_in) / (amount_in * reserve_out)`
    /// and truncated to [`IMPACT_SCALE`] digits.
    pub fn calculate_price_impact(
        amount_in: &Amount,
        amount_out: &Amount,
        reserve_in: &Amount,
        reserve_out: &Amount,
    ) -> Decimal {
        if reserve_in.is_zero() || reserve_out.is_zero() || amount_in.is_zero() {
            return Decimal::ZERO;
        }

        let spot_weighted = amount_in * reserve_out;
        let execution_weighted = amount_out * reserve_in;
        if execution_weighted >= spot_weighted {
            return Decimal::ZERO;
        }

        let shortfall = (&spot_weighted - execution_weighted) * 100u32;
        // shortfall / spot_weighted <= 100, always representable
        ratio_to_decimal(&shortfall, &spot_weighted, IMPACT_SCALE).unwrap_or(Decimal::ZERO)
    }

    /// Calculate LP tokens minted for a deposit
    ///
    /// First deposit (`total_supply == 0`): `floor(sqrt(a * b)) - MINIMUM_LIQUIDITY`,
    /// rejected unless strictly positive. Later deposits:
    /// `min(a * supply / reserve_a, b * supply / reserve_b)`, so an unbalanced
    /// deposit only earns the share of its scarcer side.
    pub fn calculate_lp_mint(
        amount_a: &Amount,
        amount_b: &Amount,
        reserve_a: &Amount,
        reserve_b: &Amount,
        total_supply: &Amount,
    ) -> Result<Amount> {
        if amount_a.is_zero() {
            return Err(AmmError::ZeroAmount { what: "deposit amount A" });
        }
        if amount_b.is_zero() {
            return Err(AmmError::ZeroAmount { what: "deposit amount B" });
        }

        if total_supply.is_zero() {
            let root = (amount_a * amount_b).sqrt();
            let minimum = Amount::from(MINIMUM_LIQUIDITY);
            if root <= minimum {
                return Err(AmmError::InsufficientInitialLiquidity {
                    root,
                    minimum: MINIMUM_LIQUIDITY,
                });
            }
            return Ok(root - minimum);
        }

        if reserve_a.is_zero() || reserve_b.is_zero() {
            return Err(AmmError::EmptyReserves {
                total_supply: total_supply.clone(),
            });
        }

        let liquidity_a = amount_a * total_supply / reserve_a;
        let liquidity_b = amount_b * total_supply / reserve_b;
        let minted = liquidity_a.min(liquidity_b);

        if minted.is_zero() {
            return Err(AmmError::ZeroLiquidityMinted);
        }
        Ok(minted)
    }

    /// Calculate token amounts paid out for burning `lp_amount` LP tokens
    ///
    /// `(floor(reserve_a * lp / supply), floor(reserve_b * lp / supply))`
    /// with `0 < lp_amount <= total_supply`.
    pub fn calculate_withdrawal(
        lp_amount: &Amount,
        total_supply: &Amount,
        reserve_a: &Amount,
        reserve_b: &Amount,
    ) -> Result<(Amount, Amount)> {
        if lp_amount.is_zero() {
            return Err(AmmError::ZeroAmount { what: "LP burn amount" });
        }
        if total_supply.is_zero() {
            return Err(AmmError::EmptySupply);
        }
        if lp_amount > total_supply {
            return Err(AmmError::BurnExceedsSupply {
                lp_amount: lp_amount.clone(),
                total_supply: total_supply.clone(),
            });
        }

        let amount_a = reserve_a * lp_amount / total_supply;
        let amount_b = reserve_b * lp_amount / total_supply;
        Ok((amount_a, amount_b))
    }

    /// Fee portion of a swap input: `floor(amount_in * fee_bps / 10000)`
    pub fn calculate_swap_fee(amount_in: &Amount, fee_bps: u32) -> Result<Amount> {
        check_fee(fee_bps)?;
        Ok(amount_in * fee_bps / FEE_DENOMINATOR)
    }

    /// Token B amount matching `amount_a` at the pool's current ratio
    ///
    /// `None` for a pool without reserves, where the first depositor sets
    /// the ratio.
    pub fn paired_amount(amount_a: &Amount, reserve_a: &Amount, reserve_b: &Amount) -> Option<Amount> {
        if reserve_a.is_zero() || reserve_b.is_zero() {
            return None;
        }
        Some(amount_a * reserve_b / reserve_a)
    }

    /// LP amount for a percentage of a balance: `floor(balance * pct / 100)`
    pub fn lp_for_percentage(lp_balance: &Amount, percentage: u8) -> Result<Amount> {
        if percentage == 0 || percentage > 100 {
            return Err(AmmError::InvalidPercentage(percentage));
        }
        Ok(lp_balance * u32::from(percentage) / 100u32)
    }

    /// Lower bound for an output given a slippage tolerance in percent
    ///
    /// `floor(amount * (100 - slippage_pct) / 100)`, computed exactly from
    /// the Decimal's mantissa. Requires `0 < slippage_pct < 100`.
    pub fn min_amount_with_slippage(amount: &Amount, slippage_pct: Decimal) -> Result<Amount> {
        if slippage_pct <= Decimal::ZERO || slippage_pct >= Decimal::ONE_HUNDRED {
            return Err(AmmError::SlippageOutOfRange(slippage_pct));
        }

        let scale = slippage_pct.scale();
        let mantissa = Amount::from(slippage_pct.mantissa().unsigned_abs());
        let whole = Amount::from(100u32) * crate::units::pow10(scale);
        Ok(amount * (&whole - mantissa) / whole)
    }

    /// True when spending `amount` needs more than `balance` holds
    pub fn exceeds_balance(amount: &Amount, balance: &Amount) -> bool {
        amount > balance
    }

    /// Reject spending more than `balance`, both in base units
    pub fn check_balance(amount: &Amount, balance: &Amount) -> Result<()> {
        if Self::exceeds_balance(amount, balance) {
            return Err(AmmError::InsufficientBalance {
                amount: amount.clone(),
                balance: balance.clone(),
            });
        }
        Ok(())
    }

    /// Estimated pool share (percent) held by a fresh deposit of `amount_a`
    ///
    /// `amount_a / (reserve_a + amount_a) * 100`
    pub fn share_after_deposit(amount_a: &Amount, reserve_a: &Amount) -> Decimal {
        if amount_a.is_zero() {
            return Decimal::ZERO;
        }
        let numerator = amount_a * 100u32;
        let denominator = reserve_a + amount_a;
        ratio_to_decimal(&numerator, &denominator, SHARE_SCALE).unwrap_or(Decimal::ZERO)
    }
}

fn check_fee(fee_bps: u32) -> Result<()> {
    if fee_bps >= FEE_DENOMINATOR {
        return Err(AmmError::FeeOutOfRange {
            fee_bps,
            max: FEE_DENOMINATOR,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amt(value: u64) -> Amount {
        Amount::from(value)
    }

    #[test]
    fn test_output_matches_onchain_floor() {
        let out = ConstantProduct::calculate_output_amount(
            &amt(1_000),
            &amt(1_000_000),
            &amt(4_000_000),
            30,
        )
        .unwrap();
        assert_eq!(out, amt(3_984));

        // 100 in, 1000:2000 reserves, 0.3% fee => 181.32.. floored
        let out =
            ConstantProduct::calculate_output_amount(&amt(100), &amt(1_000), &amt(2_000), 30).unwrap();
        assert_eq!(out, amt(181));
    }

    #[test]
    fn test_output_empty_pool_is_zero() {
        let out =
            ConstantProduct::calculate_output_amount(&amt(1_000), &amt(0), &amt(5_000), 30).unwrap();
        assert!(out.is_zero());
        let out =
            ConstantProduct::calculate_output_amount(&amt(1_000), &amt(5_000), &amt(0), 30).unwrap();
        assert!(out.is_zero());
    }

    #[test]
    fn test_output_rejects_bad_inputs() {
        assert_eq!(
            ConstantProduct::calculate_output_amount(&amt(0), &amt(10), &amt(10), 30),
            Err(AmmError::ZeroAmount { what: "swap input" })
        );
        assert_eq!(
            ConstantProduct::calculate_output_amount(&amt(1), &amt(10), &amt(10), 10_000),
            Err(AmmError::FeeOutOfRange {
                fee_bps: 10_000,
                max: FEE_DENOMINATOR
            })
        );
    }

    #[test]
    fn test_fee_reduces_output() {
        let with_fee = ConstantProduct::calculate_output_amount(
            &amt(50_000),
            &amt(1_000_000),
            &amt(1_000_000),
            30,
        )
        .unwrap();
        let without_fee = ConstantProduct::calculate_output_amount(
            &amt(50_000),
            &amt(1_000_000),
            &amt(1_000_000),
            0,
        )
        .unwrap();
        assert!(with_fee < without_fee);
    }

    #[test]
    fn test_output_exceeds_u64_intermediates() {
        // amount_in * 9970 * reserve_out overflows u128
        let reserve = Amount::from(u128::MAX);
        let out =
            ConstantProduct::calculate_output_amount(&reserve, &reserve, &reserve, 30).unwrap();
        assert!(out < reserve);
        assert!(out > reserve.clone() / 3u32);
    }

    #[test]
    fn test_price_impact() {
        let impact =
            ConstantProduct::calculate_price_impact(&amt(1_000), &amt(3_984), &amt(1_000_000), &amt(4_000_000));
        assert_eq!(impact, dec!(0.4));

        // 10% of reserves moves the price noticeably but not absurdly
        let out =
            ConstantProduct::calculate_output_amount(&amt(100), &amt(1_000), &amt(2_000), 30).unwrap();
        let impact = ConstantProduct::calculate_price_impact(&amt(100), &out, &amt(1_000), &amt(2_000));
        assert!(impact > dec!(0));
        assert!(impact < dec!(20));
    }

    #[test]
    fn test_price_impact_degenerate_inputs() {
        let zero = amt(0);
        assert_eq!(
            ConstantProduct::calculate_price_impact(&amt(10), &amt(5), &zero, &amt(100)),
            Decimal::ZERO
        );
        assert_eq!(
            ConstantProduct::calculate_price_impact(&zero, &zero, &amt(100), &amt(100)),
            Decimal::ZERO
        );
        // better than spot never reports negative impact
        assert_eq!(
            ConstantProduct::calculate_price_impact(&amt(10), &amt(50), &amt(100), &amt(100)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_initial_mint() {
        let minted = ConstantProduct::calculate_lp_mint(
            &amt(1_000_000),
            &amt(1_000_000),
            &amt(0),
            &amt(0),
            &amt(0),
        )
        .unwrap();
        assert_eq!(minted, amt(999_000));
    }

    #[test]
    fn test_initial_mint_below_minimum_rejected() {
        let err = ConstantProduct::calculate_lp_mint(&amt(1_000), &amt(1_000), &amt(0), &amt(0), &amt(0))
            .unwrap_err();
        assert_eq!(
            err,
            AmmError::InsufficientInitialLiquidity {
                root: amt(1_000),
                minimum: MINIMUM_LIQUIDITY
            }
        );
        assert!(ConstantProduct::calculate_lp_mint(&amt(1_001), &amt(1_001), &amt(0), &amt(0), &amt(0)).is_ok());
    }

    #[test]
    fn test_subsequent_mint_takes_minimum_side() {
        let minted =
            ConstantProduct::calculate_lp_mint(&amt(50), &amt(50), &amt(100), &amt(200), &amt(1_000))
                .unwrap();
        assert_eq!(minted, amt(250));
    }

    #[test]
    fn test_subsequent_mint_rejections() {
        assert_eq!(
            ConstantProduct::calculate_lp_mint(&amt(1), &amt(1), &amt(1_000_000), &amt(1_000_000), &amt(10)),
            Err(AmmError::ZeroLiquidityMinted)
        );
        assert_eq!(
            ConstantProduct::calculate_lp_mint(&amt(5), &amt(5), &amt(0), &amt(10), &amt(10)),
            Err(AmmError::EmptyReserves { total_supply: amt(10) })
        );
        assert_eq!(
            ConstantProduct::calculate_lp_mint(&amt(0), &amt(5), &amt(10), &amt(10), &amt(10)),
            Err(AmmError::ZeroAmount { what: "deposit amount A" })
        );
    }

    #[test]
    fn test_full_withdrawal_returns_reserves() {
        let (a, b) = ConstantProduct::calculate_withdrawal(
            &amt(123_457),
            &amt(123_457),
            &amt(9_999_991),
            &amt(31),
        )
        .unwrap();
        assert_eq!((a, b), (amt(9_999_991), amt(31)));
    }

    #[test]
    fn test_partial_withdrawal_floors() {
        let (a, b) =
            ConstantProduct::calculate_withdrawal(&amt(1), &amt(3), &amt(100), &amt(200)).unwrap();
        assert_eq!((a, b), (amt(33), amt(66)));
    }

    #[test]
    fn test_withdrawal_rejections() {
        assert_eq!(
            ConstantProduct::calculate_withdrawal(&amt(1), &amt(0), &amt(10), &amt(10)),
            Err(AmmError::EmptySupply)
        );
        assert_eq!(
            ConstantProduct::calculate_withdrawal(&amt(11), &amt(10), &amt(10), &amt(10)),
            Err(AmmError::BurnExceedsSupply {
                lp_amount: amt(11),
                total_supply: amt(10)
            })
        );
        assert!(matches!(
            ConstantProduct::calculate_withdrawal(&amt(0), &amt(10), &amt(10), &amt(10)),
            Err(AmmError::ZeroAmount { .. })
        ));
    }

    #[test]
    fn test_default_fee_shared_with_config() {
        let config = dex_config::DexConfig::default();
        assert_eq!(config.pricing.default_fee_bps, DEFAULT_FEE_BPS);
        assert!(check_fee(config.pricing.default_fee_bps).is_ok());
        assert!(check_fee(FEE_DENOMINATOR).is_err());
    }

    #[test]
    fn test_swap_fee() {
        assert_eq!(ConstantProduct::calculate_swap_fee(&amt(1_000_000), 30).unwrap(), amt(3_000));
        assert_eq!(ConstantProduct::calculate_swap_fee(&amt(333), 30).unwrap(), amt(0));
        assert!(ConstantProduct::calculate_swap_fee(&amt(1), 20_000).is_err());
    }

    #[test]
    fn test_paired_amount() {
        assert_eq!(
            ConstantProduct::paired_amount(&amt(10), &amt(100), &amt(250)),
            Some(amt(25))
        );
        assert_eq!(ConstantProduct::paired_amount(&amt(10), &amt(0), &amt(0)), None);
    }

    #[test]
    fn test_lp_for_percentage() {
        let balance = amt(1_001);
        assert_eq!(ConstantProduct::lp_for_percentage(&balance, 25).unwrap(), amt(250));
        assert_eq!(ConstantProduct::lp_for_percentage(&balance, 100).unwrap(), balance);
        assert_eq!(
            ConstantProduct::lp_for_percentage(&balance, 0),
            Err(AmmError::InvalidPercentage(0))
        );
        assert_eq!(
            ConstantProduct::lp_for_percentage(&balance, 101),
            Err(AmmError::InvalidPercentage(101))
        );
    }

    #[test]
    fn test_min_amount_with_slippage() {
        assert_eq!(
            ConstantProduct::min_amount_with_slippage(&amt(3_984), dec!(0.5)).unwrap(),
            amt(3_964)
        );
        assert_eq!(
            ConstantProduct::min_amount_with_slippage(&amt(1_000), dec!(1)).unwrap(),
            amt(990)
        );
        assert_eq!(
            ConstantProduct::min_amount_with_slippage(&amt(1_000), dec!(0)),
            Err(AmmError::SlippageOutOfRange(dec!(0)))
        );
        assert_eq!(
            ConstantProduct::min_amount_with_slippage(&amt(1_000), dec!(99.99)).unwrap(),
            amt(0)
        );
    }

    #[test]
    fn test_slippage_of_one_hundred_is_open_bound() {
        let err = ConstantProduct::min_amount_with_slippage(&amt(1_000), dec!(100)).unwrap_err();
        assert_eq!(err, AmmError::SlippageOutOfRange(dec!(100)));
        assert_eq!(err.to_string(), "slippage tolerance 100% must be in (0, 100)");
    }

    #[test]
    fn test_check_balance() {
        assert!(ConstantProduct::check_balance(&amt(1_000), &amt(1_000)).is_ok());
        assert_eq!(
            ConstantProduct::check_balance(&amt(1_001), &amt(1_000)),
            Err(AmmError::InsufficientBalance {
                amount: amt(1_001),
                balance: amt(1_000)
            })
        );
        assert!(ConstantProduct::exceeds_balance(&amt(1), &amt(0)));
        assert!(!ConstantProduct::exceeds_balance(&amt(0), &amt(0)));
    }

    #[test]
    fn test_share_after_deposit() {
        assert_eq!(ConstantProduct::share_after_deposit(&amt(100), &amt(300)), dec!(25));
        assert_eq!(ConstantProduct::share_after_deposit(&amt(100), &amt(0)), dec!(100));
        assert_eq!(ConstantProduct::share_after_deposit(&amt(0), &amt(300)), Decimal::ZERO);
    }
}
