//! Token unit scaling and display ratios
//!
//! Amounts cross the engine boundary as integers in a token's smallest unit.
//! Human-entered strings are scaled in with truncation (what the chain would
//! receive), and integer results are scaled back for display. No floating
//! point is involved in either direction.
//!
//! ## Precision by token
//!
//! - **SUI**: 9 decimal places (`1 SUI = 1_000_000_000 MIST`)
//! - **USDC / USDT**: 6 decimal places
//! - **ETH (bridged)**: 8 decimal places
//!
//! Decimals are token metadata supplied by the caller; nothing here assumes
//! a particular token.

use crate::error::{AmmError, Result};
use crate::Amount;
use num_traits::{ToPrimitive, Zero};
use rust_decimal::Decimal;

/// Fractional digits kept for exchange rates
pub const RATE_SCALE: u32 = 12;

/// `10^exp` as an arbitrary-precision integer
pub(crate) fn pow10(exp: u32) -> Amount {
    Amount::from(10u32).pow(exp)
}

/// Truncate `numerator / denominator` to `scale` fractional digits.
///
/// Returns `None` when the denominator is zero or the result does not fit a
/// Decimal mantissa.
pub(crate) fn ratio_to_decimal(numerator: &Amount, denominator: &Amount, scale: u32) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    let scaled = numerator * pow10(scale) / denominator;
    let mantissa = scaled.to_i128()?;
    Decimal::try_from_i128_with_scale(mantissa, scale).ok()
}

/// Scale a human decimal string into base units: `floor(human * 10^decimals)`.
///
/// Accepts digits with at most one `.`; surplus fractional digits are
/// dropped rather than rounded.
pub fn parse_units(input: &str, decimals: u8) -> Result<Amount> {
    let trimmed = input.trim();
    let invalid = || AmmError::InvalidAmount(input.to_string());

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (trimmed, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid());
    }

    let decimals = usize::from(decimals);
    let mut digits = String::with_capacity(int_part.len() + decimals + 1);
    digits.push('0');
    digits.push_str(int_part);
    if frac_part.len() >= decimals {
        digits.push_str(&frac_part[..decimals]);
    } else {
        digits.push_str(frac_part);
        digits.extend(std::iter::repeat('0').take(decimals - frac_part.len()));
    }

    digits.parse::<Amount>().map_err(|_| invalid())
}

/// Render base units as a decimal string, truncated to `display_decimals`
/// fractional digits with trailing zeros removed.
///
/// A non-zero amount too small to show renders as `< 0.0001` (for four
/// display decimals) so a dust balance never reads as empty.
pub fn format_units(amount: &Amount, decimals: u8, display_decimals: u8) -> String {
    let raw = amount.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return raw;
    }

    let padded = if raw.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - raw.len()), raw)
    } else {
        raw
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let shown = &frac_part[..decimals.min(usize::from(display_decimals))];
    let shown = shown.trim_end_matches('0');

    if !shown.is_empty() {
        return format!("{int_part}.{shown}");
    }
    if amount.is_zero() || int_part.bytes().any(|b| b != b'0') {
        return int_part.to_string();
    }
    match display_decimals.min(u8::try_from(decimals).unwrap_or(u8::MAX)) {
        0 => "< 1".to_string(),
        shown_digits => format!("< 0.{}1", "0".repeat(usize::from(shown_digits) - 1)),
    }
}

/// Whole output tokens received per whole input token at the spot price.
///
/// `(reserve_out / 10^decimals_out) / (reserve_in / 10^decimals_in)`.
/// An empty pool has no rate and yields zero.
pub fn human_rate(
    reserve_in: &Amount,
    reserve_out: &Amount,
    decimals_in: u8,
    decimals_out: u8,
) -> Result<Decimal> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let numerator = reserve_out * pow10(u32::from(decimals_in));
    let denominator = reserve_in * pow10(u32::from(decimals_out));
    ratio_to_decimal(&numerator, &denominator, RATE_SCALE).ok_or(AmmError::RateOverflow)
}

/// Serde adapter carrying an [`Amount`] as a decimal string
///
/// Use with `#[serde(with = "crate::units::amount_string")]`. JSON numbers
/// lose precision past 2^53, so amounts never travel as numbers.
pub mod amount_string {
    use crate::Amount;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(amount: &Amount, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Amount>().map_err(serde::de::Error::custom)
    }
}
