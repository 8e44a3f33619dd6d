use anyhow::{anyhow, Result};
use ethers::types::U256;
use ethers::utils::{format_units, parse_units};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::model::BotError;

/// Convert a human-readable unit amount to base units, `base = unit * 10^decimals`.
///
/// The decimals must come from the token contract itself; callers never assume
/// a constant.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() {
        return Err(BotError::InvalidAmount(amount.to_string()).into());
    }

    let parsed = parse_units(amount.to_string(), u32::from(decimals))
        .map_err(|e| anyhow!("Failed to convert {} to base units: {}", amount, e))?;

    Ok(parsed.into())
}

/// Convert base units back to a unit amount.
pub fn from_base_units(amount: U256, decimals: u8) -> Result<Decimal> {
    let formatted = format_units(amount, u32::from(decimals))
        .map_err(|e| anyhow!("Failed to format {} base units: {}", amount, e))?;

    Decimal::from_str(&formatted)
        .map_err(|e| anyhow!("Base unit amount {} does not fit a decimal: {}", amount, e))
}

/// An allowance at or near the `2^256 - 1` sentinel is treated as unlimited.
pub fn is_effectively_unlimited(allowance: U256) -> bool {
    allowance >= U256::MAX / 2
}

/// Format base units for display, collapsing the unlimited sentinel.
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    if is_effectively_unlimited(amount) {
        return "unlimited".to_string();
    }

    match from_base_units(amount, decimals) {
        Ok(units) => units.normalize().to_string(),
        Err(_) => format!("{} base units", amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundred_tokens_at_18_decimals() {
        let base = to_base_units(Decimal::from(100), 18).unwrap();
        let expected = U256::from(100u64) * U256::exp10(18);
        assert_eq!(base, expected);
    }

    #[test]
    fn fractional_amount_scales_exactly() {
        let base = to_base_units(Decimal::from_str("0.5").unwrap(), 6).unwrap();
        assert_eq!(base, U256::from(500_000u64));
    }

    #[test]
    fn round_trips_through_base_units() {
        for raw in ["1", "100", "0.25", "1234.567891"] {
            let amount = Decimal::from_str(raw).unwrap();
            let base = to_base_units(amount, 18).unwrap();
            let back = from_base_units(base, 18).unwrap();
            assert_eq!(back, amount, "round trip failed for {raw}");
        }
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = to_base_units(Decimal::from(-1), 18);
        assert!(err.is_err());
    }

    #[test]
    fn too_many_fractional_digits_is_an_error() {
        // 2 decimals cannot represent 0.001
        assert!(to_base_units(Decimal::from_str("0.001").unwrap(), 2).is_err());
    }

    #[test]
    fn max_allowance_formats_as_unlimited() {
        assert_eq!(format_token_amount(U256::MAX, 18), "unlimited");
        assert!(is_effectively_unlimited(U256::MAX));
        assert!(!is_effectively_unlimited(U256::exp10(18)));
    }

    #[test]
    fn plain_balance_formats_without_trailing_zeros() {
        let base = to_base_units(Decimal::from(100), 18).unwrap();
        assert_eq!(format_token_amount(base, 18), "100");
    }
}
