//! Common utility functions shared by the calculation modules.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use quartax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats a decimal amount as a two-decimal currency string.
///
/// The calculators themselves keep exact values; this is the presentation
/// boundary used when writing results out.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use quartax_core::calculations::common::to_currency_string;
///
/// assert_eq!(to_currency_string(dec!(7860.625)), "7860.63");
/// assert_eq!(to_currency_string(dec!(0)), "0.00");
/// ```
pub fn to_currency_string(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        assert_eq!(round_half_up(dec!(123.45)), dec!(123.45));
    }

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_handles_negative_and_positive() {
        assert_eq!(max(dec!(-50.00), dec!(50.00)), dec!(50.00));
    }

    #[test]
    fn to_currency_string_pads_to_two_decimals() {
        assert_eq!(to_currency_string(dec!(1160)), "1160.00");
        assert_eq!(to_currency_string(dec!(31442.5)), "31442.50");
    }

    #[test]
    fn to_currency_string_rounds_half_up() {
        assert_eq!(to_currency_string(dec!(7860.625)), "7860.63");
        assert_eq!(to_currency_string(dec!(26000.104)), "26000.10");
    }
}
