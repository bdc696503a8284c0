//! Rounding helpers shared by the engine and its presentation layer.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, which is how currency
/// figures are displayed.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use invest_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1104.7130674)), dec!(1104.71));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest whole number, with halves going toward positive
/// infinity (`2.5 -> 3`, `-2.5 -> -2`).
///
/// Used to turn fractional years into whole days and months.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use invest_core::calculations::common::round_half_toward_positive;
///
/// assert_eq!(round_half_toward_positive(dec!(182.5)), dec!(183));
/// assert_eq!(round_half_toward_positive(dec!(-2.5)), dec!(-2));
/// ```
pub fn round_half_toward_positive(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointTowardZero)
        .max(value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}
