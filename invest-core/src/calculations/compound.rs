//! Compound accumulation.
//!
//! ```text
//! amount = P * (1 + r/n) ^ (n * t)
//! ```
//!
//! where `r` is the annual rate as a decimal (`A / 100`), `n` the number of
//! compounding periods per year and `t` the elapsed time in years.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use invest_core::CompoundingFrequency;
//! use invest_core::calculations::CompoundAccumulator;
//! use invest_core::calculations::common::round_half_up;
//!
//! let accumulator = CompoundAccumulator::new(CompoundingFrequency::MONTHLY);
//! let amount = accumulator.accumulate(dec!(1000), dec!(10), dec!(1)).unwrap();
//!
//! assert_eq!(round_half_up(amount), dec!(1104.71));
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use super::CalculationError;
use crate::CompoundingFrequency;

/// Exponents within this many decimal places of a whole number are treated as
/// whole, so `12 * (1 / 12)` compounds exactly once.
const EXPONENT_SCALE: u32 = 12;

const ONE_HUNDRED: Decimal = dec!(100);

/// Projects a principal forward under periodic compounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompoundAccumulator {
    frequency: CompoundingFrequency,
}

impl CompoundAccumulator {
    pub fn new(frequency: CompoundingFrequency) -> Self {
        Self { frequency }
    }

    pub fn frequency(&self) -> CompoundingFrequency {
        self.frequency
    }

    /// Returns the amount `principal` grows to after `years` at
    /// `annual_rate_percent`.
    ///
    /// `years == 0` and `annual_rate_percent == 0` both return `principal`
    /// unchanged. Negative rates shrink the amount without special handling.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if the growth factor or the amount cannot
    /// be represented.
    pub fn accumulate(
        &self,
        principal: Decimal,
        annual_rate_percent: Decimal,
        years: Decimal,
    ) -> Result<Decimal, CalculationError> {
        let factor = self.growth_factor(annual_rate_percent, years)?;
        principal
            .checked_mul(factor)
            .ok_or(CalculationError::overflow("accumulated amount"))
    }

    /// Returns `(1 + r/n) ^ (n * t)`.
    pub fn growth_factor(
        &self,
        annual_rate_percent: Decimal,
        years: Decimal,
    ) -> Result<Decimal, CalculationError> {
        let periods_per_year = Decimal::from(self.frequency.periods_per_year());
        let periodic_rate = annual_rate_percent / ONE_HUNDRED / periods_per_year;
        let base = Decimal::ONE
            .checked_add(periodic_rate)
            .ok_or(CalculationError::overflow("periodic rate"))?;
        let exponent = periods_per_year
            .checked_mul(years)
            .ok_or(CalculationError::overflow("compounding periods"))?;

        raise(base, exponent)
    }
}

/// Free-function form of [`CompoundAccumulator::accumulate`].
pub fn accumulate(
    principal: Decimal,
    annual_rate_percent: Decimal,
    years: Decimal,
    frequency: CompoundingFrequency,
) -> Result<Decimal, CalculationError> {
    CompoundAccumulator::new(frequency).accumulate(principal, annual_rate_percent, years)
}

fn raise(
    base: Decimal,
    exponent: Decimal,
) -> Result<Decimal, CalculationError> {
    if exponent.is_zero() || base == Decimal::ONE {
        return Ok(Decimal::ONE);
    }

    let snapped = exponent.round_dp(EXPONENT_SCALE);
    if snapped.fract().is_zero() {
        let periods = snapped
            .to_i64()
            .ok_or(CalculationError::overflow("compounding periods"))?;
        return raise_whole(base, periods);
    }

    if base <= Decimal::ZERO {
        return Err(CalculationError::UndefinedGrowth { base, exponent });
    }

    base.checked_powd(exponent)
        .ok_or(CalculationError::overflow("growth factor"))
}

fn raise_whole(
    base: Decimal,
    periods: i64,
) -> Result<Decimal, CalculationError> {
    let magnitude = base
        .checked_powu(periods.unsigned_abs())
        .ok_or(CalculationError::overflow("growth factor"))?;

    if periods < 0 {
        Decimal::ONE
            .checked_div(magnitude)
            .ok_or(CalculationError::overflow("growth factor"))
    } else {
        Ok(magnitude)
    }
}
