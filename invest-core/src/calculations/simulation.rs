//! Simulation orchestration.
//!
//! Combines [`CompoundAccumulator`] and [`TaxBracketResolver`] into the
//! figures shown for one investment, and derives the monthly net balance
//! series handed to a chart.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Gross amount: `accumulate(P, A, t, n)` |
//! | 2    | Gross profit: gross amount - P |
//! | 3    | Holding days: `round(t * 365)` |
//! | 4    | Tax rate and tax owed (zero when tax is not applied) |
//! | 5    | Net profit: gross profit - tax owed |
//! | 6    | Net amount: P + net profit |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use invest_core::{CompoundingFrequency, SimulationInput};
//! use invest_core::calculations::Simulator;
//!
//! let input = SimulationInput {
//!     principal: dec!(1000),
//!     annual_rate_percent: dec!(10),
//!     years: dec!(1),
//!     frequency: CompoundingFrequency::MONTHLY,
//!     apply_tax: true,
//! };
//!
//! let simulator = Simulator::default();
//! let result = simulator.run(&input).unwrap();
//! let series = simulator.project(&input, &result).unwrap();
//!
//! assert_eq!(result.holding_days, dec!(365));
//! assert_eq!(result.tax_rate, dec!(0.175));
//! assert_eq!(series.len(), 13);
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use tracing::{debug, instrument};

use super::common::{round_half_toward_positive, round_half_up};
use super::{CalculationError, CompoundAccumulator, TaxBracketResolver};
use crate::{
    ProjectionPoint, ProjectionSeries, SimulationInput, SimulationResult, WithholdingTax,
};

const DAYS_PER_YEAR: Decimal = dec!(365);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest projection, in months, that [`Simulator::project`] will build.
pub const MAX_PROJECTION_MONTHS: u32 = 12_000;

/// Runs simulations against a withholding table.
#[derive(Debug, Clone, Copy)]
pub struct Simulator<'a> {
    resolver: TaxBracketResolver<'a>,
}

impl<'a> Simulator<'a> {
    pub fn new(resolver: TaxBracketResolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &TaxBracketResolver<'a> {
        &self.resolver
    }

    /// Computes the gross and net figures for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if an intermediate value cannot be
    /// represented or the withholding table has no bracket for the period.
    #[instrument(level = "debug", skip(self), fields(frequency = %input.frequency))]
    pub fn run(
        &self,
        input: &SimulationInput,
    ) -> Result<SimulationResult, CalculationError> {
        let accumulator = CompoundAccumulator::new(input.frequency);

        let gross_amount =
            accumulator.accumulate(input.principal, input.annual_rate_percent, input.years)?;
        let gross_profit = gross_amount
            .checked_sub(input.principal)
            .ok_or(CalculationError::overflow("gross profit"))?;
        let holding_days = holding_days(input.years)?;

        let (tax_rate, tax_owed) = if input.apply_tax {
            let tax = self.resolver.resolve(gross_profit, holding_days)?;
            (tax.rate, tax.tax_owed)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let net_profit = gross_profit
            .checked_sub(tax_owed)
            .ok_or(CalculationError::overflow("net profit"))?;
        let net_amount = input.principal
            .checked_add(net_profit)
            .ok_or(CalculationError::overflow("net amount"))?;

        debug!(%gross_amount, %holding_days, %tax_rate, %net_amount, "simulation complete");

        Ok(SimulationResult {
            gross_amount,
            gross_profit,
            holding_days,
            tax_rate,
            tax_owed,
            net_profit,
            net_amount,
        })
    }

    /// Builds the monthly net balance series for a completed simulation.
    ///
    /// Month `i` holds `accumulate(P, A, i / 12, n) * (1 - tax_rate)`, rounded
    /// to cents, for `i` in `0..=round(years * 12)`. A negative month count
    /// produces an empty series.
    ///
    /// # Errors
    ///
    /// [`CalculationError::ProjectionTooLong`] above
    /// [`MAX_PROJECTION_MONTHS`], or an overflow while accumulating.
    pub fn project(
        &self,
        input: &SimulationInput,
        result: &SimulationResult,
    ) -> Result<ProjectionSeries, CalculationError> {
        let Some(months) = projection_months(input.years)? else {
            return Ok(ProjectionSeries::default());
        };
        let net_factor = result.net_factor();
        let accumulator = CompoundAccumulator::new(input.frequency);

        let points = (0..=months)
            .map(|month| {
                let years = Decimal::from(month) / MONTHS_PER_YEAR;
                let amount =
                    accumulator.accumulate(input.principal, input.annual_rate_percent, years)?;
                let net = amount
                    .checked_mul(net_factor)
                    .ok_or(CalculationError::overflow("projected balance"))?;
                Ok(ProjectionPoint::new(month, round_half_up(net)))
            })
            .collect::<Result<Vec<_>, CalculationError>>()?;

        debug!(points = points.len(), "projection built");

        Ok(ProjectionSeries { points })
    }

    /// Standalone withholding quote for a gross profit held `holding_days`.
    pub fn withholding(
        &self,
        gross_profit: Decimal,
        holding_days: Decimal,
    ) -> Result<WithholdingTax, CalculationError> {
        self.resolver.resolve(gross_profit, holding_days)
    }
}

impl Default for Simulator<'static> {
    fn default() -> Self {
        Self::new(TaxBracketResolver::default())
    }
}

fn holding_days(years: Decimal) -> Result<Decimal, CalculationError> {
    years
        .checked_mul(DAYS_PER_YEAR)
        .map(round_half_toward_positive)
        .ok_or(CalculationError::overflow("holding days"))
}

/// Last month index of the projection, or `None` when the rounded month
/// count is negative.
fn projection_months(years: Decimal) -> Result<Option<u32>, CalculationError> {
    let months = years
        .checked_mul(MONTHS_PER_YEAR)
        .map(round_half_toward_positive)
        .ok_or(CalculationError::overflow("projection months"))?;

    if months < Decimal::ZERO {
        return Ok(None);
    }

    match months.to_u32() {
        Some(months) if months <= MAX_PROJECTION_MONTHS => Ok(Some(months)),
        _ => Err(CalculationError::ProjectionTooLong {
            months,
            max: MAX_PROJECTION_MONTHS,
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{CompoundingFrequency, WithholdingBracket};

    fn input(
        principal: Decimal,
        rate: Decimal,
        years: Decimal,
        apply_tax: bool,
    ) -> SimulationInput {
        SimulationInput {
            principal,
            annual_rate_percent: rate,
            years,
            frequency: CompoundingFrequency::MONTHLY,
            apply_tax,
        }
    }

    // =========================================================================
    // run
    // =========================================================================

    #[test]
    fn one_year_with_tax() {
        let result = Simulator::default()
            .run(&input(dec!(1000), dec!(10), dec!(1), true))
            .unwrap();

        assert_eq!(round_half_up(result.gross_amount), dec!(1104.71));
        assert_eq!(round_half_up(result.gross_profit), dec!(104.71));
        assert_eq!(result.holding_days, dec!(365));
        assert_eq!(result.tax_rate, dec!(0.175));
        assert_eq!(round_half_up(result.tax_owed), dec!(18.32));
        assert_eq!(round_half_up(result.net_profit), dec!(86.39));
        assert_eq!(round_half_up(result.net_amount), dec!(1086.39));
    }

    #[test]
    fn without_tax_net_equals_gross() {
        let result = Simulator::default()
            .run(&input(dec!(1000), dec!(10), dec!(1), false))
            .unwrap();

        assert_eq!(result.tax_rate, Decimal::ZERO);
        assert_eq!(result.tax_owed, Decimal::ZERO);
        assert_eq!(result.net_profit, result.gross_profit);
        assert_eq!(result.net_amount, result.gross_amount);
    }

    #[test]
    fn net_identities_hold() {
        let input = input(dec!(2500), dec!(13.65), dec!(2.5), true);

        let result = Simulator::default().run(&input).unwrap();

        assert_eq!(result.gross_profit, result.gross_amount - input.principal);
        assert_eq!(result.net_profit, result.gross_profit - result.tax_owed);
        assert_eq!(result.net_amount, input.principal + result.net_profit);
    }

    #[test]
    fn half_year_holding_days_round_up() {
        let result = Simulator::default()
            .run(&input(dec!(1000), dec!(10), dec!(0.5), true))
            .unwrap();

        assert_eq!(result.holding_days, dec!(183));
        assert_eq!(result.tax_rate, dec!(0.20));
    }

    #[test]
    fn zero_principal_is_degenerate_not_an_error() {
        let result = Simulator::default()
            .run(&input(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, true))
            .unwrap();

        assert_eq!(result.gross_amount, Decimal::ZERO);
        assert_eq!(result.net_amount, Decimal::ZERO);
        assert_eq!(result.tax_rate, dec!(0.225));
    }

    #[test]
    fn negative_rate_produces_negative_tax() {
        let result = Simulator::default()
            .run(&input(dec!(1000), dec!(-5), dec!(3), true))
            .unwrap();

        assert!(result.gross_profit < Decimal::ZERO);
        assert!(result.tax_owed < Decimal::ZERO);
        assert_eq!(result.tax_rate, dec!(0.15));
    }

    #[test]
    fn custom_table_is_used() {
        let brackets = [WithholdingBracket {
            max_days: None,
            rate: dec!(0.10),
        }];
        let simulator = Simulator::new(TaxBracketResolver::new(&brackets));

        let result = simulator
            .run(&input(dec!(1000), dec!(10), dec!(1), true))
            .unwrap();

        assert_eq!(result.tax_rate, dec!(0.10));
    }

    #[test]
    fn overflowing_profit_is_an_error() {
        // Base 1 - 3 = -2, so gross is -2P and gross - P leaves the range.
        let input = SimulationInput {
            frequency: CompoundingFrequency::ANNUAL,
            ..input(dec!(30000000000000000000000000000), dec!(-300), dec!(1), true)
        };

        assert_eq!(
            Simulator::default().run(&input),
            Err(CalculationError::Overflow {
                quantity: "gross profit"
            })
        );
    }

    // =========================================================================
    // project
    // =========================================================================

    #[test]
    fn projection_spans_month_zero_to_last_month() {
        let simulator = Simulator::default();
        let input = input(dec!(1000), dec!(10), dec!(1), false);
        let result = simulator.run(&input).unwrap();

        let series = simulator.project(&input, &result).unwrap();

        assert_eq!(series.len(), 13);
        assert_eq!(series.points[0].label, "0m");
        assert_eq!(series.points[0].amount, dec!(1000.00));
        assert_eq!(series.last().unwrap().label, "12m");
        assert_eq!(series.last().unwrap().amount, dec!(1104.71));
    }

    #[test]
    fn projection_applies_net_factor() {
        let simulator = Simulator::default();
        let input = input(dec!(1000), dec!(10), dec!(1), true);
        let result = simulator.run(&input).unwrap();

        let series = simulator.project(&input, &result).unwrap();

        assert_eq!(series.points[0].amount, dec!(825.00));
        assert_eq!(series.last().unwrap().amount, dec!(911.39));
    }

    #[test]
    fn projection_is_monotonic_for_positive_rate() {
        let simulator = Simulator::default();
        let input = input(dec!(1000), dec!(9), dec!(5), true);
        let result = simulator.run(&input).unwrap();

        let series = simulator.project(&input, &result).unwrap();

        assert_eq!(series.len(), 61);
        assert!(
            series
                .points
                .windows(2)
                .all(|pair| pair[0].amount < pair[1].amount)
        );
    }

    #[test]
    fn projection_rounds_month_count() {
        let simulator = Simulator::default();
        let input = input(dec!(1000), dec!(10), dec!(0.125), false);
        let result = simulator.run(&input).unwrap();

        // 0.125 * 12 = 1.5 -> 2
        let series = simulator.project(&input, &result).unwrap();

        assert_eq!(series.len(), 3);
    }

    #[test]
    fn zero_years_projects_single_point() {
        let simulator = Simulator::default();
        let input = input(dec!(500), dec!(10), Decimal::ZERO, false);
        let result = simulator.run(&input).unwrap();

        let series = simulator.project(&input, &result).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].amount, dec!(500.00));
    }

    #[test]
    fn negative_years_project_nothing() {
        let simulator = Simulator::default();
        let input = input(dec!(500), dec!(10), dec!(-1), false);
        let result = simulator.run(&input).unwrap();

        let series = simulator.project(&input, &result).unwrap();

        assert!(series.is_empty());
    }

    #[test]
    fn projection_length_is_capped() {
        let simulator = Simulator::default();
        let input = input(dec!(1000), Decimal::ZERO, dec!(100000000), false);
        let result = simulator.run(&input).unwrap();

        assert_eq!(
            simulator.project(&input, &result),
            Err(CalculationError::ProjectionTooLong {
                months: dec!(1200000000),
                max: MAX_PROJECTION_MONTHS,
            })
        );
    }

    #[test]
    fn projection_at_the_cap_is_built() {
        let simulator = Simulator::default();
        let input = input(dec!(1000), Decimal::ZERO, dec!(1000), false);
        let result = simulator.run(&input).unwrap();

        let series = simulator.project(&input, &result).unwrap();

        assert_eq!(series.len(), 12_001);
        assert_eq!(series.last().unwrap().label, "12000m");
    }

    // =========================================================================
    // withholding
    // =========================================================================

    #[test]
    fn withholding_quote_matches_resolver() {
        let quote = Simulator::default()
            .withholding(dec!(1000), dec!(90))
            .unwrap();

        assert_eq!(quote.rate, dec!(0.225));
        assert_eq!(quote.tax_owed, dec!(225));
        assert_eq!(quote.net_profit(), dec!(775));
    }
}
