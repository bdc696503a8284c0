//! Withholding tax by holding period.
//!
//! The applied rate is taken from the first bracket whose range covers the
//! holding period. The standard table is regressive:
//!
//! | Days      | Rate  |
//! |-----------|-------|
//! | 0-180     | 22.5% |
//! | 181-360   | 20.0% |
//! | 361-720   | 17.5% |
//! | 721+      | 15.0% |
//!
//! Tax owed is `gross_profit * rate` with no rounding and no floor, so a loss
//! produces a negative figure.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use invest_core::calculations::TaxBracketResolver;
//!
//! let tax = TaxBracketResolver::default().resolve(dec!(1000), dec!(90)).unwrap();
//!
//! assert_eq!(tax.rate, dec!(0.225));
//! assert_eq!(tax.tax_owed, dec!(225));
//! assert_eq!(tax.net_profit(), dec!(775));
//! ```

use rust_decimal::Decimal;

use super::CalculationError;
use crate::{STANDARD_WITHHOLDING_BRACKETS, WithholdingBracket, WithholdingTax};

/// Maps a holding period to a withholding rate.
#[derive(Debug, Clone, Copy)]
pub struct TaxBracketResolver<'a> {
    brackets: &'a [WithholdingBracket],
}

impl<'a> TaxBracketResolver<'a> {
    /// Creates a resolver over `brackets`, which are matched in order.
    pub fn new(brackets: &'a [WithholdingBracket]) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &'a [WithholdingBracket] {
        self.brackets
    }

    /// Returns the rate of the first bracket covering `holding_days`.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::NoBrackets`] if the resolver has no brackets.
    /// * [`CalculationError::NoMatchingBracket`] if no bracket covers the period.
    pub fn rate_for(
        &self,
        holding_days: Decimal,
    ) -> Result<Decimal, CalculationError> {
        if self.brackets.is_empty() {
            return Err(CalculationError::NoBrackets);
        }

        self.brackets
            .iter()
            .find(|bracket| bracket.contains(holding_days))
            .map(|bracket| bracket.rate)
            .ok_or(CalculationError::NoMatchingBracket(holding_days))
    }

    /// Computes the tax owed on `gross_profit` for the given holding period.
    pub fn resolve(
        &self,
        gross_profit: Decimal,
        holding_days: Decimal,
    ) -> Result<WithholdingTax, CalculationError> {
        let rate = self.rate_for(holding_days)?;
        let tax_owed = gross_profit
            .checked_mul(rate)
            .ok_or(CalculationError::overflow("tax owed"))?;

        Ok(WithholdingTax {
            gross_profit,
            rate,
            tax_owed,
        })
    }
}

impl Default for TaxBracketResolver<'static> {
    fn default() -> Self {
        Self::new(&STANDARD_WITHHOLDING_BRACKETS)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn rate(days: Decimal) -> Decimal {
        TaxBracketResolver::default().rate_for(days).unwrap()
    }

    // =========================================================================
    // Bracket boundaries
    // =========================================================================

    #[test]
    fn first_bracket_covers_up_to_180_days() {
        assert_eq!(rate(dec!(0)), dec!(0.225));
        assert_eq!(rate(dec!(90)), dec!(0.225));
        assert_eq!(rate(dec!(180)), dec!(0.225));
    }

    #[test]
    fn second_bracket_covers_181_to_360_days() {
        assert_eq!(rate(dec!(181)), dec!(0.20));
        assert_eq!(rate(dec!(360)), dec!(0.20));
    }

    #[test]
    fn third_bracket_covers_361_to_720_days() {
        assert_eq!(rate(dec!(361)), dec!(0.175));
        assert_eq!(rate(dec!(720)), dec!(0.175));
    }

    #[test]
    fn last_bracket_is_open_ended() {
        assert_eq!(rate(dec!(721)), dec!(0.15));
        assert_eq!(rate(dec!(36500)), dec!(0.15));
    }

    #[test]
    fn fractional_days_fall_between_whole_day_boundaries() {
        assert_eq!(rate(dec!(180.5)), dec!(0.20));
        assert_eq!(rate(dec!(720.01)), dec!(0.15));
    }

    #[test]
    fn negative_days_use_the_first_bracket() {
        assert_eq!(rate(dec!(-30)), dec!(0.225));
    }

    // =========================================================================
    // Tax owed
    // =========================================================================

    #[test]
    fn resolve_ninety_days() {
        let tax = TaxBracketResolver::default()
            .resolve(dec!(1000), dec!(90))
            .unwrap();

        assert_eq!(tax.tax_owed, dec!(225.00));
        assert_eq!(tax.net_profit(), dec!(775.00));
    }

    #[test]
    fn resolve_does_not_round() {
        let tax = TaxBracketResolver::default()
            .resolve(dec!(104.7130674), dec!(365))
            .unwrap();

        assert_eq!(tax.tax_owed, dec!(18.324786795));
    }

    #[test]
    fn loss_yields_negative_tax() {
        let tax = TaxBracketResolver::default()
            .resolve(dec!(-200), dec!(800))
            .unwrap();

        assert_eq!(tax.rate, dec!(0.15));
        assert_eq!(tax.tax_owed, dec!(-30));
        assert_eq!(tax.net_profit(), dec!(-170));
    }

    #[test]
    fn resolve_is_idempotent() {
        let resolver = TaxBracketResolver::default();

        let first = resolver.resolve(dec!(1234.5678), dec!(400)).unwrap();
        let second = resolver.resolve(dec!(1234.5678), dec!(400)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.tax_owed.serialize(), second.tax_owed.serialize());
    }

    // =========================================================================
    // Custom tables
    // =========================================================================

    #[test]
    fn empty_table_is_an_error() {
        let resolver = TaxBracketResolver::new(&[]);

        assert_eq!(
            resolver.resolve(dec!(100), dec!(10)),
            Err(CalculationError::NoBrackets)
        );
    }

    #[test]
    fn table_without_open_bracket_can_miss() {
        let brackets = [WithholdingBracket {
            max_days: Some(dec!(30)),
            rate: dec!(0.5),
        }];
        let resolver = TaxBracketResolver::new(&brackets);

        assert_eq!(resolver.rate_for(dec!(30)), Ok(dec!(0.5)));
        assert_eq!(
            resolver.rate_for(dec!(31)),
            Err(CalculationError::NoMatchingBracket(dec!(31)))
        );
    }

    #[test]
    fn first_match_wins_for_overlapping_brackets() {
        let brackets = [
            WithholdingBracket {
                max_days: Some(dec!(100)),
                rate: dec!(0.3),
            },
            WithholdingBracket {
                max_days: Some(dec!(50)),
                rate: dec!(0.1),
            },
        ];

        assert_eq!(
            TaxBracketResolver::new(&brackets).rate_for(dec!(10)),
            Ok(dec!(0.3))
        );
    }
}
