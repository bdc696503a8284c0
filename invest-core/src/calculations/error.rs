use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the calculation engine.
///
/// With the standard bracket table and ordinary inputs none of these occur;
/// they surface only for values outside what [`Decimal`] can represent or for
/// a misconfigured custom bracket table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// An intermediate value exceeded the range of [`Decimal`].
    #[error("{quantity} is out of range")]
    Overflow { quantity: &'static str },

    /// A non-positive base cannot be raised to a fractional power.
    #[error("growth factor undefined: base {base} raised to fractional exponent {exponent}")]
    UndefinedGrowth { base: Decimal, exponent: Decimal },

    /// The projection would have more months than the engine builds.
    #[error("projection of {months} months exceeds the limit of {max}")]
    ProjectionTooLong { months: Decimal, max: u32 },

    /// No withholding brackets were provided.
    #[error("no withholding brackets provided")]
    NoBrackets,

    /// No bracket covers the given holding period.
    #[error("no withholding bracket found for a holding period of {0} days")]
    NoMatchingBracket(Decimal),
}

impl CalculationError {
    pub(crate) fn overflow(quantity: &'static str) -> Self {
        Self::Overflow { quantity }
    }
}
