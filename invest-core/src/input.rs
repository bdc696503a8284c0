//! Coercion of raw form text into engine inputs.
//!
//! Coercion never fails. Empty text reads as zero, unparseable numbers read
//! as zero with a warning, and an unusable compounding frequency falls back to
//! [`InputDefaults::fallback_frequency`].

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{CompoundingFrequency, SimulationInput};

/// Fallbacks applied while coercing form text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDefaults {
    pub fallback_frequency: CompoundingFrequency,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Parses a number, treating empty and unparseable text as zero.
///
/// Accepts comma thousands separators (`"1,234.56"`) and scientific notation
/// (`"1e3"`).
pub fn coerce_decimal(s: &str) -> Decimal {
    parse_decimal(s).unwrap_or_else(|| {
        warn!(input = %s, "unparseable number, using 0");
        Decimal::ZERO
    })
}

/// Parses a compounding frequency.
///
/// Anything that is not a whole number of periods in `1..=u32::MAX` (empty,
/// zero, negative, fractional, unparseable) yields `fallback`.
pub fn coerce_frequency(
    s: &str,
    fallback: CompoundingFrequency,
) -> CompoundingFrequency {
    let parsed = parse_decimal(s)
        .filter(|value| value.fract().is_zero())
        .and_then(|value| value.to_u32())
        .and_then(CompoundingFrequency::new);

    match parsed {
        Some(frequency) => frequency,
        None => {
            if !s.trim().is_empty() {
                warn!(input = %s, %fallback, "unusable compounding frequency, using fallback");
            }
            fallback
        }
    }
}

/// Reads a yes/no field. Only `"yes"` (any case) is true.
pub fn coerce_flag(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("yes")
}

/// Raw text of the investment form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationForm {
    pub principal: String,
    pub rate: String,
    pub years: String,
    pub frequency: String,
    pub apply_tax: String,
}

impl SimulationForm {
    pub fn coerce(
        &self,
        defaults: &InputDefaults,
    ) -> SimulationInput {
        SimulationInput {
            principal: coerce_decimal(&self.principal),
            annual_rate_percent: coerce_decimal(&self.rate),
            years: coerce_decimal(&self.years),
            frequency: coerce_frequency(&self.frequency, defaults.fallback_frequency),
            apply_tax: coerce_flag(&self.apply_tax),
        }
    }
}

/// Raw text of the standalone withholding form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithholdingForm {
    pub gross_profit: String,
    pub holding_days: String,
}

impl WithholdingForm {
    /// Returns `(gross_profit, holding_days)`.
    pub fn coerce(&self) -> (Decimal, Decimal) {
        (
            coerce_decimal(&self.gross_profit),
            coerce_decimal(&self.holding_days),
        )
    }
}
