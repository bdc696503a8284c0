use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CompoundingFrequency;

/// Already-coerced inputs for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub principal: Decimal,
    /// Annual rate as a percentage, e.g. `10` for 10%.
    pub annual_rate_percent: Decimal,
    pub years: Decimal,
    pub frequency: CompoundingFrequency,
    pub apply_tax: bool,
}
