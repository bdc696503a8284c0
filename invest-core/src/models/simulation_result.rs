use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Figures derived from a single [`SimulationInput`](super::SimulationInput).
///
/// Values are unrounded; rounding to cents is a presentation concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub gross_amount: Decimal,
    pub gross_profit: Decimal,
    /// Holding period used for the bracket lookup (`round(years * 365)`).
    pub holding_days: Decimal,
    /// Zero when tax is not applied.
    pub tax_rate: Decimal,
    pub tax_owed: Decimal,
    pub net_profit: Decimal,
    pub net_amount: Decimal,
}

impl SimulationResult {
    /// Multiplier applied to projected balances: `1 - tax_rate`.
    pub fn net_factor(&self) -> Decimal {
        Decimal::ONE - self.tax_rate
    }
}

/// Withholding tax computed on a gross profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingTax {
    pub gross_profit: Decimal,
    pub rate: Decimal,
    pub tax_owed: Decimal,
}

impl WithholdingTax {
    pub fn net_profit(&self) -> Decimal {
        self.gross_profit - self.tax_owed
    }
}
