use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A holding-period range mapped to a withholding rate.
///
/// Brackets are evaluated in order; a bracket covers every holding period up
/// to and including `max_days`, or everything when `max_days` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingBracket {
    pub max_days: Option<Decimal>,
    pub rate: Decimal,
}

impl WithholdingBracket {
    pub fn contains(
        &self,
        holding_days: Decimal,
    ) -> bool {
        self.max_days.is_none_or(|max| holding_days <= max)
    }
}

/// Regressive fixed-income withholding table.
///
/// | days      | rate  |
/// |-----------|-------|
/// | 0-180     | 22.5% |
/// | 181-360   | 20.0% |
/// | 361-720   | 17.5% |
/// | 721+      | 15.0% |
pub static STANDARD_WITHHOLDING_BRACKETS: [WithholdingBracket; 4] = [
    WithholdingBracket {
        max_days: Some(dec!(180)),
        rate: dec!(0.225),
    },
    WithholdingBracket {
        max_days: Some(dec!(360)),
        rate: dec!(0.20),
    },
    WithholdingBracket {
        max_days: Some(dec!(720)),
        rate: dec!(0.175),
    },
    WithholdingBracket {
        max_days: None,
        rate: dec!(0.15),
    },
];
