use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One month of a projected balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub label: String,
    /// Net balance, rounded to cents.
    pub amount: Decimal,
}

impl ProjectionPoint {
    pub fn new(
        month: u32,
        amount: Decimal,
    ) -> Self {
        Self {
            month,
            label: format!("{month}m"),
            amount,
        }
    }
}

/// Monthly balance series from month 0 to `round(years * 12)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    pub points: Vec<ProjectionPoint>,
}

impl ProjectionSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&ProjectionPoint> {
        self.points.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectionPoint> {
        self.points.iter()
    }

    pub fn max_amount(&self) -> Option<Decimal> {
        self.points.iter().map(|p| p.amount).max()
    }

    pub fn min_amount(&self) -> Option<Decimal> {
        self.points.iter().map(|p| p.amount).min()
    }
}
