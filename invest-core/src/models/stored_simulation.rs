use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSimulation {
    pub id: i64,
    pub principal: Decimal,
    pub annual_rate_percent: Decimal,
    pub years: Decimal,
    pub saved_at: DateTime<Utc>,
}

/// For appending to the log (no id yet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStoredSimulation {
    pub principal: Decimal,
    pub annual_rate_percent: Decimal,
    pub years: Decimal,
    pub saved_at: DateTime<Utc>,
}

impl NewStoredSimulation {
    /// Stamps the log entry with the current time.
    pub fn now(
        principal: Decimal,
        annual_rate_percent: Decimal,
        years: Decimal,
    ) -> Self {
        Self {
            principal,
            annual_rate_percent,
            years,
            saved_at: Utc::now(),
        }
    }
}
