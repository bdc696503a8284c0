use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use invest_core::{NewStoredSimulation, StoredSimulation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whole contents of the storage file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDocument {
    #[serde(default)]
    pub simulations: Vec<SimulationRecord>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// One saved simulation. Field names follow the stored layout, not the
/// domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub principal: Decimal,
    pub rate: Decimal,
    pub years: Decimal,
    pub date: DateTime<Utc>,
}

impl From<NewStoredSimulation> for SimulationRecord {
    fn from(simulation: NewStoredSimulation) -> Self {
        Self {
            principal: simulation.principal,
            rate: simulation.annual_rate_percent,
            years: simulation.years,
            date: simulation.saved_at,
        }
    }
}

impl SimulationRecord {
    /// Records carry no id; the 1-based position in the log stands in for one.
    pub fn to_stored(
        &self,
        position: usize,
    ) -> StoredSimulation {
        StoredSimulation {
            id: position as i64 + 1,
            principal: self.principal,
            annual_rate_percent: self.rate,
            years: self.years,
            saved_at: self.date,
        }
    }
}
