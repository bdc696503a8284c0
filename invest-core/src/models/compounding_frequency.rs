use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a frequency of zero periods per year is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("compounding frequency must be at least one period per year")]
pub struct ZeroFrequencyError;

/// Number of times per year interest is capitalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CompoundingFrequency(NonZeroU32);

impl CompoundingFrequency {
    pub const ANNUAL: Self = Self(NonZeroU32::new(1).unwrap());
    pub const SEMIANNUAL: Self = Self(NonZeroU32::new(2).unwrap());
    pub const QUARTERLY: Self = Self(NonZeroU32::new(4).unwrap());
    pub const MONTHLY: Self = Self(NonZeroU32::new(12).unwrap());
    pub const DAILY: Self = Self(NonZeroU32::new(365).unwrap());

    pub fn new(periods_per_year: u32) -> Option<Self> {
        NonZeroU32::new(periods_per_year).map(Self)
    }

    pub fn periods_per_year(self) -> u32 {
        self.0.get()
    }

    pub fn name(self) -> Option<&'static str> {
        match self.0.get() {
            1 => Some("annual"),
            2 => Some("semiannual"),
            4 => Some("quarterly"),
            12 => Some("monthly"),
            365 => Some("daily"),
            _ => None,
        }
    }
}

impl Default for CompoundingFrequency {
    fn default() -> Self {
        Self::MONTHLY
    }
}

impl TryFrom<u32> for CompoundingFrequency {
    type Error = ZeroFrequencyError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ZeroFrequencyError)
    }
}

impl From<CompoundingFrequency> for u32 {
    fn from(value: CompoundingFrequency) -> Self {
        value.periods_per_year()
    }
}

impl fmt::Display for CompoundingFrequency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({}x/year)", self.periods_per_year()),
            None => write!(f, "{}x/year", self.periods_per_year()),
        }
    }
}
