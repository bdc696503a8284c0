//! Financial calculation engine.
//!
//! Pure, synchronous functions over [`rust_decimal::Decimal`]: compound
//! accumulation, withholding-bracket lookup, and the simulation orchestration
//! that combines them.

pub mod common;
pub mod compound;
mod error;
pub mod simulation;
pub mod withholding;

pub use compound::{CompoundAccumulator, accumulate};
pub use error::CalculationError;
pub use simulation::Simulator;
pub use withholding::TaxBracketResolver;
