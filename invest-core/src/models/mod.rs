mod compounding_frequency;
mod projection;
mod simulation_input;
mod simulation_result;
mod stored_simulation;
mod theme;
mod withholding_bracket;

pub use compounding_frequency::{CompoundingFrequency, ZeroFrequencyError};
pub use projection::{ProjectionPoint, ProjectionSeries};
pub use simulation_input::SimulationInput;
pub use simulation_result::{SimulationResult, WithholdingTax};
pub use stored_simulation::{NewStoredSimulation, StoredSimulation};
pub use theme::{THEME_SETTING_KEY, Theme};
pub use withholding_bracket::{STANDARD_WITHHOLDING_BRACKETS, WithholdingBracket};
