pub mod calculations;
pub mod chart;
pub mod db;
pub mod input;
pub mod models;

pub use calculations::CalculationError;
pub use db::repository::{RepositoryError, SimulationRepository};
pub use models::*;
