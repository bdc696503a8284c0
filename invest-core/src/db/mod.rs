pub mod factory;
pub mod preferences;
pub mod repository;

pub use factory::{DbConfig, RepositoryFactory, RepositoryRegistry};
pub use preferences::{load_theme, save_theme};
pub use repository::{RepositoryError, SimulationRepository};
