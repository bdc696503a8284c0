use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewStoredSimulation, StoredSimulation};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for the simulation log and user settings.
///
/// The log is append-only: entries come back from `list_simulations` in the
/// order they were appended and are never updated or removed.
#[async_trait]
pub trait SimulationRepository: Send + Sync {
    // Simulation log
    async fn append_simulation(
        &self,
        simulation: NewStoredSimulation,
    ) -> Result<StoredSimulation, RepositoryError>;
    async fn list_simulations(&self) -> Result<Vec<StoredSimulation>, RepositoryError>;

    // Settings
    async fn get_setting(
        &self,
        key: &str,
    ) -> Result<Option<String>, RepositoryError>;
    async fn put_setting(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), RepositoryError>;
}
