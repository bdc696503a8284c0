use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use invest_core::{NewStoredSimulation, RepositoryError, SimulationRepository, StoredSimulation};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::document::{SimulationRecord, StorageDocument};

/// Repository backed by a single JSON file.
///
/// Every write reads the whole document, modifies it, and replaces the file
/// through a temporary sibling so a crash never leaves a half-written file.
/// Writers within one process are serialised; separate processes sharing a
/// file are not coordinated.
pub struct JsonFileRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document. A missing or blank file is an empty document.
    async fn load(&self) -> Result<StorageDocument, RepositoryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "storage file missing, starting empty");
                return Ok(StorageDocument::default());
            }
            Err(e) => {
                return Err(RepositoryError::Connection(format!(
                    "Failed to read '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(StorageDocument::default());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "storage file is not valid JSON");
            RepositoryError::Database(format!(
                "Failed to parse '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn store(
        &self,
        document: &StorageDocument,
    ) -> Result<(), RepositoryError> {
        let json = serde_json::to_vec_pretty(document)
            .map_err(|e| RepositoryError::Database(format!("Failed to encode document: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            RepositoryError::Database(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            RepositoryError::Database(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl SimulationRepository for JsonFileRepository {
    async fn append_simulation(
        &self,
        simulation: NewStoredSimulation,
    ) -> Result<StoredSimulation, RepositoryError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        let record = SimulationRecord::from(simulation);
        let stored = record.to_stored(document.simulations.len());
        document.simulations.push(record);
        self.store(&document).await?;

        debug!(id = stored.id, "simulation appended");
        Ok(stored)
    }

    async fn list_simulations(&self) -> Result<Vec<StoredSimulation>, RepositoryError> {
        let document = self.load().await?;

        Ok(document
            .simulations
            .iter()
            .enumerate()
            .map(|(position, record)| record.to_stored(position))
            .collect())
    }

    async fn get_setting(
        &self,
        key: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let mut document = self.load().await?;
        Ok(document.settings.remove(key))
    }

    async fn put_setting(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        document
            .settings
            .insert(key.to_string(), value.to_string());
        self.store(&document).await
    }
}
