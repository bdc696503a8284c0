use async_trait::async_trait;

use invest_core::db::repository::{RepositoryError, SimulationRepository};
use invest_core::db::{DbConfig, RepositoryFactory};

use crate::repository::JsonFileRepository;

/// [`RepositoryFactory`] for the JSON file backend (`"json"`).
///
/// `connection_string` is the path of the storage file. The file is created
/// on the first write.
pub struct JsonRepositoryFactory;

#[async_trait]
impl RepositoryFactory for JsonRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SimulationRepository>, RepositoryError> {
        if config.connection_string.trim().is_empty() {
            return Err(RepositoryError::Configuration(
                "json backend needs a file path".to_string(),
            ));
        }
        Ok(Box::new(JsonFileRepository::new(&config.connection_string)))
    }
}
