use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use invest_core::{NewStoredSimulation, RepositoryError, SimulationRepository, StoredSimulation};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::decimal::{decimal_to_text, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open `database` (a bare file path, a `sqlite:` URL, or `:memory:`),
    /// creating the file if it does not exist.
    pub async fn new(database: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database)
            .with_context(|| format!("Invalid database location: {}", database))?
            .create_if_missing(true);

        // One connection keeps `:memory:` databases from splitting per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn get_simulation(
        &self,
        id: i64,
    ) -> Result<StoredSimulation, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, principal, annual_rate_percent, years, saved_at
             FROM simulations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_stored_simulation(&row)
    }
}

fn row_to_stored_simulation(
    row: &sqlx::sqlite::SqliteRow
) -> Result<StoredSimulation, RepositoryError> {
    Ok(StoredSimulation {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        principal: get_decimal(row, "principal")?,
        annual_rate_percent: get_decimal(row, "annual_rate_percent")?,
        years: get_decimal(row, "years")?,
        saved_at: row
            .try_get::<DateTime<Utc>, _>("saved_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get saved_at: {}", e)))?,
    })
}

#[async_trait]
impl SimulationRepository for SqliteRepository {
    async fn append_simulation(
        &self,
        simulation: NewStoredSimulation,
    ) -> Result<StoredSimulation, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO simulations (principal, annual_rate_percent, years, saved_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(decimal_to_text(simulation.principal))
        .bind(decimal_to_text(simulation.annual_rate_percent))
        .bind(decimal_to_text(simulation.years))
        .bind(simulation.saved_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        debug!(id, "simulation appended");
        self.get_simulation(id).await
    }

    async fn list_simulations(&self) -> Result<Vec<StoredSimulation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, principal, annual_rate_percent, years, saved_at
             FROM simulations ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_stored_simulation).collect()
    }

    async fn get_setting(
        &self,
        key: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.map(|row| {
            row.try_get("value")
                .map_err(|e| RepositoryError::Database(e.to_string()))
        })
        .transpose()
    }

    async fn put_setting(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}
