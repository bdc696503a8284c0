//! Command handlers shared by the binary and the integration tests.

use invest_core::db::{RepositoryRegistry, load_theme, save_theme};
use invest_core::input::{InputDefaults, SimulationForm};
use invest_core::{
    CalculationError, NewStoredSimulation, ProjectionSeries, RepositoryError, SimulationInput,
    SimulationRepository, SimulationResult, StoredSimulation, Theme,
    calculations::Simulator,
};
use invest_db_json::JsonRepositoryFactory;
use invest_db_sqlite::SqliteRepositoryFactory;
use tracing::{info, warn};

/// Registry with every storage backend this binary ships.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(JsonRepositoryFactory));
    registry
}

/// One simulation: the coerced input, its figures, and the monthly series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub input: SimulationInput,
    pub result: SimulationResult,
    pub series: ProjectionSeries,
}

pub fn simulate(
    simulator: &Simulator<'_>,
    input: SimulationInput,
) -> Result<SimulationReport, CalculationError> {
    let result = simulator.run(&input)?;
    let series = simulator.project(&input, &result)?;
    Ok(SimulationReport {
        input,
        result,
        series,
    })
}

/// Appends the input's principal, rate and years to the log with the
/// current UTC time.
pub async fn save_simulation(
    repo: &dyn SimulationRepository,
    input: &SimulationInput,
) -> Result<StoredSimulation, RepositoryError> {
    let stored = repo
        .append_simulation(NewStoredSimulation::now(
            input.principal,
            input.annual_rate_percent,
            input.years,
        ))
        .await?;
    info!(id = stored.id, "simulation saved");
    Ok(stored)
}

/// Result of `simulate --save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRun {
    pub stored: StoredSimulation,
    pub report: Result<SimulationReport, CalculationError>,
}

/// Logs `input` first, then simulates it. The entry is kept even when the
/// figures cannot be computed.
pub async fn save_and_simulate(
    simulator: &Simulator<'_>,
    repo: &dyn SimulationRepository,
    input: SimulationInput,
) -> Result<SavedRun, RepositoryError> {
    let stored = save_simulation(repo, &input).await?;
    Ok(SavedRun {
        stored,
        report: simulate(simulator, input),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChange {
    Set(Theme),
    Toggle,
}

/// Persists the theme that results from applying `change` to `current`.
pub async fn change_theme(
    repo: &dyn SimulationRepository,
    current: Theme,
    change: ThemeChange,
) -> Result<Theme, RepositoryError> {
    let next = match change {
        ThemeChange::Set(theme) => theme,
        ThemeChange::Toggle => current.toggled(),
    };
    save_theme(repo, next).await?;
    info!(theme = next.as_str(), "theme saved");
    Ok(next)
}

/// Startup read of the theme preference. A storage failure is logged and
/// treated as the default theme so commands still run.
pub async fn startup_theme(repo: &dyn SimulationRepository) -> Theme {
    match load_theme(repo).await {
        Ok(theme) => theme,
        Err(error) => {
            warn!(%error, "could not read theme preference, using default");
            Theme::default()
        }
    }
}

/// Outcome of one batch row. `row` is 1-based, header excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub row: usize,
    pub outcome: Result<SimulationReport, CalculationError>,
}

/// Coerces and simulates every form. A row whose arithmetic cannot be
/// represented is reported in place and does not stop the batch.
pub fn run_batch(
    simulator: &Simulator<'_>,
    forms: &[SimulationForm],
    defaults: &InputDefaults,
) -> Vec<BatchRow> {
    forms
        .iter()
        .enumerate()
        .map(|(idx, form)| {
            let outcome = simulate(simulator, form.coerce(defaults));
            if let Err(error) = &outcome {
                warn!(row = idx + 1, %error, "batch row failed");
            }
            BatchRow {
                row: idx + 1,
                outcome,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use invest_core::CompoundingFrequency;
    use invest_core::db::DbConfig;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn form(
        principal: &str,
        rate: &str,
        years: &str,
    ) -> SimulationForm {
        SimulationForm {
            principal: principal.to_string(),
            rate: rate.to_string(),
            years: years.to_string(),
            frequency: "12".to_string(),
            apply_tax: "yes".to_string(),
        }
    }

    #[test]
    fn registry_offers_both_backends() {
        assert_eq!(build_registry().available_backends(), vec!["json", "sqlite"]);
    }

    #[test]
    fn simulate_builds_result_and_series() {
        let input = SimulationInput {
            principal: dec!(1000),
            annual_rate_percent: dec!(10),
            years: dec!(1),
            frequency: CompoundingFrequency::MONTHLY,
            apply_tax: true,
        };

        let report = simulate(&Simulator::default(), input.clone()).unwrap();

        assert_eq!(report.input, input);
        assert_eq!(report.result.holding_days, dec!(365));
        assert_eq!(report.series.len(), 13);
    }

    #[test]
    fn batch_keeps_going_after_a_failed_row() {
        let forms = [
            form("1000", "10", "1"),
            form("1000", "-2400", "0.1"),
            form("500", "0", "2"),
        ];

        let rows = run_batch(&Simulator::default(), &forms, &InputDefaults::default());

        assert_eq!(rows.iter().map(|r| r.row).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(rows[0].outcome.is_ok());
        assert!(matches!(
            rows[1].outcome,
            Err(CalculationError::UndefinedGrowth { .. })
        ));
        let third = rows[2].outcome.as_ref().unwrap();
        assert_eq!(third.result.gross_amount, dec!(500));
    }

    #[tokio::test]
    async fn theme_change_persists() {
        let config = DbConfig::default();
        let repo = build_registry().create(&config).await.unwrap();

        assert_eq!(startup_theme(&*repo).await, Theme::Light);
        let toggled = change_theme(&*repo, Theme::Light, ThemeChange::Toggle)
            .await
            .unwrap();
        assert_eq!(toggled, Theme::Dark);
        assert_eq!(startup_theme(&*repo).await, Theme::Dark);

        let set = change_theme(&*repo, Theme::Dark, ThemeChange::Set(Theme::Light))
            .await
            .unwrap();
        assert_eq!(set, Theme::Light);
        assert_eq!(
            repo.get_setting("themeDark").await,
            Ok(Some("0".to_string()))
        );
    }

    #[tokio::test]
    async fn save_appends_to_log() {
        let repo = build_registry().create(&DbConfig::default()).await.unwrap();
        let input = form("1,000", "10.5", "2").coerce(&InputDefaults::default());

        let stored = save_simulation(&*repo, &input).await.unwrap();

        assert_eq!(stored.principal, dec!(1000));
        assert_eq!(stored.annual_rate_percent, dec!(10.5));
        assert_eq!(repo.list_simulations().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn save_keeps_inputs_that_cannot_be_simulated() {
        let repo = build_registry().create(&DbConfig::default()).await.unwrap();
        let input = form("1000", "-2400", "0.1").coerce(&InputDefaults::default());

        let run = save_and_simulate(&Simulator::default(), &*repo, input)
            .await
            .unwrap();

        assert!(matches!(
            run.report,
            Err(CalculationError::UndefinedGrowth { .. })
        ));
        assert_eq!(run.stored.annual_rate_percent, dec!(-2400));
        assert_eq!(repo.list_simulations().await.unwrap(), vec![run.stored]);
    }
}
