use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use invest_cli::app::{self, ThemeChange};
use invest_cli::chart::ChartOutput;
use invest_cli::config::{ConfigLayer, Settings};
use invest_cli::presentation::{Palette, render_history, render_simulation, render_withholding};
use invest_cli::{csv_loader, logging};
use invest_core::Theme;
use invest_core::calculations::Simulator;
use invest_core::input::{SimulationForm, WithholdingForm};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Fixed-income investment simulator.
///
/// Projects a principal under periodic compounding, withholds tax by holding
/// period, and keeps a log of saved simulations.
#[derive(Debug, Parser)]
#[command(name = "invest-sim", version)]
struct Cli {
    /// Config file. Defaults to `invest-sim.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend (`sqlite` or `json`).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Storage location. For SQLite a file path or `:memory:`; for JSON a
    /// file path.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Compounding frequency used when the given one is unusable.
    #[arg(long, global = true)]
    fallback_frequency: Option<u32>,

    /// Log level or filter directive. Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Silence console logging (the log file still receives everything).
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one simulation.
    Simulate(SimulateArgs),
    /// Quote the withholding tax on a gross profit.
    Tax(TaxArgs),
    /// List saved simulations.
    History,
    /// Show or change the saved theme.
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },
    /// Run every row of a CSV file.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// Initial amount.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    principal: String,

    /// Annual rate in percent.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    rate: String,

    /// Term in years; may be fractional.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    years: String,

    /// Compounding periods per year.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    frequency: String,

    /// `yes` to withhold tax.
    #[arg(long, default_value = "yes")]
    apply_tax: String,

    /// Append principal, rate and years to the history, even when the
    /// figures cannot be computed.
    #[arg(long)]
    save: bool,

    #[command(flatten)]
    chart: ChartArgs,
}

#[derive(Debug, Args)]
struct TaxArgs {
    /// Gross profit.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    gross: String,

    /// Holding period in days.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    days: String,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// CSV with columns principal, rate, years, frequency, apply_tax.
    #[arg(long)]
    file: PathBuf,

    #[command(flatten)]
    chart: ChartArgs,
}

#[derive(Debug, Args)]
struct ChartArgs {
    /// Print the monthly balance as a table.
    #[arg(long)]
    chart: bool,

    /// Write the monthly balance as CSV (`month,label,amount`).
    #[arg(long, conflicts_with = "chart")]
    chart_csv: Option<PathBuf>,
}

impl ChartArgs {
    fn output(
        &self,
        numbered: bool,
    ) -> Option<ChartOutput> {
        match (&self.chart_csv, self.chart) {
            (Some(path), _) => Some(ChartOutput::csv(path, numbered)),
            (None, true) => Some(ChartOutput::table()),
            (None, false) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

impl From<ThemeMode> for ThemeChange {
    fn from(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => ThemeChange::Set(Theme::Dark),
            ThemeMode::Light => ThemeChange::Set(Theme::Light),
            ThemeMode::Toggle => ThemeChange::Toggle,
        }
    }
}

// ─── setup ───────────────────────────────────────────────────────────────────

fn resolve_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let flags = ConfigLayer {
        backend: cli.backend.clone(),
        database: cli.db.clone(),
        fallback_frequency: cli.fallback_frequency,
        log_level: cli.log_level.clone(),
    };
    let layer = ConfigLayer::discover(cli.config.as_deref())?.merge(flags);
    Ok(Settings::try_from(layer)?)
}

fn init_logging(
    cli: &Cli,
    settings: &Settings,
) -> anyhow::Result<()> {
    logging::init_logging(settings.log_level.as_deref());
    if cli.quiet {
        logging::set_console_enabled(false)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    init_logging(&cli, &settings)?;

    debug!(backend = %settings.db.backend, "opening storage");
    let registry = app::build_registry();
    let repo = registry.create(&settings.db).await.with_context(|| {
        format!(
            "cannot open {} storage at '{}'",
            settings.db.backend, settings.db.connection_string
        )
    })?;

    let theme = app::startup_theme(&*repo).await;
    let palette = Palette::new(theme, io::stdout().is_terminal());
    let simulator = Simulator::default();

    match cli.command {
        Command::Simulate(args) => {
            let form = SimulationForm {
                principal: args.principal,
                rate: args.rate,
                years: args.years,
                frequency: args.frequency,
                apply_tax: args.apply_tax,
            };
            let input = form.coerce(&settings.input);
            let report = if args.save {
                let run = app::save_and_simulate(&simulator, &*repo, input).await?;
                println!("Saved simulation #{}.", run.stored.id);
                run.report?
            } else {
                app::simulate(&simulator, input)?
            };
            print!("{}", render_simulation(&report.result, &palette));

            if let Some(mut chart) = args.chart.output(false) {
                chart.show(&report.series)?;
                chart.finish()?;
            }
        }
        Command::Tax(args) => {
            let (gross, days) = WithholdingForm {
                gross_profit: args.gross,
                holding_days: args.days,
            }
            .coerce();
            let tax = simulator.withholding(gross, days)?;
            print!("{}", render_withholding(&tax, &palette));
        }
        Command::History => {
            let simulations = repo.list_simulations().await?;
            print!("{}", render_history(&simulations));
        }
        Command::Theme { mode: None } => {
            println!("{}", theme.as_str());
        }
        Command::Theme { mode: Some(mode) } => {
            let next = app::change_theme(&*repo, theme, mode.into()).await?;
            println!("{}", next.as_str());
        }
        Command::Batch(args) => {
            let forms = csv_loader::load_from_file(&args.file)?;
            let rows = app::run_batch(&simulator, &forms, &settings.input);
            let mut chart = args.chart.output(true);

            let mut failed = 0;
            for row in &rows {
                println!("Row {}:", row.row);
                match &row.outcome {
                    Ok(report) => {
                        print!("{}", render_simulation(&report.result, &palette));
                        if let Some(chart) = chart.as_mut() {
                            chart.show(&report.series)?;
                        }
                    }
                    Err(error) => {
                        failed += 1;
                        println!("  error: {error}");
                    }
                }
                println!();
            }
            if let Some(chart) = chart {
                chart.finish()?;
            }
            info!(rows = rows.len(), failed, "batch complete");
        }
    }

    Ok(())
}
