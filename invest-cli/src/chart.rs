//! Chart renderers for the terminal and for CSV export.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use invest_core::ProjectionSeries;
use invest_core::chart::{ChartRenderer, ChartSession};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::presentation::format_currency;

const BAR_WIDTH: usize = 40;

/// Handle for a chart drawn by [`TableChartRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableChart {
    pub rows: usize,
}

/// Draws the series as a text table with a proportional bar per month.
pub struct TableChartRenderer<W: Write> {
    out: W,
}

impl<W: Write> TableChartRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn bar_length(
    amount: Decimal,
    min: Decimal,
    max: Decimal,
) -> usize {
    let span = match max.checked_sub(min) {
        Some(span) if span.is_zero() => return BAR_WIDTH,
        Some(span) => span,
        // Range too wide for Decimal; scale both ends down by half.
        None => return bar_length(amount / dec!(2), min / dec!(2), max / dec!(2)),
    };
    ((amount - min) / span)
        .checked_mul(Decimal::from(BAR_WIDTH))
        .and_then(|scaled| scaled.round().to_usize())
        .unwrap_or(0)
        .min(BAR_WIDTH)
}

impl<W: Write> ChartRenderer for TableChartRenderer<W> {
    type Chart = TableChart;
    type Error = io::Error;

    fn render(
        &mut self,
        series: &ProjectionSeries,
    ) -> Result<TableChart, io::Error> {
        let (Some(min), Some(max)) = (series.min_amount(), series.max_amount()) else {
            writeln!(self.out, "(no data points)")?;
            return Ok(TableChart { rows: 0 });
        };

        writeln!(self.out, "{:>6}  {:>16}", "month", "balance")?;
        for point in series.iter() {
            writeln!(
                self.out,
                "{:>6}  {:>16}  {}",
                point.label,
                format_currency(point.amount),
                "#".repeat(bar_length(point.amount, min, max))
            )?;
        }
        self.out.flush()?;

        Ok(TableChart { rows: series.len() })
    }

    fn dispose(
        &mut self,
        _chart: TableChart,
    ) -> Result<(), io::Error> {
        // Printed output cannot be taken back; separate it from the next chart.
        writeln!(self.out)
    }
}

/// Handle for a chart exported by [`CsvChartRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvChart {
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes the series as `month,label,amount` rows.
///
/// A single-target renderer overwrites its file on every render. A numbered
/// renderer writes `stem-1.csv`, `stem-2.csv`, ... so a batch keeps every
/// chart.
pub struct CsvChartRenderer {
    path: PathBuf,
    numbered: bool,
    written: usize,
}

impl CsvChartRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            numbered: false,
            written: 0,
        }
    }

    pub fn numbered(path: impl Into<PathBuf>) -> Self {
        Self {
            numbered: true,
            ..Self::new(path)
        }
    }

    fn next_path(&self) -> PathBuf {
        if !self.numbered {
            return self.path.clone();
        }
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chart".to_string());
        let ext = self
            .path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "csv".to_string());
        self.path
            .with_file_name(format!("{stem}-{}.{ext}", self.written + 1))
    }
}

fn write_series(
    path: &Path,
    series: &ProjectionSeries,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);
    writer.write_record(["month", "label", "amount"])?;
    for point in series.iter() {
        writer.write_record([
            point.month.to_string(),
            point.label.clone(),
            point.amount.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

impl ChartRenderer for CsvChartRenderer {
    type Chart = CsvChart;
    type Error = csv::Error;

    fn render(
        &mut self,
        series: &ProjectionSeries,
    ) -> Result<CsvChart, csv::Error> {
        let path = self.next_path();
        write_series(&path, series)?;
        self.written += 1;

        info!(path = %path.display(), rows = series.len(), "chart exported");
        Ok(CsvChart {
            path,
            rows: series.len(),
        })
    }

    fn dispose(
        &mut self,
        chart: CsvChart,
    ) -> Result<(), csv::Error> {
        // The exported file is the deliverable; disposing only drops the handle.
        debug!(path = %chart.path.display(), "csv chart released");
        Ok(())
    }
}

/// Chart destination picked on the command line.
pub enum ChartOutput {
    Table(ChartSession<TableChartRenderer<io::Stdout>>),
    Csv(ChartSession<CsvChartRenderer>),
}

impl ChartOutput {
    pub fn table() -> Self {
        Self::Table(ChartSession::new(TableChartRenderer::new(io::stdout())))
    }

    /// `numbered` gives every chart its own file (see [`CsvChartRenderer::numbered`]).
    pub fn csv(
        path: impl Into<PathBuf>,
        numbered: bool,
    ) -> Self {
        let renderer = if numbered {
            CsvChartRenderer::numbered(path)
        } else {
            CsvChartRenderer::new(path)
        };
        Self::Csv(ChartSession::new(renderer))
    }

    pub fn show(
        &mut self,
        series: &ProjectionSeries,
    ) -> anyhow::Result<()> {
        match self {
            Self::Table(session) => {
                session.show(series).context("failed to draw chart")?;
            }
            Self::Csv(session) => {
                session.show(series).context("failed to export chart")?;
            }
        }
        Ok(())
    }

    pub fn finish(self) -> anyhow::Result<()> {
        match self {
            Self::Table(session) => session.into_renderer().map(drop)?,
            Self::Csv(session) => session.into_renderer().map(drop)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use invest_core::ProjectionPoint;
    use pretty_assertions::assert_eq;

    use super::*;

    fn series(amounts: &[Decimal]) -> ProjectionSeries {
        ProjectionSeries {
            points: amounts
                .iter()
                .enumerate()
                .map(|(month, amount)| ProjectionPoint::new(month as u32, *amount))
                .collect(),
        }
    }

    #[test]
    fn bar_length_scales_between_min_and_max() {
        assert_eq!(bar_length(dec!(100), dec!(100), dec!(200)), 0);
        assert_eq!(bar_length(dec!(150), dec!(100), dec!(200)), 20);
        assert_eq!(bar_length(dec!(200), dec!(100), dec!(200)), BAR_WIDTH);
        assert_eq!(bar_length(dec!(5), dec!(5), dec!(5)), BAR_WIDTH);
    }

    #[test]
    fn bar_length_survives_a_range_wider_than_decimal() {
        let max = Decimal::MAX;
        let min = -Decimal::MAX;

        assert_eq!(bar_length(max, min, max), BAR_WIDTH);
        assert_eq!(bar_length(min, min, max), 0);
        assert_eq!(bar_length(Decimal::ZERO, min, max), BAR_WIDTH / 2);
    }

    #[test]
    fn table_lists_every_month() {
        let mut renderer = TableChartRenderer::new(Vec::new());

        let chart = renderer
            .render(&series(&[dec!(1000), dec!(1008.33), dec!(1016.74)]))
            .unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(chart, TableChart { rows: 3 });
        assert_eq!(lines.len(), 4);
        assert!(lines[1].trim_start().starts_with("0m"));
        assert!(lines[3].contains("R$ 1016.74"));
        assert!(lines[3].ends_with(&"#".repeat(BAR_WIDTH)));
    }

    #[test]
    fn table_handles_empty_series() {
        let mut renderer = TableChartRenderer::new(Vec::new());

        let chart = renderer.render(&ProjectionSeries::default()).unwrap();

        assert_eq!(chart.rows, 0);
        assert_eq!(
            String::from_utf8(renderer.into_inner()).unwrap(),
            "(no data points)\n"
        );
    }

    #[test]
    fn session_separates_consecutive_tables() {
        let mut session = ChartSession::new(TableChartRenderer::new(Vec::new()));

        session.show(&series(&[dec!(1)])).unwrap();
        session.show(&series(&[dec!(2)])).unwrap();
        let out = String::from_utf8(session.into_renderer().unwrap().into_inner()).unwrap();

        assert_eq!(out.matches("month").count(), 2);
        assert_eq!(out.matches("\n\n").count(), 2);
    }

    fn temp_csv(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("invest-cli-{}-{}.csv", std::process::id(), name))
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let path = temp_csv("single");
        let mut renderer = CsvChartRenderer::new(&path);

        let chart = renderer
            .render(&series(&[dec!(1000.00), dec!(1008.33)]))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(chart.rows, 2);
        assert_eq!(contents, "month,label,amount\n0,0m,1000.00\n1,1m,1008.33\n");
    }

    #[test]
    fn numbered_export_keeps_every_chart() {
        let base = temp_csv("batch");
        let mut session = ChartSession::new(CsvChartRenderer::numbered(&base));

        let first = session.show(&series(&[dec!(1)])).unwrap().path.clone();
        let second = session.show(&series(&[dec!(2)])).unwrap().path.clone();

        let both_exist = first.exists() && second.exists();
        let _ = std::fs::remove_file(&first);
        let _ = std::fs::remove_file(&second);
        assert_ne!(first, second);
        assert!(both_exist);
        assert!(first.to_string_lossy().ends_with("-batch-1.csv"));
    }
}
