//! Text rendering of engine results.

use std::fmt::Write;

use invest_core::calculations::common::round_half_up;
use invest_core::{SimulationResult, StoredSimulation, Theme, WithholdingTax};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// `R$ 1104.71`. Always two decimals, half away from zero.
pub fn format_currency(amount: Decimal) -> String {
    format!("R$ {}", two_places(amount))
}

/// Formats a fractional rate as a percentage: `0.175` becomes `17.50%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", two_places(rate * dec!(100)))
}

fn two_places(value: Decimal) -> Decimal {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    rounded
}

/// Theme-dependent styling for the emphasised lines of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    theme: Theme,
    ansi: bool,
}

impl Palette {
    pub fn new(
        theme: Theme,
        ansi: bool,
    ) -> Self {
        Self { theme, ansi }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    fn emphasis(&self) -> &'static str {
        match self.theme {
            Theme::Light => "\x1b[1;34m",
            Theme::Dark => "\x1b[1;96m",
        }
    }

    pub fn emphasize(
        &self,
        text: &str,
    ) -> String {
        if self.ansi {
            format!("{}{text}\x1b[0m", self.emphasis())
        } else {
            text.to_string()
        }
    }
}

pub fn render_simulation(
    result: &SimulationResult,
    palette: &Palette,
) -> String {
    let tax_label = format!("Estimated tax ({})", format_percent(result.tax_rate));
    let rows = [
        ("Gross amount", result.gross_amount, false),
        ("Gross profit", result.gross_profit, false),
        (tax_label.as_str(), result.tax_owed, false),
        ("Net profit", result.net_profit, true),
        ("Net amount", result.net_amount, true),
    ];

    let width = rows.iter().map(|(label, ..)| label.len()).max().unwrap_or(0) + 1;
    let mut out = String::new();
    for (label, value, emphasised) in rows {
        let line = format!("{:<width$} {}", format!("{label}:"), format_currency(value));
        if emphasised {
            let _ = writeln!(out, "{}", palette.emphasize(&line));
        } else {
            let _ = writeln!(out, "{line}");
        }
    }
    out
}

pub fn render_withholding(
    tax: &WithholdingTax,
    palette: &Palette,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rate applied: {}", format_percent(tax.rate));
    let _ = writeln!(out, "Tax owed:     {}", format_currency(tax.tax_owed));
    let net = format!("Net profit:   {}", format_currency(tax.net_profit()));
    let _ = writeln!(out, "{}", palette.emphasize(&net));
    out
}

pub fn render_history(simulations: &[StoredSimulation]) -> String {
    if simulations.is_empty() {
        return "No saved simulations.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<20}  {:>16}  {:>10}  {:>8}",
        "id", "saved at (UTC)", "principal", "rate %", "years"
    );
    for sim in simulations {
        let _ = writeln!(
            out,
            "{:>4}  {:<20}  {:>16}  {:>10}  {:>8}",
            sim.id,
            sim.saved_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            format_currency(sim.principal),
            sim.annual_rate_percent.normalize().to_string(),
            sim.years.normalize().to_string(),
        );
    }
    out
}
