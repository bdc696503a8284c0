//! CSV loader for batch simulation input.
//!
//! ## CSV Format
//!
//! Each row holds the raw text of one investment form. Headers are matched by
//! name, so column order does not matter. Cells go through the same coercion
//! as interactive input: empty or unparseable numbers read as zero and an
//! unusable frequency falls back to the configured default.
//!
//! Cells are trimmed. A cell containing a comma must be quoted, and the
//! opening quote must directly follow the delimiter (`5,"1,000"`, not
//! `5, "1,000"`).
//!
//! | Column      | Required | Notes                                   |
//! |-------------|----------|-----------------------------------------|
//! | `principal` | yes      | e.g. `1000` or `"1,000.00"`             |
//! | `rate`      | no       | annual rate in percent, e.g. `10`       |
//! | `years`     | no       | may be fractional, e.g. `0.5`           |
//! | `frequency` | no       | compounding periods per year            |
//! | `apply_tax` | no       | `yes` to withhold tax, anything else no |
//!
//! ```csv
//! principal,rate,years,frequency,apply_tax
//! 1000,10,1,12,yes
//! 5000,12.5,2,4,no
//! ```

use std::path::Path;

use invest_core::input::SimulationForm;

/// Errors that can occur while loading batch input.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, e.g. a row with the wrong number of cells.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}

const REQUIRED_COLUMNS: [&str; 1] = ["principal"];

/// Parse CSV text into forms, in file order.
///
/// # Errors
///
/// * [`CsvLoadError::MissingColumn`] if the header lacks `principal`.
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid.
pub fn load_from_str(input: &str) -> Result<Vec<SimulationForm>, CsvLoadError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CsvLoadError::MissingColumn(column));
        }
    }

    reader
        .deserialize::<SimulationForm>()
        .map(|row| row.map_err(CsvLoadError::from))
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<SimulationForm>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use invest_core::input::InputDefaults;
    use invest_core::CompoundingFrequency;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------
    const FULL_CSV: &str = "\
principal,rate,years,frequency,apply_tax
1000,10,1,12,yes
5000,12.5,2,4,no
";

    const PRINCIPAL_ONLY_CSV: &str = "\
principal
2500
";

    // -----------------------------------------------------------------------
    // 1. Every column populated
    // -----------------------------------------------------------------------
    #[test]
    fn test_full_csv_rows_in_order() {
        let forms = load_from_str(FULL_CSV).expect("should parse");

        assert_eq!(forms.len(), 2);
        assert_eq!(
            forms[0],
            SimulationForm {
                principal: "1000".to_string(),
                rate: "10".to_string(),
                years: "1".to_string(),
                frequency: "12".to_string(),
                apply_tax: "yes".to_string(),
            }
        );
        assert_eq!(forms[1].principal, "5000");
    }

    // -----------------------------------------------------------------------
    // 2. Optional columns may be absent and coerce to defaults
    // -----------------------------------------------------------------------
    #[test]
    fn test_missing_optional_columns_coerce_to_defaults() {
        let forms = load_from_str(PRINCIPAL_ONLY_CSV).expect("should parse");

        let input = forms[0].coerce(&InputDefaults::default());

        assert_eq!(input.principal, dec!(2500));
        assert_eq!(input.annual_rate_percent, Decimal::ZERO);
        assert_eq!(input.years, Decimal::ZERO);
        assert_eq!(input.frequency, CompoundingFrequency::MONTHLY);
        assert!(!input.apply_tax);
    }

    // -----------------------------------------------------------------------
    // 3. Column order and whitespace do not matter
    // -----------------------------------------------------------------------
    #[test]
    fn test_shuffled_columns_with_whitespace() {
        let csv = "\
apply_tax , years , principal
YES , 0.5 ,\"1,000\"
";
        let forms = load_from_str(csv).expect("should parse");
        let input = forms[0].coerce(&InputDefaults::default());

        assert_eq!(input.principal, dec!(1000));
        assert_eq!(input.years, dec!(0.5));
        assert!(input.apply_tax);
    }

    #[test]
    fn test_space_before_quote_splits_the_cell() {
        let csv = "years,principal\n0.5, \"1,000\"\n";

        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    // -----------------------------------------------------------------------
    // 4. Garbage cells are not errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_garbage_cells_coerce_to_zero() {
        let csv = "principal,rate\nabc,ten\n";
        let forms = load_from_str(csv).expect("garbage cells are still valid rows");
        let input = forms[0].coerce(&InputDefaults::default());

        assert_eq!(input.principal, Decimal::ZERO);
        assert_eq!(input.annual_rate_percent, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 5. Errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_missing_principal_column() {
        let result = load_from_str("rate,years\n10,1\n");

        assert!(matches!(result, Err(CsvLoadError::MissingColumn("principal"))));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let result = load_from_str("principal,rate\n1000,10,extra\n");

        assert!(matches!(result, Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(load_from_str("").expect("empty is valid").is_empty());
        assert!(load_from_str("principal\n").expect("header only").is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_from_file(Path::new("/nonexistent/batch.csv"));

        assert!(matches!(result, Err(CsvLoadError::Io { .. })));
    }
}
