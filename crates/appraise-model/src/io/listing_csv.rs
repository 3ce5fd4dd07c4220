//! Listing CSV/TSV reader.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data_handling::{Column, Dataset};
use crate::error::PipelineError;
use crate::schema::CATEGORICAL_COLUMNS;

/// Configuration for reading listing tables.
#[derive(Debug, Clone)]
pub struct ListingReaderConfig {
    /// Field delimiter. When `None` it is chosen from the file extension
    /// (`.tsv` reads tab separated, anything else comma separated).
    pub delimiter: Option<u8>,
    /// Cell values treated as missing, compared after trimming whitespace.
    pub na_values: Vec<String>,
    /// Columns always read as text, even when every cell looks numeric.
    /// Keeps categorical keys such as `07030` identical between files.
    pub text_columns: Vec<String>,
}

impl Default for ListingReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            na_values: ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            text_columns: CATEGORICAL_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Read a listing CSV into a `Dataset` using the default configuration.
pub fn read_listings_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    read_listings_csv_with_config(path, &ListingReaderConfig::default())
}

/// Read a listing table into a `Dataset`.
///
/// Every column in the file is loaded. Columns named in `text_columns` are
/// text; any other column becomes numeric when all of its non-missing cells
/// parse as `f64`, and text otherwise.
pub fn read_listings_csv_with_config<P: AsRef<Path>>(
    path: P,
    config: &ListingReaderConfig,
) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })
        .with_context(|| format!("Failed to open listing file: {}", path.display()))?;

    let delimiter = config.delimiter.unwrap_or_else(|| {
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);
        if is_tsv {
            b'\t'
        } else {
            b','
        }
    });

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let csv_error = |source: csv::Error| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader
        .headers()
        .map_err(csv_error)
        .context("Failed to read header row")?
        .clone();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (row_idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(csv_error)
            .with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        for (col_idx, column) in cells.iter_mut().enumerate() {
            let value = record.get(col_idx).unwrap_or("");
            if is_missing(value, &config.na_values) {
                column.push(None);
            } else {
                column.push(Some(value.to_string()));
            }
        }
    }

    let n_rows = cells.first().map(Vec::len).unwrap_or(0);
    let mut dataset = Dataset::with_rows(n_rows);
    for (name, values) in headers.iter().zip(cells) {
        let column = if config.text_columns.iter().any(|c| c == name) {
            Column::Text(values)
        } else {
            infer_column(values)
        };
        log::trace!(
            "Column '{}': {} ({} missing)",
            name,
            if column.is_text() { "text" } else { "numeric" },
            column.missing_count()
        );
        dataset.push_column(name, column);
    }

    log::info!(
        "Loaded {} rows and {} columns from {}",
        dataset.nrows(),
        dataset.ncols(),
        path.display()
    );
    Ok(dataset)
}

fn is_missing(value: &str, na_values: &[String]) -> bool {
    let trimmed = value.trim();
    na_values.iter().any(|na| na == trimmed)
}

fn infer_column(values: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| match cell {
            Some(s) => s.trim().parse::<f64>().ok().map(Some),
            None => Some(None),
        })
        .collect();

    match parsed {
        Some(numeric) => Column::Numeric(numeric),
        None => Column::Text(values),
    }
}
