//! Dataset cleaning ahead of the train/evaluation split.
//!
//! Rows without a target are dropped. Missing text cells become
//! [`UNKNOWN_CATEGORY`]; missing numeric cells become the column median over
//! the whole cleaned dataset. The median therefore sees evaluation rows too,
//! which leaks a little information into training. The preprocessor imputes
//! again from training rows only.
use ndarray::Array1;

use crate::data_handling::{Column, Dataset};
use crate::error::PipelineError;
use crate::schema::UNKNOWN_CATEGORY;
use crate::stats::median;

/// Features and target after cleaning.
#[derive(Debug, Clone)]
pub struct CleanedData {
    /// Only the requested feature columns, in the requested order.
    pub features: Dataset,
    pub target: Array1<f64>,
}

/// Drop rows with a missing target and fill missing feature cells.
pub fn clean(
    dataset: &Dataset,
    feature_columns: &[&str],
    target_column: &str,
) -> Result<CleanedData, PipelineError> {
    let before = dataset.nrows();
    let kept = dataset.drop_missing(target_column)?;
    if kept.nrows() < before {
        log::info!(
            "Dropped {} of {} rows with missing {}",
            before - kept.nrows(),
            before,
            target_column
        );
    }

    let target = kept.target(target_column)?;
    let mut features = kept.select_columns(feature_columns)?;

    for &name in feature_columns {
        let column = features.column_mut(name)?;
        let missing = column.missing_count();
        match column {
            Column::Text(values) => {
                for cell in values.iter_mut().filter(|c| c.is_none()) {
                    *cell = Some(UNKNOWN_CATEGORY.to_string());
                }
                log::debug!("Filled {} missing '{}' cells with '{}'", missing, name, UNKNOWN_CATEGORY);
            }
            Column::Numeric(values) => {
                let observed: Vec<f64> = values.iter().flatten().copied().collect();
                let fill = match median(&observed) {
                    Some(m) => m,
                    None => {
                        log::warn!("Column '{}' has no observed values; filling with 0", name);
                        0.0
                    }
                };
                for cell in values.iter_mut().filter(|c| c.is_none()) {
                    *cell = Some(fill);
                }
                log::debug!("Filled {} missing '{}' cells with median {}", missing, name, fill);
            }
        }
    }

    Ok(CleanedData { features, target })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> Dataset {
        let mut ds = Dataset::with_rows(5);
        ds.push_column(
            "TYPE",
            Column::Text(vec![
                Some("Condo".into()),
                None,
                Some("House".into()),
                None,
                Some("Condo".into()),
            ]),
        );
        ds.push_column(
            "BEDS",
            Column::Numeric(vec![Some(1.0), Some(5.0), None, Some(3.0), Some(100.0)]),
        );
        ds.push_column(
            "PRICE",
            Column::Numeric(vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0), None]),
        );
        ds
    }

    #[test]
    fn fills_text_with_placeholder() {
        let cleaned = clean(&raw(), &["TYPE", "BEDS"], "PRICE").unwrap();
        let col = cleaned.features.column("TYPE").unwrap();
        assert_eq!(col.missing_count(), 0);
        assert_eq!(col.category_at(1).as_deref(), Some(UNKNOWN_CATEGORY));
        assert_eq!(col.category_at(3).as_deref(), Some(UNKNOWN_CATEGORY));
    }

    #[test]
    fn median_ignores_rows_without_target() {
        // The 100-bed row has no price, so the median is over {1, 5, 3}.
        let cleaned = clean(&raw(), &["TYPE", "BEDS"], "PRICE").unwrap();
        let col = cleaned.features.column("BEDS").unwrap();
        assert_eq!(col.numeric_at(2), Some(3.0));
        assert_eq!(cleaned.target.to_vec(), vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn missing_feature_column_fails() {
        let err = clean(&raw(), &["TYPE", "BATH"], "PRICE").unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(ref c) if c == "BATH"));
    }

    #[test]
    fn empty_numeric_column_falls_back_to_zero() {
        let mut ds = Dataset::with_rows(2);
        ds.push_column("BEDS", Column::Numeric(vec![None, None]));
        ds.push_column("PRICE", Column::Numeric(vec![Some(1.0), Some(2.0)]));
        let cleaned = clean(&ds, &["BEDS"], "PRICE").unwrap();
        assert_eq!(cleaned.features.column("BEDS").unwrap().numeric_at(0), Some(0.0));
    }
}
