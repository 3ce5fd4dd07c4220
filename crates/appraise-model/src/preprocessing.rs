//! Feature preprocessing fitted on training rows.
//!
//! Provides a one-hot encoder for categorical columns and a median imputer
//! for numerical columns, combined by `Preprocessor` into a single dense
//! `Array2<f32>` feature matrix. Encoded columns are laid out as one block
//! per categorical column (categories sorted) followed by the numerical
//! columns in declared order.

use std::collections::BTreeSet;

use ndarray::{Array2, ArrayViewMut1, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data_handling::{Column, Dataset};
use crate::error::PipelineError;
use crate::stats::median;

/// One-hot encoder with an ignore policy for unseen categories.
///
/// Categories not observed during `fit`, and missing cells, encode as an
/// all-zero block instead of failing. Inference data routinely contains
/// street names and localities that never appeared in training.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    columns: Vec<String>,
    /// Sorted vocabulary per column.
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    pub fn fit(dataset: &Dataset, columns: &[&str]) -> Result<Self, PipelineError> {
        let mut categories = Vec::with_capacity(columns.len());
        for &name in columns {
            let column = dataset.column(name)?;
            let vocabulary: BTreeSet<String> = (0..column.len())
                .filter_map(|r| column.category_at(r).map(|c| c.into_owned()))
                .collect();
            log::debug!("'{}': {} categories", name, vocabulary.len());
            categories.push(vocabulary.into_iter().collect());
        }
        Ok(OneHotEncoder {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            categories,
        })
    }

    /// Total number of indicator columns.
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.categories[idx].as_slice())
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .zip(&self.categories)
            .flat_map(|(col, cats)| cats.iter().map(move |c| format!("{}={}", col, c)))
            .collect()
    }

    fn encode_row(&self, columns: &[&Column], row: usize, mut out: ArrayViewMut1<f32>) {
        let mut offset = 0;
        for (column, vocabulary) in columns.iter().zip(&self.categories) {
            if let Some(key) = column.category_at(row) {
                if let Ok(pos) = vocabulary.binary_search_by(|c| c.as_str().cmp(&*key)) {
                    out[offset + pos] = 1.0;
                }
            }
            offset += vocabulary.len();
        }
    }
}

/// Per-column median imputer for numerical columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    columns: Vec<String>,
    medians: Vec<f64>,
}

impl MedianImputer {
    pub fn fit(dataset: &Dataset, columns: &[&str]) -> Result<Self, PipelineError> {
        let mut medians = Vec::with_capacity(columns.len());
        for &name in columns {
            let column = numeric_column(dataset, name)?;
            let fill = median(&column.observed_numeric()).unwrap_or_else(|| {
                log::warn!("'{}' has no observed training values; imputing 0", name);
                0.0
            });
            log::debug!("'{}': median {}", name, fill);
            medians.push(fill);
        }
        Ok(MedianImputer {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            medians,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn medians(&self) -> &[f64] {
        &self.medians
    }

    fn encode_row(&self, columns: &[&Column], row: usize, mut out: ArrayViewMut1<f32>) {
        for (i, (column, fill)) in columns.iter().zip(&self.medians).enumerate() {
            out[i] = column.numeric_at(row).unwrap_or(*fill) as f32;
        }
    }
}

fn numeric_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, PipelineError> {
    let column = dataset.column(name)?;
    if column.is_text() {
        return Err(PipelineError::NonNumericColumn(name.to_string()));
    }
    Ok(column)
}

/// One-hot encoder and median imputer applied side by side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    encoder: OneHotEncoder,
    imputer: MedianImputer,
}

impl Preprocessor {
    /// Learn vocabularies and medians from `dataset`, which should hold
    /// training rows only.
    pub fn fit(
        dataset: &Dataset,
        categorical: &[&str],
        numerical: &[&str],
    ) -> Result<Self, PipelineError> {
        let encoder = OneHotEncoder::fit(dataset, categorical)?;
        let imputer = MedianImputer::fit(dataset, numerical)?;
        log::info!(
            "Preprocessor fitted: {} one-hot columns + {} numerical columns",
            encoder.width(),
            imputer.columns.len()
        );
        Ok(Preprocessor { encoder, imputer })
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn imputer(&self) -> &MedianImputer {
        &self.imputer
    }

    /// Number of columns in the encoded feature matrix.
    pub fn width(&self) -> usize {
        self.encoder.width() + self.imputer.columns.len()
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.encoder.feature_names();
        names.extend(self.imputer.columns.iter().cloned());
        names
    }

    /// Encode every row of `dataset` with the fitted statistics.
    pub fn transform(&self, dataset: &Dataset) -> Result<Array2<f32>, PipelineError> {
        let categorical = self
            .encoder
            .columns
            .iter()
            .map(|name| dataset.column(name))
            .collect::<Result<Vec<_>, _>>()?;
        let numerical = self
            .imputer
            .columns
            .iter()
            .map(|name| numeric_column(dataset, name))
            .collect::<Result<Vec<_>, _>>()?;

        let n_rows = dataset.nrows();
        let width = self.width();
        let split = self.encoder.width();

        let mut x = Array2::<f32>::zeros((n_rows, width));
        x.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, out)| {
                let (cat_out, num_out) = out.split_at(Axis(0), split);
                self.encoder.encode_row(&categorical, row, cat_out);
                self.imputer.encode_row(&numerical, row, num_out);
            });
        Ok(x)
    }

    pub fn fit_transform(
        dataset: &Dataset,
        categorical: &[&str],
        numerical: &[&str],
    ) -> Result<(Self, Array2<f32>), PipelineError> {
        let pre = Self::fit(dataset, categorical, numerical)?;
        let x = pre.transform(dataset)?;
        Ok((pre, x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train() -> Dataset {
        let mut ds = Dataset::with_rows(4);
        ds.push_column(
            "TYPE",
            Column::Text(vec![
                Some("House".into()),
                Some("Condo".into()),
                Some("House".into()),
                Some("Co-op".into()),
            ]),
        );
        ds.push_column(
            "BEDS",
            Column::Numeric(vec![Some(1.0), None, Some(3.0), Some(8.0)]),
        );
        ds
    }

    #[test]
    fn vocabulary_is_sorted() {
        let enc = OneHotEncoder::fit(&train(), &["TYPE"]).unwrap();
        assert_eq!(enc.categories("TYPE").unwrap(), &["Co-op", "Condo", "House"]);
        assert_eq!(enc.feature_names()[0], "TYPE=Co-op");
    }

    #[test]
    fn layout_is_one_hot_then_numeric() {
        let (pre, x) = Preprocessor::fit_transform(&train(), &["TYPE"], &["BEDS"]).unwrap();
        assert_eq!(pre.width(), 4);
        assert_eq!(x.shape(), &[4, 4]);
        // Row 0: House, 1 bed.
        assert_eq!(x.row(0).to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
        // Row 1: Condo, missing beds -> training median of {1, 3, 8}.
        assert_eq!(x.row(1).to_vec(), vec![0.0, 1.0, 0.0, 3.0]);
    }

    #[test]
    fn unseen_and_missing_categories_encode_as_zero() {
        let pre = Preprocessor::fit(&train(), &["TYPE"], &["BEDS"]).unwrap();

        let mut eval = Dataset::with_rows(2);
        eval.push_column(
            "TYPE",
            Column::Text(vec![Some("Townhouse".into()), None]),
        );
        eval.push_column("BEDS", Column::Numeric(vec![Some(2.0), None]));

        let x = pre.transform(&eval).unwrap();
        for row in 0..2 {
            let block: f32 = (0..3).map(|c| x[(row, c)]).sum();
            assert_eq!(block, 0.0, "row {} should have an empty one-hot block", row);
        }
        assert_eq!(x[(0, 3)], 2.0);
        assert_eq!(x[(1, 3)], 3.0);
    }

    #[test]
    fn imputer_uses_training_statistics_only() {
        let pre = Preprocessor::fit(&train(), &[], &["BEDS"]).unwrap();
        let mut eval = Dataset::with_rows(3);
        eval.push_column("BEDS", Column::Numeric(vec![Some(100.0), Some(200.0), None]));
        let x = pre.transform(&eval).unwrap();
        assert_eq!(x[(2, 0)], 3.0);
    }

    #[test]
    fn text_numerical_column_is_rejected() {
        let err = Preprocessor::fit(&train(), &[], &["TYPE"]).unwrap_err();
        assert!(matches!(err, PipelineError::NonNumericColumn(_)));
    }

    #[test]
    fn transform_requires_fitted_columns() {
        let pre = Preprocessor::fit(&train(), &["TYPE"], &["BEDS"]).unwrap();
        let mut eval = Dataset::with_rows(1);
        eval.push_column("BEDS", Column::Numeric(vec![Some(1.0)]));
        assert!(matches!(
            pre.transform(&eval),
            Err(PipelineError::MissingColumn(ref c)) if c == "TYPE"
        ));
    }

    #[test]
    fn every_row_lands_in_its_own_slot() {
        let kinds = ["Co-op", "Condo", "House"];
        let n = 1_000;
        let mut ds = Dataset::with_rows(n);
        ds.push_column(
            "TYPE",
            Column::Text((0..n).map(|i| Some(kinds[i % 3].to_string())).collect()),
        );
        ds.push_column(
            "BEDS",
            Column::Numeric((0..n).map(|i| Some(i as f64)).collect()),
        );

        let (pre, x) = Preprocessor::fit_transform(&ds, &["TYPE"], &["BEDS"]).unwrap();
        assert_eq!(x.shape(), &[n, pre.width()]);
        for (i, row) in x.rows().into_iter().enumerate() {
            let mut expected = vec![0.0f32; 4];
            expected[i % 3] = 1.0;
            expected[3] = i as f32;
            assert_eq!(row.to_vec(), expected, "row {}", i);
        }
    }
}
