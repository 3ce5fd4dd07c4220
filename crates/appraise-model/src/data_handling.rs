//! Column-oriented listing datasets and the seeded train/evaluation split.
//!
//! A `Dataset` is a set of equally long named columns. Each column is either
//! text or numeric, and every cell may be missing; cleaning and
//! preprocessing decide what missing means for each stage.
use std::borrow::Cow;

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<Option<String>>),
    Numeric(Vec<Option<f64>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Numeric(v) => v.len(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Column::Text(_))
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Text(v) => v[row].is_none(),
            Column::Numeric(v) => v[row].is_none(),
        }
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&r| self.is_missing(r)).count()
    }

    pub fn numeric_at(&self, row: usize) -> Option<f64> {
        match self {
            Column::Numeric(v) => v[row],
            Column::Text(_) => None,
        }
    }

    /// Category key of a cell. Numeric cells are keyed by their decimal
    /// rendering so numeric-looking categorical columns still encode.
    pub fn category_at(&self, row: usize) -> Option<Cow<'_, str>> {
        match self {
            Column::Text(v) => v[row].as_deref().map(Cow::Borrowed),
            Column::Numeric(v) => v[row].map(|x| Cow::Owned(x.to_string())),
        }
    }

    /// Observed (non-missing) numeric values, in row order.
    pub fn observed_numeric(&self) -> Vec<f64> {
        match self {
            Column::Numeric(v) => v.iter().flatten().copied().collect(),
            Column::Text(_) => Vec::new(),
        }
    }

    pub fn select(&self, indices: &[usize]) -> Column {
        match self {
            Column::Text(v) => Column::Text(indices.iter().map(|&i| v[i].clone()).collect()),
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Empty dataset that will hold `rows` rows once columns are pushed.
    pub fn with_rows(rows: usize) -> Self {
        Dataset {
            names: Vec::new(),
            columns: Vec::new(),
            rows,
        }
    }

    /// Append a column, replacing any existing column with the same name.
    pub fn push_column(&mut self, name: &str, column: Column) {
        assert_eq!(
            column.len(),
            self.rows,
            "column '{}' has {} rows, dataset has {}",
            name,
            column.len(),
            self.rows
        );
        match self.position(name) {
            Some(idx) => self.columns[idx] = column,
            None => {
                self.names.push(name.to_string());
                self.columns.push(column);
            }
        }
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, PipelineError> {
        self.position(name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column, PipelineError> {
        match self.position(name) {
            Some(idx) => Ok(&mut self.columns[idx]),
            None => Err(PipelineError::MissingColumn(name.to_string())),
        }
    }

    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
            rows: indices.len(),
        }
    }

    /// Project onto the named columns, in the given order.
    pub fn select_columns(&self, names: &[&str]) -> Result<Dataset, PipelineError> {
        let mut out = Dataset::with_rows(self.rows);
        for &name in names {
            out.push_column(name, self.column(name)?.clone());
        }
        Ok(out)
    }

    /// Keep only the rows where `name` has a value.
    pub fn drop_missing(&self, name: &str) -> Result<Dataset, PipelineError> {
        let column = self.column(name)?;
        let keep: Vec<usize> = (0..self.rows).filter(|&r| !column.is_missing(r)).collect();
        Ok(self.select_rows(&keep))
    }

    /// Extract a fully populated numeric column as a target vector.
    pub fn target(&self, name: &str) -> Result<Array1<f64>, PipelineError> {
        match self.column(name)? {
            Column::Numeric(values) => values
                .iter()
                .enumerate()
                .map(|(row, v)| {
                    v.ok_or_else(|| PipelineError::MissingValue {
                        column: name.to_string(),
                        row,
                    })
                })
                .collect::<Result<Vec<f64>, _>>()
                .map(Array1::from_vec),
            Column::Text(_) => Err(PipelineError::NonNumericColumn(name.to_string())),
        }
    }
}

/// Row indices of a train/evaluation partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seeded random partition of `n_rows` rows.
///
/// The rows are permuted with a `StdRng` seeded from `seed`; the first
/// `ceil(n_rows * test_fraction)` permuted indices form the evaluation set
/// and the rest the training set.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, PipelineError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::InvalidConfig(format!(
            "test_fraction must lie in (0, 1), got {}",
            test_fraction
        )));
    }

    let n_test = (n_rows as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(PipelineError::InsufficientRows { rows: n_rows });
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    log::trace!(
        "Split {} rows into {} training and {} evaluation rows (seed {})",
        n_rows,
        train.len(),
        indices.len(),
        seed
    );

    Ok(SplitIndices {
        train,
        test: indices,
    })
}
