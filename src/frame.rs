//! Named numeric columns.
//!
//! A [`Frame`] is the numeric view of a cleaned [`Dataset`]: one `f64` column per
//! numeric field. Column transforms never modify a frame in place; they return a
//! derived frame so the unscaled and scaled views can be used side by side.

use crate::data::Dataset;
use crate::error::{Error, Result};

/// Column holding the policyholder age.
pub const AGE: &str = "age";
/// Column holding the sum assured.
pub const SUM_ASSURED: &str = "sum_assured";
/// Column holding the contract id.
pub const ID: &str = "id";

/// Immutable table of equally long `f64` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<(String, Vec<f64>)>,
    n_rows: usize,
}

impl Frame {
    /// Build a frame from named columns.
    ///
    /// All columns must have the same length and distinct names.
    pub fn new(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |(_, c)| c.len());
        for (i, (name, values)) in columns.iter().enumerate() {
            if values.len() != n_rows {
                return Err(Error::DimensionMismatch {
                    expected: n_rows,
                    found: values.len(),
                });
            }
            if columns[..i].iter().any(|(other, _)| other == name) {
                return Err(Error::InvalidParameter {
                    name: "columns",
                    message: "column names must be distinct",
                });
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Numeric view of `dataset` with columns `age`, `sum_assured` and `id`.
    ///
    /// Fails with [`Error::MissingValue`] if any record has no age; clean the
    /// dataset first.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let mut age = Vec::with_capacity(dataset.len());
        let mut sum_assured = Vec::with_capacity(dataset.len());
        let mut id = Vec::with_capacity(dataset.len());
        for (row, r) in dataset.records().iter().enumerate() {
            let a = r.age.ok_or(Error::MissingValue { column: AGE, row })?;
            age.push(a as f64);
            sum_assured.push(r.sum_assured as f64);
            id.push(r.id as f64);
        }
        Self::new(vec![
            (AGE.to_string(), age),
            (SUM_ASSURED.to_string(), sum_assured),
            (ID.to_string(), id),
        ])
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Values of one column.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Apply `f` to each of the named columns, returning a new frame.
    ///
    /// `f` receives the column name and its values and returns the replacement
    /// values. Columns not listed are carried over unchanged.
    pub fn map_columns<F>(&self, names: &[&str], mut f: F) -> Result<Frame>
    where
        F: FnMut(&str, &[f64]) -> Result<Vec<f64>>,
    {
        for name in names {
            self.column(name)?;
        }

        let mut columns = Vec::with_capacity(self.columns.len());
        for (name, values) in &self.columns {
            if names.contains(&name.as_str()) {
                let mapped = f(name.as_str(), values.as_slice())?;
                if mapped.len() != self.n_rows {
                    return Err(Error::DimensionMismatch {
                        expected: self.n_rows,
                        found: mapped.len(),
                    });
                }
                columns.push((name.clone(), mapped));
            } else {
                columns.push((name.clone(), values.clone()));
            }
        }
        Ok(Frame {
            columns,
            n_rows: self.n_rows,
        })
    }

    /// Project rows onto `names`, one point per row.
    pub fn points(&self, names: &[&str]) -> Result<Vec<Vec<f64>>> {
        if names.is_empty() {
            return Err(Error::InvalidParameter {
                name: "features",
                message: "at least one column is required",
            });
        }
        let cols = names
            .iter()
            .map(|n| self.column(n))
            .collect::<Result<Vec<_>>>()?;
        Ok((0..self.n_rows)
            .map(|row| cols.iter().map(|c| c[row]).collect())
            .collect())
    }
}
