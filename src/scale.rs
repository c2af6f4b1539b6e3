//! Z-score feature scaling.
//!
//! Age is measured in years and sum assured in hundreds of thousands, so
//! unscaled k-means is dominated by the sum assured. Standardizing each feature
//! to mean 0 and standard deviation 1 gives both the same weight:
//!
//! ```text
//! z = (x - μ) / σ
//! ```
//!
//! `μ` is the column mean and `σ` the sample standard deviation (`n - 1`
//! denominator), both computed once from the full column.

use crate::error::{Error, Result};
use crate::frame::Frame;

/// Location and scale of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScale {
    /// Column name.
    pub column: String,
    /// Column mean.
    pub mean: f64,
    /// Sample standard deviation.
    pub sd: f64,
}

impl ColumnScale {
    /// Map a raw value to its z-score.
    #[inline]
    pub fn forward(&self, x: f64) -> f64 {
        (x - self.mean) / self.sd
    }

    /// Map a z-score back to raw units.
    #[inline]
    pub fn inverse(&self, z: f64) -> f64 {
        z * self.sd + self.mean
    }
}

/// Fitted z-score transform over a set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScore {
    scales: Vec<ColumnScale>,
}

impl ZScore {
    /// Compute mean and sample standard deviation of each named column.
    pub fn fit(frame: &Frame, columns: &[&str]) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::InvalidParameter {
                name: "columns",
                message: "at least one column is required",
            });
        }
        if frame.n_rows() == 0 {
            return Err(Error::EmptyInput);
        }

        let mut scales = Vec::with_capacity(columns.len());
        for &name in columns {
            let values = frame.column(name)?;
            let mean = mean(values);
            let sd = sample_sd(values, mean);
            if !mean.is_finite() || !sd.is_finite() || sd == 0.0 {
                return Err(Error::ZeroVariance {
                    column: name.to_string(),
                });
            }
            scales.push(ColumnScale {
                column: name.to_string(),
                mean,
                sd,
            });
        }
        Ok(Self { scales })
    }

    /// Fitted parameters, in the order the columns were given.
    pub fn scales(&self) -> &[ColumnScale] {
        &self.scales
    }

    /// Parameters for one column.
    pub fn scale(&self, column: &str) -> Option<&ColumnScale> {
        self.scales.iter().find(|s| s.column == column)
    }

    fn names(&self) -> Vec<&str> {
        self.scales.iter().map(|s| s.column.as_str()).collect()
    }

    /// Standardize the fitted columns of `frame`.
    pub fn transform(&self, frame: &Frame) -> Result<Frame> {
        frame.map_columns(&self.names(), |name, values| {
            let s = self.lookup(name)?;
            Ok(values.iter().map(|&x| s.forward(x)).collect())
        })
    }

    /// Undo [`transform`](Self::transform).
    pub fn inverse_transform(&self, frame: &Frame) -> Result<Frame> {
        frame.map_columns(&self.names(), |name, values| {
            let s = self.lookup(name)?;
            Ok(values.iter().map(|&z| s.inverse(z)).collect())
        })
    }

    /// Map a point whose coordinates are `columns` back to raw units.
    ///
    /// Used to report centers found in scaled space.
    pub fn inverse_point(&self, columns: &[&str], point: &[f64]) -> Result<Vec<f64>> {
        if columns.len() != point.len() {
            return Err(Error::DimensionMismatch {
                expected: columns.len(),
                found: point.len(),
            });
        }
        columns
            .iter()
            .zip(point)
            .map(|(name, &z)| -> Result<f64> { Ok(self.lookup(name)?.inverse(z)) })
            .collect()
    }

    fn lookup(&self, name: &str) -> Result<&ColumnScale> {
        self.scale(name).ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
        })
    }
}

/// Fit a [`ZScore`] on `columns` and apply it in one step.
pub fn scale_columns(frame: &Frame, columns: &[&str]) -> Result<(Frame, ZScore)> {
    let z = ZScore::fit(frame, columns)?;
    let scaled = z.transform(frame)?;
    Ok((scaled, z))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// NaN for fewer than two values.
fn sample_sd(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(a: Vec<f64>, b: Vec<f64>) -> Frame {
        Frame::new(vec![("a".to_string(), a), ("b".to_string(), b)]).unwrap()
    }

    #[test]
    fn standardizes_selected_columns() {
        let f = frame(vec![1.0, 2.0, 3.0, 4.0], vec![10.0, 10.0, 20.0, 20.0]);
        let (scaled, z) = scale_columns(&f, &["a"]).unwrap();

        let s = z.scale("a").unwrap();
        assert!((s.mean - 2.5).abs() < 1e-12);
        assert!((s.sd - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);

        let a = scaled.column("a").unwrap();
        let m: f64 = a.iter().sum::<f64>() / 4.0;
        let var: f64 = a.iter().map(|x| (x - m).powi(2)).sum::<f64>() / 3.0;
        assert!(m.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);

        // Unlisted column untouched.
        assert_eq!(scaled.column("b").unwrap(), f.column("b").unwrap());
    }

    #[test]
    fn zero_variance_is_an_error() {
        let f = frame(vec![1.0, 2.0], vec![5.0, 5.0]);
        match scale_columns(&f, &["a", "b"]) {
            Err(Error::ZeroVariance { column }) => assert_eq!(column, "b"),
            other => panic!("unexpected: {other:?}"),
        }

        let single = frame(vec![1.0], vec![2.0]);
        assert!(matches!(
            ZScore::fit(&single, &["a"]),
            Err(Error::ZeroVariance { .. })
        ));
    }

    #[test]
    fn empty_frame_and_unknown_column() {
        let empty = frame(vec![], vec![]);
        assert!(matches!(
            ZScore::fit(&empty, &["a"]),
            Err(Error::EmptyInput)
        ));
        let f = frame(vec![1.0, 2.0], vec![3.0, 4.0]);
        assert!(matches!(
            ZScore::fit(&f, &["c"]),
            Err(Error::MissingColumn { .. })
        ));
    }

    #[test]
    fn inverse_point_restores_units() {
        let f = frame(vec![20.0, 40.0, 60.0], vec![1.0, 2.0, 6.0]);
        let (scaled, z) = scale_columns(&f, &["a", "b"]).unwrap();
        let p = scaled.points(&["b", "a"]).unwrap();
        let raw = z.inverse_point(&["b", "a"], &p[2]).unwrap();
        assert!((raw[0] - 6.0).abs() < 1e-9);
        assert!((raw[1] - 60.0).abs() < 1e-9);
        assert!(z.inverse_point(&["a"], &p[0]).is_err());
    }
}
