use crate::error::{Error, Result};

#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Index of the nearest center and the squared distance to it.
///
/// Ties go to the lowest center index. Returns `None` if any distance is NaN or
/// infinite.
#[inline]
pub(crate) fn nearest(point: &[f64], centers: &[Vec<f64>]) -> Option<(usize, f64)> {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (j, c) in centers.iter().enumerate() {
        let d = squared_euclidean(point, c);
        if !d.is_finite() {
            return None;
        }
        if d < best_d {
            best = j;
            best_d = d;
        }
    }
    Some((best, best_d))
}

/// Check that `data` is non-empty, rectangular and finite; return its dimension.
pub(crate) fn validate_points(data: &[Vec<f64>]) -> Result<usize> {
    let first = data.first().ok_or(Error::EmptyInput)?;
    let d = first.len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "data",
            message: "points must have at least one dimension",
        });
    }
    for (i, p) in data.iter().enumerate() {
        if p.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: p.len(),
            });
        }
        if p.iter().any(|x| !x.is_finite()) {
            return Err(Error::NonFiniteValue { point: i });
        }
    }
    Ok(d)
}
