use thiserror::Error;

/// Errors returned by generation, loading, scaling and clustering.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A column cannot be z-scored because its standard deviation is zero or undefined.
    #[error("column {column} has zero variance")]
    ZeroVariance {
        /// Column name.
        column: String,
    },

    /// A required column is absent from a file header or frame.
    #[error("missing column {column}")]
    MissingColumn {
        /// Column name.
        column: String,
    },

    /// A record still carries a missing value where a number is required.
    #[error("missing value in column {column} at row {row}")]
    MissingValue {
        /// Column name.
        column: &'static str,
        /// Row index (0-based).
        row: usize,
    },

    /// Malformed line in a delimited text file.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// Line number (1-based, header is line 1).
        line: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// A point has a NaN or infinite coordinate.
    #[error("point {point} has a non-finite coordinate")]
    NonFiniteValue {
        /// Point index.
        point: usize,
    },

    /// A distance evaluated to NaN or infinity during assignment.
    #[error("non-finite distance for point {point}")]
    NonFiniteDistance {
        /// Point index.
        point: usize,
    },

    /// Empty clusters could not be refilled.
    #[error("k-means failed to keep every cluster non-empty after {attempts} reseeding attempts")]
    ConvergenceFailure {
        /// Reseeding rounds performed.
        attempts: usize,
    },

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
