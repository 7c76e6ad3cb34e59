use thiserror::Error;

/// Problems with the literal result tables. Raised before anything is drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("missing key '{key}' in '{source_name}'")]
    MissingKey { source_name: String, key: String },

    #[error("'{key}' must contain {expected} values, got {actual}")]
    LengthMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate series '{name}'")]
    DuplicateSeries { name: String },

    #[error("series '{series}' has more than one value at x = {x}")]
    DuplicatePoint { series: String, x: f64 },

    #[error("'{key}' contains a non-finite value at position {index}")]
    NonFinite { key: String, index: usize },

    #[error("value {value} of '{key}' at position {index} is outside [0.0, 1.0]")]
    OutOfRange {
        key: String,
        index: usize,
        value: f64,
    },
}

pub type DataResult<T> = Result<T, DataError>;
