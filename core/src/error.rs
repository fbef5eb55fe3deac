use thiserror::Error;

// Every way an engine call can reject its input.
// Nothing here is retryable: the caller sent a bad grid or a bad parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("elevation grid is empty")]
    EmptyGrid,

    #[error("ragged elevation grid: row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("non-finite elevation {value} at row {row}, column {col}")]
    NonFiniteValue { row: usize, col: usize, value: f64 },

    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

// Reject zero, negative, NaN and infinite lengths (cell sizes, intervals).
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be a positive, finite number",
        })
    }
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}
