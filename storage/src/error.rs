use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // The document parsed but a record failed validation (e.g. a ragged grid)
    #[error("invalid record in {}: {reason}", path.display())]
    InvalidRecord { path: PathBuf, reason: String },

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
