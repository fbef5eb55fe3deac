use earthwork_storage::StoreError;
use thiserror::Error;

// What the request layer reports back to a caller.
// `NotFound` and `BadRequest` are caller mistakes; `Engine` is invalid
// input caught by the analysis engine; `Store` is a persistence failure.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("analysis rejected input: {0}")]
    Engine(#[from] earthwork_core::Error),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        ServiceError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    // HTTP-style status for front ends that want one
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NotFound { .. } => 404,
            ServiceError::BadRequest(_) | ServiceError::Engine(_) => 400,
            ServiceError::Store(StoreError::InvalidRecord { .. }) => 422,
            ServiceError::Store(_) => 500,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
