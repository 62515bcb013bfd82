use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("caller {0} is not authorized to mutate this store")]
    Unauthorized(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("update rejected: {0}")]
    Rejected(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}
