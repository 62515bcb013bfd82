//! Errors raised while constructing primitive values.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid account identity: {0:?}")]
    InvalidAccount(String),

    #[error("basis points out of range: {0} > 10000")]
    BasisPointsOutOfRange(u32),
}
