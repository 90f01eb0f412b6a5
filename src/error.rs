//! Engine error types

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the painting engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no reference image loaded")]
    NoReference,

    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<EngineError> for String {
    fn from(err: EngineError) -> Self {
        err.to_string()
    }
}
