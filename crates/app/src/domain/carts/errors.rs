//! Carts storage and service errors.

use sqlx::Error;
use thiserror::Error;

use crate::request_context::ContextError;

/// Errors raised by [`CartsStorage`](super::CartsStorage) implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("record not found")]
    NotFound,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StorageError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}

impl From<ContextError> for StorageError {
    fn from(error: ContextError) -> Self {
        match error {
            ContextError::Canceled => Self::Canceled,
            ContextError::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}

/// Errors raised by [`CartsService`](super::CartsService) implementations.
#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("context canceled")]
    ContextCanceled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("not found")]
    NotFound,

    #[error("{op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StorageError,
    },
}

impl From<ContextError> for CartsServiceError {
    fn from(error: ContextError) -> Self {
        match error {
            ContextError::Canceled => Self::ContextCanceled,
            ContextError::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}
