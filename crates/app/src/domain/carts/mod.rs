//! Carts

pub mod errors;
pub mod models;
mod repositories;
pub mod service;
pub mod storage;

pub use errors::{CartsServiceError, StorageError};
pub use service::*;
pub use storage::*;
