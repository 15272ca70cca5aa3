//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror. Each variant names the
//! pipeline stage that failed so callers can tell a miss from a real problem.

use thiserror::Error;

use crate::hasher::HashError;
use crate::marshaler::{MarshalError, UnmarshalError};
use crate::store::StoreError;

/// Boxed error used as the cause of strategy and backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key could not be turned into a storage identifier
    #[error(transparent)]
    Hash(#[from] HashError),

    /// Value could not be serialized
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    /// Stored bytes could not be deserialized into the value type
    #[error(transparent)]
    Unmarshal(#[from] UnmarshalError),

    /// Key not found in the store
    #[error("key not found")]
    NotFound,

    /// Backend failure, including cancellation and deadlines
    #[error("store operation failed")]
    Store(#[source] StoreError),
}

impl CacheError {
    /// Returns true if the error reports a cache miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound)
    }
}

// A backend miss is never wrapped as a generic store failure.
impl From<StoreError> for CacheError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => CacheError::NotFound,
            other => CacheError::Store(other),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
