//! Store Module
//!
//! Byte-oriented storage contract consumed by the cache facade, plus the
//! in-memory map backend.
//!
//! # Backend Requirements
//! - `get` reports a missing key as [`StoreError::NotFound`] and nothing else
//! - `delete` of an absent key succeeds
//! - `clear` empties every key visible through the backend instance
//! - every call honors the [`Context`] it receives

mod context;
mod map;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::BoxError;

pub use context::Context;
pub use map::MapStore;

// == Store Error ==
/// Failure reported by a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Identifier is not present in the store
    #[error("key not found")]
    NotFound,

    /// The operation's context was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// The operation's context deadline passed
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Engine-specific failure (network, disk, ...)
    #[error(transparent)]
    Backend(BoxError),
}

impl StoreError {
    /// Wraps an engine error.
    pub fn backend(err: impl Into<BoxError>) -> Self {
        StoreError::Backend(err.into())
    }

    /// Returns true if the error is the shared miss sentinel.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

// == Store Trait ==
/// Storage backend for the cache.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the bytes stored under `key`.
    async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Stores `data` under `key`, replacing any previous value.
    async fn set(&self, ctx: &Context, key: &str, data: Vec<u8>) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, ctx: &Context, key: &str) -> Result<(), StoreError>;

    /// Removes every entry.
    async fn clear(&self, ctx: &Context) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> Store for Arc<S>
where
    S: Store + ?Sized,
{
    async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(ctx, key).await
    }

    async fn set(&self, ctx: &Context, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        (**self).set(ctx, key, data).await
    }

    async fn delete(&self, ctx: &Context, key: &str) -> Result<(), StoreError> {
        (**self).delete(ctx, key).await
    }

    async fn clear(&self, ctx: &Context) -> Result<(), StoreError> {
        (**self).clear(ctx).await
    }
}

#[async_trait]
impl<S> Store for Box<S>
where
    S: Store + ?Sized,
{
    async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(ctx, key).await
    }

    async fn set(&self, ctx: &Context, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        (**self).set(ctx, key, data).await
    }

    async fn delete(&self, ctx: &Context, key: &str) -> Result<(), StoreError> {
        (**self).delete(ctx, key).await
    }

    async fn clear(&self, ctx: &Context) -> Result<(), StoreError> {
        (**self).clear(ctx).await
    }
}
