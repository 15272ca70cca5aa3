//! Typed Cache - a generic caching facade
//!
//! Stores typed values under typed keys on any byte-oriented backend. Keys
//! become identifiers through a [`Hasher`](hasher::Hasher), values become bytes
//! through a [`Marshaler`](marshaler::Marshaler), and a [`Store`](store::Store)
//! keeps the bytes. Each of the three can be replaced independently.
//!
//! ```no_run
//! # async fn demo() -> typed_cache::Result<()> {
//! use typed_cache::Cache;
//!
//! let cache: Cache<i64, i64> = Cache::with_map_store(0);
//! cache.set(&1, &1000).await?;
//! assert_eq!(cache.get(&1).await?, 1000);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod hasher;
pub mod marshaler;
pub mod store;

pub use cache::{Cache, Stats};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{Context, MapStore, Store, StoreError};
