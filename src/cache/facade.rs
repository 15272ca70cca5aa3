//! Cache Facade Module
//!
//! Typed cache combining a hasher, a marshaler and a storage backend, with
//! optional operation statistics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, trace};

use crate::cache::{Stats, SyncStats};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::hasher::{Hasher, MsgpackHasher};
use crate::marshaler::{Marshaler, MsgpackMarshaler};
use crate::store::{Context, MapStore, Store, StoreError};

// == Cache ==
/// Typed cache over a byte-oriented [`Store`].
///
/// Each operation derives the key's identifier with the hasher, converts the
/// value with the marshaler, and hands the bytes to the store. The facade adds
/// no locking around storage calls: concurrent operations on the same key are
/// ordered only by the backend.
///
/// `Cache` is `Send + Sync`; share it across tasks with an `Arc`.
pub struct Cache<K: ?Sized, V> {
    /// Identifier derivation strategy
    hasher: Box<dyn Hasher<K>>,
    /// Value encoding strategy
    marshaler: Box<dyn Marshaler<V>>,
    /// Storage backend
    store: Arc<dyn Store>,
    /// Operation counters
    stats: SyncStats,
    /// Whether operations update `stats`
    use_stats: AtomicBool,
}

impl<K, V> Cache<K, V>
where
    K: Serialize + ?Sized,
    V: Serialize + DeserializeOwned,
{
    // == Constructors ==
    /// Creates a cache over `store` with the MessagePack hasher and marshaler.
    pub fn new<S: Store + 'static>(store: S) -> Self {
        Self::with_shared_store(Arc::new(store))
    }

    /// Creates a cache over a backend that other caches may also use.
    pub fn with_shared_store(store: Arc<dyn Store>) -> Self {
        Self::with_strategies(store, MsgpackHasher, MsgpackMarshaler)
    }

    /// Creates a cache backed by a new [`MapStore`].
    ///
    /// # Arguments
    /// * `capacity` - Number of entries the map pre-allocates
    pub fn with_map_store(capacity: usize) -> Self {
        Self::new(MapStore::new(capacity))
    }

    /// Creates a map-backed cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        let cache = Self::with_map_store(config.map_capacity);
        if config.stats_enabled {
            cache.enable_stats();
        }
        cache
    }
}

impl<K, V> Cache<K, V>
where
    K: ?Sized,
{
    /// Creates a cache with explicit strategies.
    ///
    /// Use this for key or value types the default strategies cannot handle.
    pub fn with_strategies(
        store: Arc<dyn Store>,
        hasher: impl Hasher<K> + 'static,
        marshaler: impl Marshaler<V> + 'static,
    ) -> Self {
        debug!(
            key_type = std::any::type_name::<K>(),
            value_type = std::any::type_name::<V>(),
            "cache created"
        );
        Self {
            hasher: Box::new(hasher),
            marshaler: Box::new(marshaler),
            store,
            stats: SyncStats::new(),
            use_stats: AtomicBool::new(false),
        }
    }

    // == Strategy Replacement ==
    /// Replaces the hasher used by subsequent operations.
    ///
    /// Identifiers produced by the previous hasher are not migrated.
    pub fn set_hasher(&mut self, hasher: impl Hasher<K> + 'static) {
        self.hasher = Box::new(hasher);
    }

    /// Replaces the marshaler used by subsequent operations.
    pub fn set_marshaler(&mut self, marshaler: impl Marshaler<V> + 'static) {
        self.marshaler = Box::new(marshaler);
    }

    /// Returns the storage backend.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// Returns [`CacheError::NotFound`] if the key was never set, was
    /// deleted, or was removed by a clear.
    pub async fn get(&self, key: &K) -> Result<V> {
        self.get_with_context(&Context::background(), key).await
    }

    /// Retrieves the value stored under `key`, bounded by `ctx`.
    pub async fn get_with_context(&self, ctx: &Context, key: &K) -> Result<V> {
        let id = match self.hasher.hash(key) {
            Ok(id) => id,
            Err(err) => {
                debug!(error = %err, "cache get failed to hash key");
                self.record(SyncStats::record_read_error);
                return Err(err.into());
            }
        };

        let bytes = match self.store.get(ctx, &id).await {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound) => {
                trace!(id = %id, "cache miss");
                self.record(|s| s.record_read(false, 0));
                return Err(CacheError::NotFound);
            }
            Err(err) => {
                debug!(id = %id, error = %err, "cache get failed in store");
                self.record(SyncStats::record_read_error);
                return Err(CacheError::Store(err));
            }
        };

        match self.marshaler.unmarshal(&bytes) {
            Ok(value) => {
                trace!(id = %id, bytes = bytes.len(), "cache hit");
                self.record(|s| s.record_read(true, bytes.len()));
                Ok(value)
            }
            Err(err) => {
                debug!(id = %id, error = %err, "cache get failed to decode value");
                self.record(SyncStats::record_read_error);
                Err(err.into())
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &K, value: &V) -> Result<()> {
        self.set_with_context(&Context::background(), key, value)
            .await
    }

    /// Stores `value` under `key`, bounded by `ctx`.
    ///
    /// If `ctx` ends while the store is writing, whether the value landed is
    /// up to the backend.
    pub async fn set_with_context(&self, ctx: &Context, key: &K, value: &V) -> Result<()> {
        let id = match self.hasher.hash(key) {
            Ok(id) => id,
            Err(err) => {
                debug!(error = %err, "cache set failed to hash key");
                self.record(SyncStats::record_write_error);
                return Err(err.into());
            }
        };

        let bytes = match self.marshaler.marshal(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(id = %id, error = %err, "cache set failed to encode value");
                self.record(SyncStats::record_write_error);
                return Err(err.into());
            }
        };

        let len = bytes.len();
        match self.store.set(ctx, &id, bytes).await {
            Ok(()) => {
                trace!(id = %id, bytes = len, "cache write");
                self.record(|s| s.record_write(len));
                Ok(())
            }
            Err(err) => {
                debug!(id = %id, error = %err, "cache set failed in store");
                self.record(SyncStats::record_write_error);
                Err(err.into())
            }
        }
    }

    // == Delete ==
    /// Removes `key`. Deleting an absent key succeeds.
    pub async fn delete(&self, key: &K) -> Result<()> {
        self.delete_with_context(&Context::background(), key).await
    }

    /// Removes `key`, bounded by `ctx`.
    pub async fn delete_with_context(&self, ctx: &Context, key: &K) -> Result<()> {
        let id = match self.hasher.hash(key) {
            Ok(id) => id,
            Err(err) => {
                debug!(error = %err, "cache delete failed to hash key");
                self.record(SyncStats::record_delete_error);
                return Err(err.into());
            }
        };

        match self.store.delete(ctx, &id).await {
            Ok(()) => {
                trace!(id = %id, "cache delete");
                self.record(SyncStats::record_delete);
                Ok(())
            }
            Err(err) => {
                debug!(id = %id, error = %err, "cache delete failed in store");
                self.record(SyncStats::record_delete_error);
                Err(err.into())
            }
        }
    }

    // == Clear ==
    /// Removes every entry from the backend.
    pub async fn clear(&self) -> Result<()> {
        self.clear_with_context(&Context::background()).await
    }

    /// Removes every entry from the backend, bounded by `ctx`.
    ///
    /// Calls already handed to the store are not affected.
    pub async fn clear_with_context(&self, ctx: &Context) -> Result<()> {
        match self.store.clear(ctx).await {
            Ok(()) => {
                trace!("cache clear");
                self.record(SyncStats::record_clear);
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "cache clear failed in store");
                self.record(SyncStats::record_clear_error);
                Err(err.into())
            }
        }
    }

    // == Statistics ==
    /// Starts collecting statistics for the rest of this cache's life.
    pub fn enable_stats(&self) {
        if !self.use_stats.swap(true, Ordering::AcqRel) {
            info!("cache statistics enabled");
        }
    }

    /// Returns true if operations are being counted.
    pub fn is_stats_enabled(&self) -> bool {
        self.use_stats.load(Ordering::Acquire)
    }

    /// Zeroes all counters. Collection stays enabled or disabled as it was.
    pub fn reset_stats(&self) {
        self.stats.reset();
        debug!("cache statistics reset");
    }

    /// Returns the current counters and whether collection is enabled.
    ///
    /// When collection is disabled the snapshot is well-formed but does not
    /// describe recent traffic.
    pub fn stats(&self) -> (Stats, bool) {
        (self.stats.snapshot(), self.is_stats_enabled())
    }

    fn record(&self, f: impl FnOnce(&SyncStats)) {
        if self.is_stats_enabled() {
            f(&self.stats);
        }
    }
}
