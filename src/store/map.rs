//! Map Store Module
//!
//! In-process backend: a hash map behind a read-write lock.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Context, Store, StoreError};

// == Map Store ==
/// Concurrent in-memory store.
///
/// Every call checks its context first, so a cancelled or expired context is
/// reported even though the map itself never blocks.
#[derive(Debug, Default)]
pub struct MapStore {
    /// Identifier to encoded value
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MapStore {
    // == Constructor ==
    /// Creates an empty store with room for `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn check(ctx: &Context) -> Result<(), StoreError> {
    match ctx.err() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[async_trait]
impl Store for MapStore {
    async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>, StoreError> {
        check(ctx)?;
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn set(&self, ctx: &Context, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        check(ctx)?;
        self.entries.write().insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, ctx: &Context, key: &str) -> Result<(), StoreError> {
        check(ctx)?;
        self.entries.write().remove(key);
        Ok(())
    }

    async fn clear(&self, ctx: &Context) -> Result<(), StoreError> {
        check(ctx)?;
        self.entries.write().clear();
        Ok(())
    }
}
