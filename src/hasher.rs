//! Hasher Module
//!
//! Derives storage identifiers from typed keys.

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::error::BoxError;

// == Hasher Trait ==
/// Turns a key value into a string identifier.
///
/// Implementations must be deterministic: equal keys yield equal identifiers
/// across calls and across process runs, so persistent backends stay valid
/// after a restart.
pub trait Hasher<K: ?Sized>: Send + Sync {
    /// Returns the identifier of `key`.
    fn hash(&self, key: &K) -> Result<String, HashError>;
}

// == Hash Error ==
/// Error raised when a key cannot be turned into an identifier.
#[derive(Error, Debug)]
#[error("error when hashing object of type {type_name}: {source}")]
pub struct HashError {
    /// Name of the key type that failed
    pub type_name: &'static str,
    /// Underlying cause
    #[source]
    pub source: BoxError,
}

impl HashError {
    /// Creates an error for key type `K`.
    pub fn new<K: ?Sized>(source: impl Into<BoxError>) -> Self {
        Self {
            type_name: std::any::type_name::<K>(),
            source: source.into(),
        }
    }
}

// == Msgpack Hasher ==
/// Default hasher: MessagePack-encodes the key and renders its SHA-256
/// digest as lowercase hex.
///
/// Records are encoded with field names, so structural keys hash the same way
/// the default marshaler stores them. Map keys must iterate in a stable order
/// (`BTreeMap`, not `HashMap`) for the identifier to be stable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgpackHasher;

impl<K> Hasher<K> for MsgpackHasher
where
    K: Serialize + ?Sized,
{
    fn hash(&self, key: &K) -> Result<String, HashError> {
        let bytes = rmp_serde::to_vec_named(key).map_err(HashError::new::<K>)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}
