//! Marshaler Module
//!
//! Converts typed values to and from their stored byte representation.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::error::BoxError;

// == Marshaler Trait ==
/// Encodes values to bytes and decodes them back.
///
/// For every supported value `v`, `unmarshal(&marshal(&v)?)?` equals `v`.
pub trait Marshaler<V>: Send + Sync {
    /// Returns the binary encoding of `value`.
    fn marshal(&self, value: &V) -> Result<Vec<u8>, MarshalError>;

    /// Decodes `bytes` into a value.
    fn unmarshal(&self, bytes: &[u8]) -> Result<V, UnmarshalError>;
}

// == Errors ==
/// Error raised when a value cannot be serialized.
#[derive(Error, Debug)]
#[error("cannot serialize object of type {type_name}: {source}")]
pub struct MarshalError {
    /// Name of the value type that failed
    pub type_name: &'static str,
    /// Underlying cause
    #[source]
    pub source: BoxError,
}

impl MarshalError {
    /// Creates an error for value type `V`.
    pub fn new<V: ?Sized>(source: impl Into<BoxError>) -> Self {
        Self {
            type_name: std::any::type_name::<V>(),
            source: source.into(),
        }
    }
}

/// Error raised when bytes cannot be decoded into the target type.
#[derive(Error, Debug)]
#[error("cannot deserialize object of type {type_name}: {source}")]
pub struct UnmarshalError {
    /// Name of the target type
    pub type_name: &'static str,
    /// Underlying cause
    #[source]
    pub source: BoxError,
}

impl UnmarshalError {
    /// Creates an error for target type `V`.
    pub fn new<V: ?Sized>(source: impl Into<BoxError>) -> Self {
        Self {
            type_name: std::any::type_name::<V>(),
            source: source.into(),
        }
    }
}

// == Msgpack Marshaler ==
/// Default marshaler using MessagePack with named record fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgpackMarshaler;

impl<V> Marshaler<V> for MsgpackMarshaler
where
    V: Serialize + DeserializeOwned,
{
    fn marshal(&self, value: &V) -> Result<Vec<u8>, MarshalError> {
        rmp_serde::to_vec_named(value).map_err(MarshalError::new::<V>)
    }

    fn unmarshal(&self, bytes: &[u8]) -> Result<V, UnmarshalError> {
        rmp_serde::from_slice(bytes).map_err(UnmarshalError::new::<V>)
    }
}

// == JSON Marshaler ==
/// Marshaler storing values as JSON text.
///
/// Larger than MessagePack but readable when inspecting a backend directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshaler;

impl<V> Marshaler<V> for JsonMarshaler
where
    V: Serialize + DeserializeOwned,
{
    fn marshal(&self, value: &V) -> Result<Vec<u8>, MarshalError> {
        serde_json::to_vec(value).map_err(MarshalError::new::<V>)
    }

    fn unmarshal(&self, bytes: &[u8]) -> Result<V, UnmarshalError> {
        serde_json::from_slice(bytes).map_err(UnmarshalError::new::<V>)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde::{
        ser::{Error as _, Serializer},
        Deserialize, Deserializer,
    };
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Address {
        city: String,
        zip: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        id: u64,
        name: String,
        tags: Vec<String>,
        address: Address,
        scores: BTreeMap<String, i32>,
    }

    #[derive(Debug)]
    struct Complex;

    impl Serialize for Complex {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("unsupported complex128"))
        }
    }

    impl<'de> Deserialize<'de> for Complex {
        fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
            Ok(Complex)
        }
    }

    fn roundtrip<V, M>(m: &M, value: V)
    where
        V: std::fmt::Debug + PartialEq,
        M: Marshaler<V>,
    {
        let bytes = m.marshal(&value).unwrap();
        assert_eq!(m.unmarshal(&bytes).unwrap(), value);
    }

    fn sample_user() -> User {
        User {
            id: 42,
            name: "John".to_string(),
            tags: vec!["admin".to_string(), "ops".to_string()],
            address: Address {
                city: "Paris".to_string(),
                zip: None,
            },
            scores: BTreeMap::from([("a".to_string(), 1), ("b".to_string(), -2)]),
        }
    }

    #[test]
    fn test_msgpack_roundtrip_supported_types() {
        let m = MsgpackMarshaler;
        roundtrip(&m, i64::MIN);
        roundtrip(&m, u64::MAX);
        roundtrip(&m, "some value".to_string());
        roundtrip(&m, vec![0u8, 1, 255]);
        roundtrip(&m, vec![1i32, 2, 3]);
        roundtrip(&m, BTreeMap::from([(1u8, "one".to_string())]));
        roundtrip(&m, sample_user());
        roundtrip(&m, None::<String>);
        roundtrip(&m, Vec::<u32>::new());
        roundtrip(&m, BTreeMap::<String, String>::new());
    }

    #[test]
    fn test_json_roundtrip_supported_types() {
        let m = JsonMarshaler;
        roundtrip(&m, 1000i64);
        roundtrip(&m, "some value".to_string());
        roundtrip(&m, sample_user());
        roundtrip(&m, None::<u8>);
    }

    #[test]
    fn test_empty_values_have_an_encoding() {
        let m = MsgpackMarshaler;
        assert_eq!(Marshaler::<Option<u8>>::marshal(&m, &None).unwrap(), vec![0xc0]);
        assert_eq!(Marshaler::<Vec<u8>>::marshal(&m, &Vec::new()).unwrap(), vec![0x90]);
        assert!(!Marshaler::<String>::marshal(&m, &String::new()).unwrap().is_empty());
    }

    #[test]
    fn test_marshal_unsupported_type() {
        let err = MsgpackMarshaler.marshal(&Complex).unwrap_err();
        assert!(err.type_name.ends_with("Complex"));
        assert!(err.source.to_string().contains("unsupported complex128"));
        assert!(err.to_string().starts_with("cannot serialize object of type "));

        let err = JsonMarshaler.marshal(&Complex).unwrap_err();
        assert!(err.source.to_string().contains("unsupported complex128"));
    }

    #[test]
    fn test_unmarshal_malformed_bytes() {
        let m = MsgpackMarshaler;
        let err = Marshaler::<User>::unmarshal(&m, &[0xc1]).unwrap_err();
        assert!(err.type_name.ends_with("User"));
        assert!(err.to_string().starts_with("cannot deserialize object of type "));
    }

    #[test]
    fn test_unmarshal_into_incompatible_type() {
        let m = MsgpackMarshaler;
        let bytes = m.marshal(&"not a number".to_string()).unwrap();
        let err = Marshaler::<u64>::unmarshal(&m, &bytes).unwrap_err();
        assert_eq!(err.type_name, "u64");
    }
}
