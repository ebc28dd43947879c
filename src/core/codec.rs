//! Payload codecs.
//!
//! A [`Codec`] turns a native value into an opaque byte payload and back.
//! The invoker never looks inside a payload; it only hands it to the codec
//! together with the type the handler declared for that argument slot.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error produced by a codec while encoding or decoding a payload.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    pub fn custom(msg: impl Into<String>) -> Self {
        CodecError::Custom(msg.into())
    }
}

/// Converts values to and from byte payloads.
///
/// Implementations must round trip: decoding the payload produced for a value
/// yields an equal value of the same type.
pub trait Codec: Send + Sync + 'static {
    /// Serializes `value` to bytes.
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Deserializes an owned `T` from bytes.
    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;
}

/// The default codec, backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    #[inline]
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    #[inline]
    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Delta {
        delta: i64,
    }

    #[test]
    fn test_json_struct_uses_field_names() {
        let encoded = JsonCodec.marshal(&Delta { delta: 8 }).unwrap();
        assert_eq!(encoded, br#"{"delta":8}"#);

        let decoded: Delta = JsonCodec.unmarshal(&encoded).unwrap();
        assert_eq!(decoded, Delta { delta: 8 });
    }

    #[test]
    fn test_json_decodes_bare_literals() {
        let n: i64 = JsonCodec.unmarshal(b"2").unwrap();
        assert_eq!(n, 2);

        let s: String = JsonCodec.unmarshal(br#""this is a string""#).unwrap();
        assert_eq!(s, "this is a string");
    }

    #[test]
    fn test_json_type_mismatch_is_an_error() {
        let result: Result<i64, CodecError> = JsonCodec.unmarshal(br#""asd""#);
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[test]
    fn test_json_unsized_values() {
        let encoded = JsonCodec.marshal("hello").unwrap();
        assert_eq!(encoded, br#""hello""#);

        let encoded = JsonCodec.marshal(&[1, 2, 3][..]).unwrap();
        assert_eq!(encoded, b"[1,2,3]");
    }
}
