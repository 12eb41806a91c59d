//! CBOR helpers over `serde` and `ciborium`.
//!
//! Record schemas derive `Serialize`/`Deserialize` and go through
//! [`to_cbor`]/[`from_cbor`]. Decoding is strict about framing: the input
//! must hold exactly one CBOR item.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes `value` as a single CBOR item.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if serialization fails.
pub fn to_cbor<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf)
        .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    Ok(buf)
}

/// Decodes exactly one CBOR item from `bytes`.
///
/// # Errors
///
/// - [`CodecError::DecodingFailed`] if the bytes are not a valid `T`
/// - [`CodecError::TrailingBytes`] if input remains after the item
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    let mut remaining = bytes;
    let value = ciborium::de::from_reader(&mut remaining)
        .map_err(|e| CodecError::decoding_failed(e.to_string()))?;
    if !remaining.is_empty() {
        return Err(CodecError::TrailingBytes {
            remaining: remaining.len(),
        });
    }
    Ok(value)
}

/// Serde adapter that stores a `Vec<u8>` as a CBOR byte string.
///
/// Without it serde treats `Vec<u8>` as a sequence of integers.
///
/// ```
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Blob {
///     #[serde(with = "metajournal_codec::cbor::bytes")]
///     data: Vec<u8>,
/// }
/// ```
pub mod bytes {
    use serde::de::{Deserializer, SeqAccess, Visitor};
    use serde::Serializer;
    use std::fmt;

    /// Serializes `value` as a byte string.
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(value)
    }

    /// Deserializes a byte string, also accepting a sequence of `u8`.
    ///
    /// # Errors
    ///
    /// Propagates the deserializer's error.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        deserializer.deserialize_byte_buf(ByteBufVisitor)
    }

    struct ByteBufVisitor;

    impl<'de> Visitor<'de> for ByteBufVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a byte string")
        }

        fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
            Ok(v.to_vec())
        }

        fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
            while let Some(byte) = seq.next_element::<u8>()? {
                out.push(byte);
            }
            Ok(out)
        }
    }
}
