//! # metajournal codec
//!
//! Encoding primitives for metajournal frames.
//!
//! - [`varint`]: unsigned LEB128 integers used as frame length prefixes
//! - [`cbor`]: strict single-item CBOR encoding for record schemas
//! - [`Encode`]/[`Decode`]: the seam a record type implements so the
//!   framing layer can treat it as an opaque byte block
//!
//! ## Usage
//!
//! ```
//! use metajournal_codec::varint::{decode_varint, encode_varint};
//!
//! let mut buf = Vec::new();
//! encode_varint(300, &mut buf);
//! assert_eq!(buf, [0xAC, 0x02]);
//! assert_eq!(decode_varint(&buf).unwrap(), (300, 2));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cbor;
mod error;
pub mod varint;

pub use cbor::{from_cbor, to_cbor};
pub use error::{CodecError, CodecResult};
pub use varint::{decode_varint, encode_varint, VarintDecoder, MAX_VARINT_LEN};

/// Trait for types that can be encoded to bytes.
pub trait Encode {
    /// Encode this value to bytes.
    fn encode(&self) -> CodecResult<Vec<u8>>;
}

/// Trait for types that can be decoded from bytes.
pub trait Decode: Sized {
    /// Decode this value from bytes.
    ///
    /// Implementations must consume all of `bytes`.
    fn decode(bytes: &[u8]) -> CodecResult<Self>;
}
