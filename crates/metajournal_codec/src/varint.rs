//! Unsigned LEB128 varints.
//!
//! Each byte carries seven value bits, least significant group first. The
//! high bit is set on every byte except the last. A `u64` needs at most
//! [`MAX_VARINT_LEN`] bytes.

use crate::error::{CodecError, CodecResult};

/// Maximum encoded length of a `u64` varint.
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const VALUE_MASK: u8 = 0x7F;

/// Appends the varint encoding of `value` to `buf`.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & u64::from(VALUE_MASK)) as u8;
        value >>= 7;
        if value != 0 {
            byte |= CONTINUATION;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Returns the number of bytes [`encode_varint`] emits for `value`.
#[must_use]
pub const fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        (bits + 6) / 7
    }
}

/// Decodes a varint from the front of `data`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
///
/// - [`CodecError::UnexpectedEof`] if `data` ends before the final byte
/// - [`CodecError::MalformedVarint`] if the encoding overflows a `u64`
pub fn decode_varint(data: &[u8]) -> CodecResult<(u64, usize)> {
    let mut decoder = VarintDecoder::new();
    for &byte in data {
        if let Some(value) = decoder.push(byte)? {
            return Ok((value, decoder.bytes_consumed()));
        }
    }
    Err(CodecError::UnexpectedEof)
}

/// Incremental varint decoder fed one byte at a time.
///
/// Used when the bytes come from a stream and the caller needs to know how
/// many bytes were consumed before the input ran out.
#[derive(Debug, Default, Clone, Copy)]
pub struct VarintDecoder {
    value: u64,
    consumed: usize,
}

impl VarintDecoder {
    /// Creates a decoder with no bytes consumed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: 0,
            consumed: 0,
        }
    }

    /// Feeds the next byte.
    ///
    /// Returns `Ok(Some(value))` when `byte` terminates the varint and
    /// `Ok(None)` when more bytes are needed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedVarint`] if the varint is longer than
    /// [`MAX_VARINT_LEN`] bytes or its value does not fit in a `u64`.
    pub fn push(&mut self, byte: u8) -> CodecResult<Option<u64>> {
        if self.consumed >= MAX_VARINT_LEN {
            return Err(CodecError::malformed_varint(format!(
                "longer than {MAX_VARINT_LEN} bytes"
            )));
        }

        let shift = 7 * self.consumed;
        let group = u64::from(byte & VALUE_MASK);
        // The tenth byte only has room for the top bit of a u64.
        if self.consumed == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(CodecError::malformed_varint("value overflows u64"));
        }

        self.value |= group << shift;
        self.consumed += 1;

        if byte & CONTINUATION == 0 {
            Ok(Some(self.value))
        } else {
            Ok(None)
        }
    }

    /// Number of bytes fed so far.
    #[must_use]
    pub const fn bytes_consumed(&self) -> usize {
        self.consumed
    }

    /// Returns `true` if no byte has been fed yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.consumed == 0
    }
}
