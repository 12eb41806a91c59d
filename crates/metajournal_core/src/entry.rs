//! Reference journal record.

use crate::record::JournalRecord;
use crate::types::SequenceNumber;
use metajournal_codec::{from_cbor, to_cbor, CodecResult, Decode, Encode};
use serde::{Deserialize, Serialize};

/// A journal entry with a sequence number and an opaque payload.
///
/// Encoded as a CBOR map. Decoding rejects unknown or missing fields and
/// trailing bytes, so a frame whose payload was cut or overwritten fails
/// to decode instead of yielding a bogus entry.
///
/// # Example
///
/// ```
/// use metajournal_codec::{Decode, Encode};
/// use metajournal_core::{JournalEntry, SequenceNumber};
///
/// let entry = JournalEntry::new(SequenceNumber::new(7), b"rename /a /b".to_vec());
/// let bytes = entry.encode().unwrap();
/// assert_eq!(JournalEntry::decode(&bytes).unwrap(), entry);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JournalEntry {
    sequence_number: SequenceNumber,
    #[serde(with = "metajournal_codec::cbor::bytes")]
    payload: Vec<u8>,
}

impl JournalEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(sequence_number: SequenceNumber, payload: Vec<u8>) -> Self {
        Self {
            sequence_number,
            payload,
        }
    }

    /// Returns the payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consumes the entry and returns its payload.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl Encode for JournalEntry {
    fn encode(&self) -> CodecResult<Vec<u8>> {
        to_cbor(self)
    }
}

impl Decode for JournalEntry {
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_cbor(bytes)
    }
}

impl JournalRecord for JournalEntry {
    fn sequence_number(&self) -> SequenceNumber {
        self.sequence_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metajournal_codec::CodecError;

    #[test]
    fn roundtrip_entry() {
        let entry = JournalEntry::new(SequenceNumber::new(12), vec![0xCA, 0xFE]);
        let decoded = JournalEntry::decode(&entry.encode().unwrap()).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(decoded.sequence_number(), SequenceNumber::new(12));
    }

    #[test]
    fn empty_payload() {
        let entry = JournalEntry::new(SequenceNumber::new(1), Vec::new());
        let decoded = JournalEntry::decode(&entry.encode().unwrap()).unwrap();
        assert!(decoded.payload().is_empty());
    }

    #[test]
    fn cut_entry_fails_to_decode() {
        let bytes = JournalEntry::new(SequenceNumber::new(3), vec![1; 32])
            .encode()
            .unwrap();
        for cut in 0..bytes.len() {
            assert!(
                JournalEntry::decode(&bytes[..cut]).is_err(),
                "prefix of {cut} bytes decoded"
            );
        }
    }

    #[test]
    fn zeroed_entry_fails_to_decode() {
        let len = JournalEntry::new(SequenceNumber::new(3), vec![1; 32])
            .encode()
            .unwrap()
            .len();
        assert!(JournalEntry::decode(&vec![0u8; len]).is_err());
    }

    #[test]
    fn trailing_bytes_fail_to_decode() {
        let mut bytes = JournalEntry::new(SequenceNumber::new(3), vec![1])
            .encode()
            .unwrap();
        bytes.push(0);
        assert_eq!(
            JournalEntry::decode(&bytes),
            Err(CodecError::TrailingBytes { remaining: 1 })
        );
    }

    #[test]
    fn unknown_field_fails_to_decode() {
        #[derive(Serialize)]
        struct Extended {
            sequence_number: u64,
            #[serde(with = "metajournal_codec::cbor::bytes")]
            payload: Vec<u8>,
            extra: u8,
        }

        let bytes = to_cbor(&Extended {
            sequence_number: 1,
            payload: vec![],
            extra: 0,
        })
        .unwrap();
        assert!(JournalEntry::decode(&bytes).is_err());
    }
}
