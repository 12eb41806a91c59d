//! The record seam between the framing layer and a journal schema.

use crate::types::SequenceNumber;
use metajournal_codec::{Decode, Encode};

/// A record the framing layer can write and read back.
///
/// The framing layer treats the encoded form as an opaque byte block. The
/// only thing it looks at is the sequence number, to report the last
/// record a reader decoded.
///
/// [`Decode::decode`] must fail on bytes that are not a complete record;
/// readers rely on that to detect a garbled final frame.
pub trait JournalRecord: Encode + Decode {
    /// Sequence number assigned by the journal writer.
    fn sequence_number(&self) -> SequenceNumber;
}
