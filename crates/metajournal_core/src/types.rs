//! Core type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a record in the journal's logical write order.
///
/// Assigned by the journal writer before framing. Zero doubles as the
/// "nothing read yet" value of a reader.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    /// Value reported before any record has been decoded.
    pub const UNSET: Self = Self(0);

    /// Creates a new sequence number.
    #[must_use]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Returns the raw sequence value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next sequence number, saturating at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns `true` for [`SequenceNumber::UNSET`].
    #[must_use]
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_number_next() {
        let s1 = SequenceNumber::new(5);
        assert_eq!(s1.next().as_u64(), 6);
        assert!(s1 < s1.next());
    }

    #[test]
    fn next_saturates_at_max() {
        let last = SequenceNumber::new(u64::MAX);
        assert_eq!(last.next(), last);
    }

    #[test]
    fn unset_is_default() {
        assert_eq!(SequenceNumber::default(), SequenceNumber::UNSET);
        assert!(SequenceNumber::UNSET.is_unset());
        assert!(!SequenceNumber::new(1).is_unset());
    }

    #[test]
    fn sequence_number_display() {
        assert_eq!(format!("{}", SequenceNumber::new(42)), "seq:42");
    }
}
