//! # metajournal testkit
//!
//! Test utilities for metajournal.
//!
//! This crate provides:
//! - A crash-simulating storage backend ([`crash`])
//! - Journal fixtures and read-back helpers ([`fixtures`])
//! - Property-based test generators using proptest ([`generators`])
//!
//! The cross-crate integration tests live in this crate's `tests/`
//! directory.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crash;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::crash::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}
