//! # metajournal storage
//!
//! Byte stores that hold journal files, and the `std::io` adapters the
//! framing layer reads and writes through.
//!
//! Backends are **opaque byte stores**: they never interpret frames.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and in-memory replay
//! - [`FileBackend`] - A journal file on disk
//!
//! ## Example
//!
//! ```rust
//! use metajournal_storage::{BackendReader, BackendWriter, InMemoryBackend};
//! use std::io::{Read, Write};
//!
//! let mut backend = InMemoryBackend::new();
//! BackendWriter::new(&mut backend).write_all(b"frames").unwrap();
//!
//! let mut out = Vec::new();
//! BackendReader::new(&backend, 0).read_to_end(&mut out).unwrap();
//! assert_eq!(out, b"frames");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;
mod stream;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
pub use stream::{BackendReader, BackendWriter, READ_CHUNK_SIZE};
