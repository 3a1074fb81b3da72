//! # objpack Core
//!
//! Core components for the objpack object-graph codec.
//!
//! This crate provides the byte-level building blocks the codec is made of:
//!
//! - [`bits`]: bit-length helpers
//! - [`varint`]: the adaptive, length-self-describing integer encoding
//! - [`reader`]: a bounded cursor for decoding
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Front ends                                          │
//! │     objpack CLI, stream I/O helpers                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Document framing, object graph encoder/decoder,     │
//! │     string table, records, extension hook               │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Bytes (this crate)                                  │
//! │     VarInt codec, ByteReader, bit lengths, errors       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use objpack_core::reader::ByteReader;
//! use objpack_core::varint;
//!
//! let mut out = Vec::new();
//! varint::write_u32(&mut out, 300);
//! varint::write_i64(&mut out, -42);
//!
//! let mut reader = ByteReader::new(&out);
//! assert_eq!(varint::read_u32(&mut reader).unwrap(), 300);
//! assert_eq!(varint::read_i64(&mut reader).unwrap(), -42);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bits;
pub mod error;
pub mod reader;
pub mod varint;

// Re-exports for convenience
pub use bits::{BitLength, bit_length, byte_count};
pub use error::{ObjPackError, Result};
pub use reader::ByteReader;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ObjPackError, Result};
    pub use crate::reader::ByteReader;
    pub use crate::varint;
}
