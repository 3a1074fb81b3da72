//! # objpack: Self-Describing Object Graph Codec
//!
//! This crate encodes a tree of typed values into a compact binary document
//! and decodes it back, preserving the exact variant of every node.
//!
//! ## Features
//!
//! - **Self-describing**: every value carries a one-byte type tag
//! - **Adaptive VarInts**: small integers take one byte, lengths are self-describing
//! - **String deduplication**: each distinct string is stored once in a trailing table
//! - **Records**: named component lists resolved through a [`TypeRegistry`]
//! - **Extensions**: caller-defined tags 100-254 through an [`ExtensionHook`]
//!
//! ## Document Layout
//!
//! ```text
//! [table offset: u32 LE] [body: one tagged value] [string table]
//! ```
//!
//! The table offset is the length of header plus body. The string table is a
//! VarInt count followed by length-prefixed UTF-8 entries, indexed by the
//! sequence numbers written in the body.
//!
//! ## Example
//!
//! ```rust
//! use objpack::{Value, decode, encode};
//!
//! let value = Value::map([
//!     ("name", Value::from("objpack")),
//!     ("sizes", Value::IntArray(vec![1, 64, 65536])),
//!     ("alias", Value::from("objpack")),
//! ]);
//!
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```
//!
//! ## Extension Types
//!
//! ```rust
//! use objpack::{CodecConfig, ExtensionHook, ExtensionValue, ObjectDecoder, ObjectEncoder, Result, Value};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! struct PointHook;
//!
//! impl ExtensionHook for PointHook {
//!     fn try_encode(&self, enc: &mut ObjectEncoder<'_>, value: &Value) -> Result<bool> {
//!         match value.as_extension::<Point>() {
//!             Some(p) => {
//!                 enc.write_tag(100);
//!                 enc.write_i32(p.x);
//!                 enc.write_i32(p.y);
//!                 Ok(true)
//!             }
//!             None => Ok(false),
//!         }
//!     }
//!
//!     fn try_decode(&self, dec: &mut ObjectDecoder<'_>, tag: u8) -> Result<Option<Value>> {
//!         if tag != 100 {
//!             return Ok(None);
//!         }
//!         let p = Point { x: dec.read_i32()?, y: dec.read_i32()? };
//!         Ok(Some(Value::Extension(ExtensionValue::new(100, p))))
//!     }
//! }
//!
//! let config = CodecConfig::new().with_hook(PointHook);
//! let value = Value::Extension(ExtensionValue::new(100, Point { x: 3, y: -4 }));
//! let bytes = objpack::encode_with(&value, &config).unwrap();
//! assert_eq!(objpack::decode_with(&bytes, &config).unwrap(), value);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
mod decoder;
pub mod document;
mod encoder;
mod extension;
pub mod io;
mod number;
mod record;
mod strings;
pub mod tag;
mod value;

#[cfg(feature = "async-io")]
pub mod async_io;

#[cfg(feature = "mmap")]
pub mod mmap;

pub use config::CodecConfig;
pub use decoder::ObjectDecoder;
pub use document::{DocumentLayout, decode, decode_at, decode_with, encode, encode_with};
pub use encoder::ObjectEncoder;
pub use extension::{ExtensionHook, ExtensionValue, FallbackSerializer, Payload};
pub use number::{BigDecimal, BigInteger};
pub use objpack_core::{ObjPackError, Result};
pub use record::{DynamicRecord, Record, RecordFactory, RecordType, TypeRegistry};
pub use strings::{StringTable, StringTableBuilder};
pub use tag::{EXTENSION_TAG_MIN, TypeTag};
pub use value::{DateKind, DateValue, Value};
