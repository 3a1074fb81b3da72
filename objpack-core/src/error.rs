//! Error types for objpack operations.
//!
//! A single error enum covers every failure the codec can report, from
//! short input during VarInt decoding to unresolvable record types. All
//! errors are fatal to the current encode/decode call; nothing is retried
//! and no partial result is returned.

use std::io;
use thiserror::Error;

/// The main error type for objpack operations.
#[derive(Debug, Error)]
pub enum ObjPackError {
    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes available than a length field promises, or the cursor
    /// would move past its declared bound.
    #[error("Truncated input at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedInput {
        /// Cursor position where the read was attempted.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left before the bound.
        available: usize,
    },

    /// A tag byte that is neither built in nor claimed by an extension hook.
    #[error("Unknown type tag {tag} at offset {offset}")]
    UnknownTypeTag {
        /// The tag byte.
        tag: u8,
        /// Offset of the tag byte.
        offset: usize,
    },

    /// A string sequence number outside the resolved string table.
    #[error("Unknown string reference {index} (string table has {table_len} entries)")]
    UnknownStringReference {
        /// The sequence number read from the body.
        index: u32,
        /// Number of entries in the string table.
        table_len: usize,
    },

    /// The encoder-side string map does not form a contiguous sequence.
    #[error("Corrupt string table: {message}")]
    CorruptStringTable {
        /// Description of the inconsistency.
        message: String,
    },

    /// A record type name that is not registered.
    #[error("Unknown record type: {name}")]
    UnknownType {
        /// The type name carried in the stream.
        name: String,
    },

    /// A string table entry is not valid UTF-8.
    #[error("Invalid UTF-8 in string table entry at offset {offset}")]
    InvalidUtf8 {
        /// Offset of the entry's first byte.
        offset: usize,
    },

    /// Text carried by a big-number value is not a valid number.
    #[error("Invalid number text: {text:?}")]
    InvalidNumber {
        /// The offending text.
        text: String,
    },

    /// Unknown date sub-kind byte.
    #[error("Invalid date kind: {kind}")]
    InvalidDateKind {
        /// The sub-kind byte.
        kind: u8,
    },

    /// A record factory rejected the decoded fields.
    #[error("Invalid record {type_name}: {message}")]
    InvalidRecord {
        /// The record type name.
        type_name: String,
        /// Description of the problem.
        message: String,
    },

    /// A sequence is too long for a 32-bit length prefix.
    #[error("Length {len} exceeds the 32-bit length prefix")]
    LengthOverflow {
        /// The offending length.
        len: usize,
    },

    /// Value nesting exceeded the configured depth limit.
    #[error("Nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// An extension hook or fallback serializer reported a failure.
    #[error("Extension error (tag {tag}): {message}")]
    Extension {
        /// Tag the extension was handling.
        tag: u8,
        /// Description of the failure.
        message: String,
    },
}

/// Result type alias for objpack operations.
pub type Result<T> = std::result::Result<T, ObjPackError>;

impl ObjPackError {
    /// Create a truncated input error.
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::TruncatedInput {
            offset,
            needed,
            available,
        }
    }

    /// Create an unknown type tag error.
    pub fn unknown_tag(tag: u8, offset: usize) -> Self {
        Self::UnknownTypeTag { tag, offset }
    }

    /// Create an unknown string reference error.
    pub fn unknown_string(index: u32, table_len: usize) -> Self {
        Self::UnknownStringReference { index, table_len }
    }

    /// Create a corrupt string table error.
    pub fn corrupt_string_table(message: impl Into<String>) -> Self {
        Self::CorruptStringTable {
            message: message.into(),
        }
    }

    /// Create an unknown record type error.
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    /// Create an invalid number error.
    pub fn invalid_number(text: impl Into<String>) -> Self {
        Self::InvalidNumber { text: text.into() }
    }

    /// Create an invalid record error.
    pub fn invalid_record(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create an extension error.
    pub fn extension(tag: u8, message: impl Into<String>) -> Self {
        Self::Extension {
            tag,
            message: message.into(),
        }
    }

    /// Whether this error means the input ended early.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}
