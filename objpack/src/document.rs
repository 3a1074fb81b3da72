//! Document framing.
//!
//! ```text
//! ┌──────────────┬──────────────────────┬────────────────────┐
//! │ table offset │ body                 │ string table       │
//! │ u32 LE       │ one tagged value     │ count, (len, utf8)*│
//! └──────────────┴──────────────────────┴────────────────────┘
//!  0             4                      table offset
//! ```
//!
//! The table offset counts from the first byte of the document, so a
//! document can be decoded in place inside a larger buffer with
//! [`decode_at`].

use crate::config::CodecConfig;
use crate::decoder::ObjectDecoder;
use crate::encoder::ObjectEncoder;
use crate::strings::StringTable;
use crate::value::Value;
use objpack_core::{ByteReader, ObjPackError, Result};
use tracing::{debug, trace};

/// Size of the table offset header.
pub const HEADER_LEN: usize = 4;

/// Smallest valid table offset (header plus a one-byte body).
pub const MIN_TABLE_OFFSET: usize = HEADER_LEN + 1;

/// Encode `value` with the default configuration.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    encode_with(value, &CodecConfig::default())
}

/// Encode `value` into a self-contained document.
pub fn encode_with(value: &Value, config: &CodecConfig) -> Result<Vec<u8>> {
    let mut encoder = ObjectEncoder::with_buffer(config, vec![0u8; HEADER_LEN]);
    encoder.encode_value(value)?;
    let (mut out, strings) = encoder.into_parts();

    let table_offset = out.len();
    let header = u32::try_from(table_offset)
        .map_err(|_| ObjPackError::LengthOverflow { len: table_offset })?;
    strings.write_to(&mut out)?;
    out[..HEADER_LEN].copy_from_slice(&header.to_le_bytes());

    trace!(
        body_len = table_offset - HEADER_LEN,
        strings = strings.len(),
        total_len = out.len(),
        "encoded document"
    );
    Ok(out)
}

/// Decode a document with the default configuration.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    decode_with(bytes, &CodecConfig::default())
}

/// Decode a document starting at the first byte of `bytes`.
pub fn decode_with(bytes: &[u8], config: &CodecConfig) -> Result<Value> {
    decode_at(bytes, 0, config)
}

/// Decode a document embedded at `offset` in a larger buffer.
///
/// The stored table offset is relative to `offset`. Bytes after the string
/// table are ignored.
pub fn decode_at(bytes: &[u8], offset: usize, config: &CodecConfig) -> Result<Value> {
    let doc = bytes
        .get(offset..)
        .ok_or_else(|| ObjPackError::truncated(0, offset, bytes.len()))?;
    let (layout, strings) = read_frame(doc)?;

    let body = ByteReader::at(&doc[..layout.table_offset], HEADER_LEN)?;
    let mut decoder = ObjectDecoder::new(config, &strings, body);
    let value = decoder.decode_value()?;

    if decoder.remaining() > 0 {
        debug!(
            unread = decoder.remaining(),
            "document body has bytes after the root value"
        );
    }
    trace!(
        offset,
        body_len = layout.body_len(),
        strings = layout.string_count,
        "decoded document"
    );
    Ok(value)
}

/// Where the parts of a document sit, without decoding the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLayout {
    /// Offset of the string table (also the end of the body).
    pub table_offset: usize,
    /// Offset one past the end of the string table.
    pub table_end: usize,
    /// Number of string table entries.
    pub string_count: usize,
}

impl DocumentLayout {
    /// Read the header and string table of the document at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        read_frame(bytes).map(|(layout, _)| layout)
    }

    /// Length of the body (root value) in bytes.
    pub fn body_len(&self) -> usize {
        self.table_offset - HEADER_LEN
    }

    /// Length of the string table in bytes.
    pub fn table_len(&self) -> usize {
        self.table_end - self.table_offset
    }

    /// Length of the whole document.
    pub fn total_len(&self) -> usize {
        self.table_end
    }
}

/// Parse the header and string table of a document.
pub(crate) fn read_frame(doc: &[u8]) -> Result<(DocumentLayout, StringTable)> {
    let mut header = ByteReader::new(doc);
    let table_offset = header.read_u32_le()? as usize;

    if table_offset < MIN_TABLE_OFFSET {
        return Err(ObjPackError::truncated(
            HEADER_LEN,
            MIN_TABLE_OFFSET - HEADER_LEN,
            table_offset.saturating_sub(HEADER_LEN),
        ));
    }
    if table_offset > doc.len() {
        return Err(ObjPackError::truncated(
            doc.len(),
            table_offset - doc.len(),
            0,
        ));
    }

    let mut table = ByteReader::at(doc, table_offset)?;
    let strings = StringTable::parse(&mut table)?;
    let layout = DocumentLayout {
        table_offset,
        table_end: table.position(),
        string_count: strings.len(),
    };
    Ok((layout, strings))
}

/// Parse the string table of a document, for inspection tools.
pub fn read_string_table(bytes: &[u8]) -> Result<StringTable> {
    read_frame(bytes).map(|(_, strings)| strings)
}
