//! String interning and the trailing string table.
//!
//! Every string in a document (string values, record type names, big-number
//! text, date type names) is stored once. The body refers to it by sequence
//! number, assigned in order of first occurrence.
//!
//! Table layout:
//!
//! ```text
//! [count: VarInt32] ([len: VarInt32] [UTF-8 bytes])*
//! ```

use objpack_core::{ByteReader, ObjPackError, Result, varint};
use std::collections::HashMap;

/// Encode-side interning map.
#[derive(Debug, Default)]
pub struct StringTableBuilder {
    ids: HashMap<String, u32>,
}

impl StringTableBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number of `s`, assigning the next one if unseen.
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.ids.get(s) {
            return id;
        }
        let id = self.ids.len() as u32;
        self.ids.insert(s.to_owned(), id);
        id
    }

    /// Number of distinct strings.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no string has been interned.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Append the table to `out`, entries ordered by sequence number.
    ///
    /// Fails with `CorruptStringTable` unless the sequence numbers are
    /// exactly `0..len`.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        let len = self.ids.len();
        let mut slots: Vec<Option<&str>> = vec![None; len];
        for (s, &id) in &self.ids {
            let slot = slots
                .get_mut(id as usize)
                .ok_or_else(|| ObjPackError::corrupt_string_table(format!("sequence number {id} out of range")))?;
            if slot.replace(s.as_str()).is_some() {
                return Err(ObjPackError::corrupt_string_table(format!(
                    "sequence number {id} assigned twice"
                )));
            }
        }

        varint::write_u32(out, u32::try_from(len).map_err(|_| ObjPackError::LengthOverflow { len })?);
        for (id, slot) in slots.into_iter().enumerate() {
            let s = slot.ok_or_else(|| {
                ObjPackError::corrupt_string_table(format!("sequence number {id} missing"))
            })?;
            let byte_len = s.len();
            let byte_len = u32::try_from(byte_len)
                .map_err(|_| ObjPackError::LengthOverflow { len: byte_len })?;
            varint::write_u32(out, byte_len);
            out.extend_from_slice(s.as_bytes());
        }
        Ok(())
    }
}

/// Decode-side string table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: Vec<String>,
}

impl StringTable {
    /// Build a table from entries in sequence order.
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Parse a table at the reader's position.
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let count = varint::read_u32(reader)? as usize;
        // Each entry needs at least one byte, so the count cannot exceed what is left.
        let mut entries = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            let len = varint::read_u32(reader)? as usize;
            let offset = reader.position();
            let bytes = reader.read_bytes(len)?;
            let s = std::str::from_utf8(bytes).map_err(|_| ObjPackError::InvalidUtf8 { offset })?;
            entries.push(s.to_owned());
        }
        Ok(Self { entries })
    }

    /// Resolve a sequence number.
    pub fn resolve(&self, index: u32) -> Result<&str> {
        self.entries
            .get(index as usize)
            .map(String::as_str)
            .ok_or_else(|| ObjPackError::unknown_string(index, self.entries.len()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
