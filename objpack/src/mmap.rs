//! Decoding documents from memory-mapped files.
//!
//! The body and string table are read straight from the mapping, so only
//! the decoded values are allocated.
//!
//! # Safety
//!
//! The mapping is read-only. If another process truncates or rewrites the
//! file while it is mapped, reads may observe torn data or fault.

use crate::config::CodecConfig;
use crate::document::{DocumentLayout, decode_at};
use crate::value::Value;
use memmap2::Mmap;
use objpack_core::Result;
use std::fs::File;
use std::path::Path;

/// A document file mapped into memory.
#[derive(Debug)]
pub struct MappedDocument {
    mmap: Mmap,
}

impl MappedDocument {
    /// Map the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_file(&file)
    }

    /// Map an open file.
    #[allow(unsafe_code)]
    pub fn from_file(file: &File) -> Result<Self> {
        // SAFETY: read-only mapping; the caller must not modify the file while mapped.
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap })
    }

    /// The mapped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    /// Layout of the document at the start of the file.
    pub fn layout(&self) -> Result<DocumentLayout> {
        DocumentLayout::parse(&self.mmap)
    }

    /// Decode the document at `offset` within the file.
    pub fn decode_at(&self, offset: usize, config: &CodecConfig) -> Result<Value> {
        decode_at(&self.mmap, offset, config)
    }

    /// Decode the document at the start of the file.
    pub fn decode(&self, config: &CodecConfig) -> Result<Value> {
        self.decode_at(0, config)
    }
}

/// Map `path` and decode the document it holds.
pub fn decode_file<P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<Value> {
    MappedDocument::open(path)?.decode(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_decode_mapped_file() {
        let value = Value::list([Value::from("mapped"), Value::Int(-9)]);
        let bytes = crate::encode(&value).unwrap();

        let path = std::env::temp_dir().join(format!("objpack-mmap-{}.opk", std::process::id()));
        File::create(&path).unwrap().write_all(&bytes).unwrap();

        let doc = MappedDocument::open(&path).unwrap();
        assert_eq!(doc.layout().unwrap().total_len(), bytes.len());
        assert_eq!(doc.decode(&CodecConfig::default()).unwrap(), value);
        assert_eq!(decode_file(&path, &CodecConfig::default()).unwrap(), value);

        drop(doc);
        std::fs::remove_file(&path).unwrap();
    }
}
