//! Reading and writing documents over `std::io` streams.
//!
//! [`read_document`] consumes exactly one document from the reader, so
//! several documents can be written back to back on one stream.

use crate::config::CodecConfig;
use crate::document::{HEADER_LEN, MIN_TABLE_OFFSET, decode_with, encode_with};
use crate::value::Value;
use objpack_core::{ByteReader, ObjPackError, Result, varint};
use std::io::{Read, Write};

/// Encode `value` and write it to `writer`. Returns the number of bytes
/// written.
pub fn write_document<W: Write>(writer: &mut W, value: &Value, config: &CodecConfig) -> Result<usize> {
    let bytes = encode_with(value, config)?;
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Read one document from `reader` and decode it.
pub fn read_document<R: Read>(reader: &mut R, config: &CodecConfig) -> Result<Value> {
    let bytes = read_document_bytes(reader)?;
    decode_with(&bytes, config)
}

/// Read the raw bytes of one document without decoding the body.
pub fn read_document_bytes<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; HEADER_LEN];
    reader.read_exact(&mut buf)?;
    let table_offset = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if table_offset < MIN_TABLE_OFFSET {
        return Err(ObjPackError::truncated(HEADER_LEN, MIN_TABLE_OFFSET - HEADER_LEN, 0));
    }

    read_extend(reader, &mut buf, table_offset - HEADER_LEN)?;

    let count = read_varint32(reader, &mut buf)?;
    for _ in 0..count {
        let len = read_varint32(reader, &mut buf)? as usize;
        read_extend(reader, &mut buf, len)?;
    }
    Ok(buf)
}

/// Append exactly `n` bytes from `reader` to `buf`.
fn read_extend<R: Read>(reader: &mut R, buf: &mut Vec<u8>, n: usize) -> Result<()> {
    let got = reader.by_ref().take(n as u64).read_to_end(buf)?;
    if got < n {
        return Err(ObjPackError::truncated(buf.len(), n - got, 0));
    }
    Ok(())
}

/// Read one 32-bit form VarInt, appending its raw bytes to `buf`.
fn read_varint32<R: Read>(reader: &mut R, buf: &mut Vec<u8>) -> Result<u32> {
    let start = buf.len();
    read_extend(reader, buf, 1)?;
    let len = varint::len_from_first_u32(buf[start]);
    read_extend(reader, buf, len - 1)?;

    let mut cursor = ByteReader::at(buf, start)?;
    varint::read_u32(&mut cursor)
}
