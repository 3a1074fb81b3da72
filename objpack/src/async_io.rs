//! Async document I/O over Tokio streams.
//!
//! Encoding and decoding stay synchronous; only the byte transfer is async.
//! Enable with the `async-io` feature:
//!
//! ```toml
//! [dependencies]
//! objpack = { version = "0.1.0", features = ["async-io"] }
//! ```

use crate::config::CodecConfig;
use crate::document::{HEADER_LEN, MIN_TABLE_OFFSET, decode_with, encode_with};
use crate::value::Value;
use objpack_core::{ByteReader, ObjPackError, Result, varint};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Encode `value` and write it to `writer`. Returns the number of bytes
/// written.
pub async fn write_document_async<W>(writer: &mut W, value: &Value, config: &CodecConfig) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let bytes = encode_with(value, config)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(bytes.len())
}

/// Read exactly one document from `reader` and decode it.
pub async fn read_document_async<R>(reader: &mut R, config: &CodecConfig) -> Result<Value>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; HEADER_LEN];
    reader.read_exact(&mut buf).await?;
    let table_offset = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if table_offset < MIN_TABLE_OFFSET {
        return Err(ObjPackError::truncated(HEADER_LEN, MIN_TABLE_OFFSET - HEADER_LEN, 0));
    }

    read_extend(reader, &mut buf, table_offset - HEADER_LEN).await?;
    let count = read_varint32(reader, &mut buf).await?;
    for _ in 0..count {
        let len = read_varint32(reader, &mut buf).await? as usize;
        read_extend(reader, &mut buf, len).await?;
    }

    decode_with(&buf, config)
}

async fn read_extend<R>(reader: &mut R, buf: &mut Vec<u8>, n: usize) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let got = (&mut *reader).take(n as u64).read_to_end(buf).await?;
    if got < n {
        return Err(ObjPackError::truncated(buf.len(), n - got, 0));
    }
    Ok(())
}

async fn read_varint32<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<u32>
where
    R: AsyncRead + Unpin,
{
    let start = buf.len();
    read_extend(reader, buf, 1).await?;
    let len = varint::len_from_first_u32(buf[start]);
    read_extend(reader, buf, len - 1).await?;

    let mut cursor = ByteReader::at(buf, start)?;
    varint::read_u32(&mut cursor)
}
