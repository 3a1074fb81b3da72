//! Adaptive variable-length integer codec.
//!
//! Values are written big-endian in the fewest bytes possible, with a length
//! code stored in the top bits of the first byte: 2 bits for the 32-bit form
//! (1-4 data bytes) and 3 bits for the 64-bit form (1-8 data bytes).
//!
//! # Layout
//!
//! Let `L` be the bit length of the value, `src = ceil(L / 8)` and
//! `packed = ceil((L + H) / 8)` where `H` is the header width.
//!
//! - **Merged** (`packed == src`): the length code `packed - 1` shares the
//!   first byte with the most significant data bits.
//!
//!   ```text
//!   32-bit, value 300 (L = 9):  [01 000001] [00101100]
//!                                 ^^ code 1 = two bytes total
//!   ```
//!
//! - **Dedicated** (`packed > src`): a header byte with zero data bits,
//!   followed by `max(src, 1)` literal bytes.
//!
//!   ```text
//!   32-bit, value 200 (L = 8):  [00 000000] [11001000]
//!   ```
//!
//! The decoder tells the two apart by the data bits of the first byte: a
//! merged first byte always carries the value's highest set bit, so it is
//! never zero there.
//!
//! Signed integers and floats go through the same scheme via their raw bit
//! patterns, so negative numbers always take the full width plus a header.

use crate::bits::BitLength;
use crate::error::Result;
use crate::reader::ByteReader;

/// Header bits used by the 32-bit form.
pub const HEADER_BITS_32: u32 = 2;

/// Header bits used by the 64-bit form.
pub const HEADER_BITS_64: u32 = 3;

/// Largest encoding of a 32-bit value.
pub const MAX_LEN_32: usize = 5;

/// Largest encoding of a 64-bit value.
pub const MAX_LEN_64: usize = 9;

#[inline]
fn write_adaptive(out: &mut Vec<u8>, value: u64, header_bits: u32) {
    let bits = value.bit_length();
    let src = bits.div_ceil(8);
    let packed = (bits + header_bits).div_ceil(8);
    let shift = 8 - header_bits;

    if packed == src {
        let code = (packed - 1) as u8;
        let top = (value >> ((packed - 1) * 8)) as u8;
        out.push((code << shift) | top);
        for i in (0..packed - 1).rev() {
            out.push((value >> (i * 8)) as u8);
        }
    } else {
        let n = src.max(1);
        out.push(((n - 1) as u8) << shift);
        for i in (0..n).rev() {
            out.push((value >> (i * 8)) as u8);
        }
    }
}

#[inline]
fn read_adaptive(reader: &mut ByteReader<'_>, header_bits: u32) -> Result<u64> {
    let first = reader.read_u8()?;
    let n = (first >> (8 - header_bits)) as usize + 1;
    let low = first & (0xFF >> header_bits);

    let (mut value, rest) = if low == 0 {
        (0u64, n)
    } else {
        (u64::from(low), n - 1)
    };
    for &b in reader.read_bytes(rest)? {
        value = (value << 8) | u64::from(b);
    }
    Ok(value)
}

#[inline]
fn adaptive_len(value: u64, header_bits: u32) -> usize {
    let bits = value.bit_length();
    let src = bits.div_ceil(8);
    let packed = (bits + header_bits).div_ceil(8);
    if packed == src {
        packed as usize
    } else {
        src.max(1) as usize + 1
    }
}

/// Append the 32-bit form of `value`.
#[inline]
pub fn write_u32(out: &mut Vec<u8>, value: u32) {
    write_adaptive(out, u64::from(value), HEADER_BITS_32);
}

/// Append the 64-bit form of `value`.
#[inline]
pub fn write_u64(out: &mut Vec<u8>, value: u64) {
    write_adaptive(out, value, HEADER_BITS_64);
}

/// Append a signed 32-bit value via its two's complement pattern.
#[inline]
pub fn write_i32(out: &mut Vec<u8>, value: i32) {
    write_u32(out, value as u32);
}

/// Append a signed 64-bit value via its two's complement pattern.
#[inline]
pub fn write_i64(out: &mut Vec<u8>, value: i64) {
    write_u64(out, value as u64);
}

/// Read a 32-bit form value.
#[inline]
pub fn read_u32(reader: &mut ByteReader<'_>) -> Result<u32> {
    // At most 4 data bytes follow a 2-bit code, so the value always fits.
    read_adaptive(reader, HEADER_BITS_32).map(|v| v as u32)
}

/// Read a 64-bit form value.
#[inline]
pub fn read_u64(reader: &mut ByteReader<'_>) -> Result<u64> {
    read_adaptive(reader, HEADER_BITS_64)
}

/// Read a signed 32-bit value.
#[inline]
pub fn read_i32(reader: &mut ByteReader<'_>) -> Result<i32> {
    read_u32(reader).map(|v| v as i32)
}

/// Read a signed 64-bit value.
#[inline]
pub fn read_i64(reader: &mut ByteReader<'_>) -> Result<i64> {
    read_u64(reader).map(|v| v as i64)
}

/// Encode a 32-bit value into a fresh buffer.
#[must_use]
pub fn encode_u32(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_LEN_32);
    write_u32(&mut out, value);
    out
}

/// Encode a 64-bit value into a fresh buffer.
#[must_use]
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_LEN_64);
    write_u64(&mut out, value);
    out
}

/// Number of bytes [`write_u32`] emits for `value`.
#[must_use]
pub fn encoded_len_u32(value: u32) -> usize {
    adaptive_len(u64::from(value), HEADER_BITS_32)
}

/// Number of bytes [`write_u64`] emits for `value`.
#[must_use]
pub fn encoded_len_u64(value: u64) -> usize {
    adaptive_len(value, HEADER_BITS_64)
}

/// Total encoded length of a 32-bit form value given only its first byte.
///
/// Lets stream readers pull exactly one VarInt without over-reading.
#[must_use]
pub fn len_from_first_u32(first: u8) -> usize {
    len_from_first(first, HEADER_BITS_32)
}

/// Total encoded length of a 64-bit form value given only its first byte.
#[must_use]
pub fn len_from_first_u64(first: u8) -> usize {
    len_from_first(first, HEADER_BITS_64)
}

#[inline]
fn len_from_first(first: u8, header_bits: u32) -> usize {
    let n = (first >> (8 - header_bits)) as usize + 1;
    if first & (0xFF >> header_bits) == 0 {
        n + 1
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_u32(value: u32) -> usize {
        let bytes = encode_u32(value);
        assert_eq!(bytes.len(), encoded_len_u32(value), "length for {value}");
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_u32(&mut reader).unwrap(), value);
        assert!(reader.is_empty(), "decoder must consume every byte");
        bytes.len()
    }

    fn roundtrip_u64(value: u64) -> usize {
        let bytes = encode_u64(value);
        assert_eq!(bytes.len(), encoded_len_u64(value), "length for {value}");
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_u64(&mut reader).unwrap(), value);
        assert!(reader.is_empty(), "decoder must consume every byte");
        bytes.len()
    }

    #[test]
    fn test_u32_boundaries() {
        assert_eq!(roundtrip_u32(0), 2);
        assert_eq!(roundtrip_u32(1), 1);
        assert_eq!(roundtrip_u32(63), 1);
        assert_eq!(roundtrip_u32(64), 2);
        assert_eq!(roundtrip_u32(255), 2);
        assert_eq!(roundtrip_u32(256), 2);
        assert_eq!(roundtrip_u32(16383), 2);
        assert_eq!(roundtrip_u32(16384), 3);
        assert_eq!(roundtrip_u32(65535), 3);
        assert_eq!(roundtrip_u32(65536), 3);
        assert_eq!(roundtrip_u32(0x3FFF_FFFF), 4);
        assert_eq!(roundtrip_u32(0x4000_0000), 5);
        assert_eq!(roundtrip_u32(u32::MAX), 5);
    }

    #[test]
    fn test_u64_boundaries() {
        assert_eq!(roundtrip_u64(0), 2);
        assert_eq!(roundtrip_u64(31), 1);
        assert_eq!(roundtrip_u64(32), 2);
        assert_eq!(roundtrip_u64(255), 2);
        assert_eq!(roundtrip_u64(256), 2);
        assert_eq!(roundtrip_u64(65535), 3);
        assert_eq!(roundtrip_u64(65536), 3);
        assert_eq!(roundtrip_u64(u64::from(u32::MAX)), 5);
        assert_eq!(roundtrip_u64(0x1FFF_FFFF_FFFF_FFFF), 8);
        assert_eq!(roundtrip_u64(u64::MAX), 9);
    }

    #[test]
    fn test_exact_bytes() {
        assert_eq!(encode_u32(0), [0x00, 0x00]);
        assert_eq!(encode_u32(63), [0x3F]);
        assert_eq!(encode_u32(64), [0x00, 0x40]);
        assert_eq!(encode_u32(255), [0x00, 0xFF]);
        assert_eq!(encode_u32(256), [0x41, 0x00]);
        assert_eq!(encode_u32(300), [0x41, 0x2C]);
        assert_eq!(encode_u32(65535), [0x40, 0xFF, 0xFF]);
        assert_eq!(encode_u32(65536), [0x81, 0x00, 0x00]);
        assert_eq!(encode_u32(u32::MAX), [0xC0, 0xFF, 0xFF, 0xFF, 0xFF]);

        assert_eq!(encode_u64(31), [0x1F]);
        assert_eq!(encode_u64(32), [0x00, 0x20]);
        assert_eq!(encode_u64(256), [0x21, 0x00]);
        assert_eq!(
            encode_u64(u64::MAX),
            [0xE0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_signed_patterns() {
        let mut out = Vec::new();
        write_i32(&mut out, -1);
        write_i32(&mut out, i32::MIN);
        write_i32(&mut out, i32::MAX);
        write_i64(&mut out, -1);
        write_i64(&mut out, i64::MIN);
        write_i64(&mut out, i64::MAX);

        // Negative values carry every bit, so they take the widest form
        assert_eq!(&out[..5], &[0xC0, 0xFF, 0xFF, 0xFF, 0xFF]);

        let mut reader = ByteReader::new(&out);
        assert_eq!(read_i32(&mut reader).unwrap(), -1);
        assert_eq!(read_i32(&mut reader).unwrap(), i32::MIN);
        assert_eq!(read_i32(&mut reader).unwrap(), i32::MAX);
        assert_eq!(read_i64(&mut reader).unwrap(), -1);
        assert_eq!(read_i64(&mut reader).unwrap(), i64::MIN);
        assert_eq!(read_i64(&mut reader).unwrap(), i64::MAX);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_float_bit_patterns() {
        for v in [0.0f64, -0.0, 1.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let bytes = encode_u64(v.to_bits());
            let mut reader = ByteReader::new(&bytes);
            let back = f64::from_bits(read_u64(&mut reader).unwrap());
            assert_eq!(back.to_bits(), v.to_bits());
        }
    }

    #[test]
    fn test_every_width_roundtrips() {
        for shift in 0..32 {
            let v = 1u32 << shift;
            roundtrip_u32(v);
            roundtrip_u32(v - 1);
            roundtrip_u32(v | (v >> 1));
        }
        for shift in 0..64 {
            let v = 1u64 << shift;
            roundtrip_u64(v);
            roundtrip_u64(v - 1);
        }
    }

    #[test]
    fn test_len_from_first_byte() {
        for v in [0u32, 1, 63, 64, 256, 65535, 65536, u32::MAX] {
            let bytes = encode_u32(v);
            assert_eq!(len_from_first_u32(bytes[0]), bytes.len(), "value {v}");
        }
        for v in [0u64, 31, 32, 1 << 40, u64::MAX] {
            let bytes = encode_u64(v);
            assert_eq!(len_from_first_u64(bytes[0]), bytes.len(), "value {v}");
        }
    }

    #[test]
    fn test_truncated_varint() {
        // Dedicated header promising four data bytes, only two present
        let data = [0xC0, 0x12, 0x34];
        let mut reader = ByteReader::new(&data);
        assert!(read_u32(&mut reader).unwrap_err().is_truncated());

        // Merged first byte promising three bytes total
        let data = [0x81, 0x00];
        let mut reader = ByteReader::new(&data);
        assert!(read_u32(&mut reader).unwrap_err().is_truncated());

        let mut reader = ByteReader::new(&[]);
        assert!(read_u64(&mut reader).unwrap_err().is_truncated());
    }
}
