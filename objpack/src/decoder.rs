//! Object graph decoder.
//!
//! Reads one tagged value at the cursor, recursing for containers and
//! records. The cursor is bounded by the body length, so no read can run
//! into the string table.

use crate::config::CodecConfig;
use crate::number::{BigDecimal, BigInteger};
use crate::record::DynamicRecord;
use crate::strings::StringTable;
use crate::tag::{TypeTag, is_extension_tag};
use crate::value::{DateKind, DateValue, Value};
use objpack_core::{ByteReader, ObjPackError, Result, varint};
use std::sync::Arc;
use tracing::trace;

/// Decoder state for one document body.
pub struct ObjectDecoder<'a> {
    config: &'a CodecConfig,
    strings: &'a StringTable,
    reader: ByteReader<'a>,
    depth: usize,
}

impl<'a> ObjectDecoder<'a> {
    /// Create a decoder over `reader`, which must be bounded by the body end.
    pub fn new(config: &'a CodecConfig, strings: &'a StringTable, reader: ByteReader<'a>) -> Self {
        Self {
            config,
            strings,
            reader,
            depth: 0,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &'a CodecConfig {
        self.config
    }

    /// The resolved string table.
    pub fn strings(&self) -> &'a StringTable {
        self.strings
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// Bytes left before the body bound.
    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.reader.read_u8()
    }

    /// Read a 32-bit form VarInt.
    pub fn read_u32(&mut self) -> Result<u32> {
        varint::read_u32(&mut self.reader)
    }

    /// Read a signed 32-bit VarInt.
    pub fn read_i32(&mut self) -> Result<i32> {
        varint::read_i32(&mut self.reader)
    }

    /// Read a 64-bit form VarInt.
    pub fn read_u64(&mut self) -> Result<u64> {
        varint::read_u64(&mut self.reader)
    }

    /// Read a signed 64-bit VarInt.
    pub fn read_i64(&mut self) -> Result<i64> {
        varint::read_i64(&mut self.reader)
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.reader.read_bytes(n)
    }

    /// Read a sequence length.
    pub fn read_len(&mut self) -> Result<usize> {
        self.read_u32().map(|n| n as usize)
    }

    /// Read a string sequence number and resolve it.
    pub fn read_string(&mut self) -> Result<&'a str> {
        let index = self.read_u32()?;
        self.strings.resolve(index)
    }

    /// Decode the value at the cursor.
    pub fn decode_value(&mut self) -> Result<Value> {
        self.enter()?;
        let result = self.decode_tagged();
        self.depth -= 1;
        let value = result?;
        debug_assert!(self.reader.position() <= self.reader.bound());

        Ok(match self.config.hook() {
            Some(hook) => hook.post_decode(value),
            None => value,
        })
    }

    fn enter(&mut self) -> Result<()> {
        match self.config.max_depth() {
            Some(limit) if self.depth >= limit => Err(ObjPackError::DepthLimitExceeded { limit }),
            _ => {
                self.depth += 1;
                Ok(())
            }
        }
    }

    fn decode_tagged(&mut self) -> Result<Value> {
        let offset = self.reader.position();
        let tag = self.reader.read_u8()?;
        match TypeTag::from_byte(tag) {
            Some(tag) => self.decode_builtin(tag),
            None => self.decode_extension(tag, offset),
        }
    }

    fn decode_extension(&mut self, tag: u8, offset: usize) -> Result<Value> {
        let config = self.config;
        match config.hook() {
            Some(hook) if is_extension_tag(tag) => match hook.try_decode(self, tag)? {
                Some(value) => Ok(value),
                None => Err(hook.on_unhandled_tag(tag, offset)),
            },
            _ => Err(ObjPackError::unknown_tag(tag, offset)),
        }
    }

    /// Read a length, then `len` elements with `read`.
    fn read_seq<T>(&mut self, mut read: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let len = self.read_len()?;
        // Every element takes at least one byte
        let mut items = Vec::with_capacity(len.min(self.reader.remaining()));
        for _ in 0..len {
            items.push(read(self)?);
        }
        Ok(items)
    }

    fn decode_builtin(&mut self, tag: TypeTag) -> Result<Value> {
        let value = match tag {
            TypeTag::Null => Value::Null,
            TypeTag::String => Value::String(self.read_string()?.to_owned()),
            TypeTag::Bool => Value::Bool(self.reader.read_u8()? == 1),
            TypeTag::Char => Value::Char(self.reader.read_u16_be()?),
            TypeTag::Byte => Value::Byte(self.reader.read_u8()? as i8),
            TypeTag::Short => Value::Short(self.reader.read_u16_be()? as i16),
            TypeTag::Int => Value::Int(self.read_i32()?),
            TypeTag::Long => Value::Long(self.read_i64()?),
            TypeTag::Float => Value::Float(f32::from_bits(self.read_u32()?)),
            TypeTag::Double => Value::Double(f64::from_bits(self.read_u64()?)),
            TypeTag::AtomicInt => Value::AtomicInt(self.read_i32()?),
            TypeTag::AtomicLong => Value::AtomicLong(self.read_i64()?),
            TypeTag::BigDecimal => Value::BigDecimal(BigDecimal::parse(self.read_string()?)?),
            TypeTag::BigInteger => Value::BigInteger(BigInteger::parse(self.read_string()?)?),
            TypeTag::Date => Value::Date(self.decode_date()?),
            TypeTag::Record => self.decode_record()?,
            TypeTag::BoolArray => {
                let len = self.read_len()?;
                let bytes = self.reader.read_bytes(len)?;
                Value::BoolArray(bytes.iter().map(|&b| b == 1).collect())
            }
            TypeTag::ByteArray => {
                let len = self.read_len()?;
                Value::ByteArray(self.reader.read_bytes(len)?.to_vec())
            }
            TypeTag::CharArray => Value::CharArray(self.read_seq(|d| d.reader.read_u16_be())?),
            TypeTag::ShortArray => {
                Value::ShortArray(self.read_seq(|d| d.reader.read_u16_be().map(|v| v as i16))?)
            }
            TypeTag::IntArray => Value::IntArray(self.read_seq(Self::read_i32)?),
            TypeTag::LongArray => Value::LongArray(self.read_seq(Self::read_i64)?),
            TypeTag::FloatArray => {
                Value::FloatArray(self.read_seq(|d| d.read_u32().map(f32::from_bits))?)
            }
            TypeTag::DoubleArray => {
                Value::DoubleArray(self.read_seq(|d| d.read_u64().map(f64::from_bits))?)
            }
            TypeTag::StringArray => {
                Value::StringArray(self.read_seq(|d| d.read_string().map(str::to_owned))?)
            }
            TypeTag::Array => Value::Array(self.read_seq(Self::decode_value)?),
            TypeTag::List => Value::List(self.read_seq(Self::decode_value)?),
            TypeTag::Set => Value::Set(self.read_seq(Self::decode_value)?),
            TypeTag::Map => {
                Value::Map(self.read_seq(|d| Ok((d.decode_value()?, d.decode_value()?)))?)
            }
            TypeTag::Serialized => self.decode_serialized()?,
        };
        Ok(value)
    }

    fn decode_date(&mut self) -> Result<DateValue> {
        let kind = match self.reader.read_u8()? {
            1 => DateKind::Date,
            2 => DateKind::Time,
            3 => DateKind::Timestamp,
            4 => DateKind::Generic,
            5 => DateKind::Other(self.read_string()?.to_owned()),
            kind => return Err(ObjPackError::InvalidDateKind { kind }),
        };
        let millis = self.read_i64()?;
        Ok(DateValue::new(kind, millis))
    }

    fn decode_record(&mut self) -> Result<Value> {
        let config = self.config;
        let name = self.read_string()?;
        let registry = config.registry();
        let registered = registry.contains(name);
        if !registered && !config.dynamic_records() {
            return Err(ObjPackError::unknown_type(name));
        }

        let fields = self.read_seq(Self::decode_value)?;
        let record = if registered {
            registry.construct(name, fields)?
        } else {
            trace!(type_name = name, "decoding unregistered record dynamically");
            Arc::new(DynamicRecord::new(name, fields))
        };
        Ok(Value::Record(record))
    }

    fn decode_serialized(&mut self) -> Result<Value> {
        let len = self.read_len()?;
        if len == 0 {
            return Ok(Value::Null);
        }
        let bytes = self.reader.read_bytes(len)?;
        match self.config.fallback() {
            Some(fallback) => fallback.deserialize(bytes),
            None => Ok(Value::Serialized(bytes.to_vec())),
        }
    }
}
