//! Object graph encoder.
//!
//! Walks a [`Value`] depth-first, appending a tag and payload per node to
//! the body buffer and interning every string it meets. The public write
//! helpers are what an [`ExtensionHook`](crate::ExtensionHook) uses to emit
//! its own payloads.

use crate::config::CodecConfig;
use crate::extension::ExtensionValue;
use crate::strings::StringTableBuilder;
use crate::tag::TypeTag;
use crate::value::{DateKind, Value};
use objpack_core::{ObjPackError, Result, varint};
use tracing::debug;

/// Encoder state for one document.
pub struct ObjectEncoder<'c> {
    config: &'c CodecConfig,
    strings: StringTableBuilder,
    out: Vec<u8>,
    depth: usize,
}

impl<'c> ObjectEncoder<'c> {
    /// Create an encoder writing into a fresh buffer.
    pub fn new(config: &'c CodecConfig) -> Self {
        Self::with_buffer(config, Vec::new())
    }

    /// Create an encoder appending to `out`.
    pub fn with_buffer(config: &'c CodecConfig, out: Vec<u8>) -> Self {
        Self {
            config,
            strings: StringTableBuilder::new(),
            out,
            depth: 0,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &'c CodecConfig {
        self.config
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Split into the written buffer and the string table.
    pub fn into_parts(self) -> (Vec<u8>, StringTableBuilder) {
        (self.out, self.strings)
    }

    /// Write a raw tag byte.
    #[inline]
    pub fn write_tag(&mut self, tag: u8) {
        self.out.push(tag);
    }

    /// Write one byte.
    #[inline]
    pub fn write_u8(&mut self, b: u8) {
        self.out.push(b);
    }

    /// Write a 32-bit form VarInt.
    #[inline]
    pub fn write_u32(&mut self, v: u32) {
        varint::write_u32(&mut self.out, v);
    }

    /// Write a signed 32-bit VarInt.
    #[inline]
    pub fn write_i32(&mut self, v: i32) {
        varint::write_i32(&mut self.out, v);
    }

    /// Write a 64-bit form VarInt.
    #[inline]
    pub fn write_u64(&mut self, v: u64) {
        varint::write_u64(&mut self.out, v);
    }

    /// Write a signed 64-bit VarInt.
    #[inline]
    pub fn write_i64(&mut self, v: i64) {
        varint::write_i64(&mut self.out, v);
    }

    /// Write raw bytes with no length prefix.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Write a sequence length as a 32-bit VarInt.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len32 = u32::try_from(len).map_err(|_| ObjPackError::LengthOverflow { len })?;
        self.write_u32(len32);
        Ok(())
    }

    /// Intern `s` and write its sequence number.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        if s.len() > u32::MAX as usize {
            return Err(ObjPackError::LengthOverflow { len: s.len() });
        }
        let id = self.strings.intern(s);
        self.write_u32(id);
        Ok(())
    }

    /// Encode a value (tag and payload), giving the hook the first chance.
    pub fn encode_value(&mut self, value: &Value) -> Result<()> {
        self.enter()?;
        let config = self.config;
        let result = match config.hook() {
            Some(hook) => {
                let value = hook.pre_encode(value);
                match hook.try_encode(self, &value) {
                    Ok(true) => Ok(()),
                    Ok(false) => self.encode_builtin(&value),
                    Err(e) => Err(e),
                }
            }
            None => self.encode_builtin(value),
        };
        self.depth -= 1;
        result
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

    fn tag(&mut self, tag: TypeTag) {
        self.out.push(tag.byte());
    }

    fn encode_builtin(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.tag(TypeTag::Null),
            Value::String(s) => {
                self.tag(TypeTag::String);
                self.write_string(s)?;
            }
            Value::Bool(b) => {
                self.tag(TypeTag::Bool);
                self.write_u8(u8::from(*b));
            }
            Value::Char(c) => {
                self.tag(TypeTag::Char);
                self.write_bytes(&c.to_be_bytes());
            }
            Value::Byte(b) => {
                self.tag(TypeTag::Byte);
                self.write_u8(*b as u8);
            }
            Value::Short(s) => {
                self.tag(TypeTag::Short);
                self.write_bytes(&s.to_be_bytes());
            }
            Value::Int(v) => {
                self.tag(TypeTag::Int);
                self.write_i32(*v);
            }
            Value::Long(v) => {
                self.tag(TypeTag::Long);
                self.write_i64(*v);
            }
            Value::Float(v) => {
                self.tag(TypeTag::Float);
                self.write_u32(v.to_bits());
            }
            Value::Double(v) => {
                self.tag(TypeTag::Double);
                self.write_u64(v.to_bits());
            }
            Value::AtomicInt(v) => {
                self.tag(TypeTag::AtomicInt);
                self.write_i32(*v);
            }
            Value::AtomicLong(v) => {
                self.tag(TypeTag::AtomicLong);
                self.write_i64(*v);
            }
            Value::BigDecimal(d) => {
                self.tag(TypeTag::BigDecimal);
                self.write_string(d.as_str())?;
            }
            Value::BigInteger(i) => {
                self.tag(TypeTag::BigInteger);
                self.write_string(i.as_str())?;
            }
            Value::Date(d) => {
                self.tag(TypeTag::Date);
                self.write_u8(d.kind.code());
                if let DateKind::Other(name) = &d.kind {
                    self.write_string(name)?;
                }
                self.write_i64(d.millis);
            }
            Value::Record(record) => {
                self.tag(TypeTag::Record);
                self.write_string(record.type_name())?;
                let fields = record.fields();
                self.write_len(fields.len())?;
                for field in &fields {
                    self.encode_value(field)?;
                }
            }
            Value::BoolArray(items) => {
                self.tag(TypeTag::BoolArray);
                self.write_len(items.len())?;
                self.out.extend(items.iter().map(|&b| u8::from(b)));
            }
            Value::ByteArray(bytes) => {
                self.tag(TypeTag::ByteArray);
                self.write_len(bytes.len())?;
                self.write_bytes(bytes);
            }
            Value::CharArray(items) => {
                self.tag(TypeTag::CharArray);
                self.write_len(items.len())?;
                for c in items {
                    self.write_bytes(&c.to_be_bytes());
                }
            }
            Value::ShortArray(items) => {
                self.tag(TypeTag::ShortArray);
                self.write_len(items.len())?;
                for s in items {
                    self.write_bytes(&s.to_be_bytes());
                }
            }
            Value::IntArray(items) => {
                self.tag(TypeTag::IntArray);
                self.write_len(items.len())?;
                for &v in items {
                    self.write_i32(v);
                }
            }
            Value::LongArray(items) => {
                self.tag(TypeTag::LongArray);
                self.write_len(items.len())?;
                for &v in items {
                    self.write_i64(v);
                }
            }
            Value::FloatArray(items) => {
                self.tag(TypeTag::FloatArray);
                self.write_len(items.len())?;
                for v in items {
                    self.write_u32(v.to_bits());
                }
            }
            Value::DoubleArray(items) => {
                self.tag(TypeTag::DoubleArray);
                self.write_len(items.len())?;
                for v in items {
                    self.write_u64(v.to_bits());
                }
            }
            Value::StringArray(items) => {
                self.tag(TypeTag::StringArray);
                self.write_len(items.len())?;
                for s in items {
                    self.write_string(s)?;
                }
            }
            Value::Array(items) => self.encode_sequence(TypeTag::Array, items)?,
            Value::List(items) => self.encode_sequence(TypeTag::List, items)?,
            Value::Set(items) => self.encode_sequence(TypeTag::Set, items)?,
            Value::Map(entries) => {
                self.tag(TypeTag::Map);
                self.write_len(entries.len())?;
                for (k, v) in entries {
                    self.encode_value(k)?;
                    self.encode_value(v)?;
                }
            }
            Value::Serialized(bytes) => self.encode_serialized(bytes)?,
            Value::Extension(ext) => self.encode_unclaimed(ext)?,
        }
        Ok(())
    }

    fn encode_sequence(&mut self, tag: TypeTag, items: &[Value]) -> Result<()> {
        self.tag(tag);
        self.write_len(items.len())?;
        for item in items {
            self.encode_value(item)?;
        }
        Ok(())
    }

    fn encode_serialized(&mut self, bytes: &[u8]) -> Result<()> {
        self.tag(TypeTag::Serialized);
        self.write_len(bytes.len())?;
        self.write_bytes(bytes);
        Ok(())
    }

    /// Extension value the hook did not claim: try the fallback, else null.
    fn encode_unclaimed(&mut self, ext: &ExtensionValue) -> Result<()> {
        let config = self.config;
        if let Some(bytes) = config.fallback().and_then(|f| f.serialize(ext)) {
            return self.encode_serialized(&bytes);
        }
        debug!(tag = ext.tag(), payload = ?ext.payload(), "unsupported value written as null");
        self.tag(TypeTag::Null);
        Ok(())
    }
}
