//! In-memory value tree.
//!
//! [`Value`] is a closed sum type over every built-in wire variant, plus
//! [`Value::Extension`] for caller-defined types handled by an
//! [`ExtensionHook`](crate::ExtensionHook).
//!
//! # Equality
//!
//! `PartialEq` is structural, except that:
//!
//! - floats compare by bit pattern, so `NaN == NaN` and `0.0 != -0.0`;
//! - maps and sets compare without regard to order. Lists and arrays are
//!   order-sensitive.

use crate::extension::ExtensionValue;
use crate::number::{BigDecimal, BigInteger};
use crate::record::Record;
use crate::tag::TypeTag;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A decoded or to-be-encoded value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null.
    Null,
    /// UTF-8 string.
    String(String),
    /// Boolean.
    Bool(bool),
    /// UTF-16 code unit.
    Char(u16),
    /// Signed byte.
    Byte(i8),
    /// 16-bit integer.
    Short(i16),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Atomic 32-bit integer snapshot.
    AtomicInt(i32),
    /// Atomic 64-bit integer snapshot.
    AtomicLong(i64),
    /// Arbitrary-precision decimal.
    BigDecimal(BigDecimal),
    /// Arbitrary-precision integer.
    BigInteger(BigInteger),
    /// Date-like value.
    Date(DateValue),
    /// User record resolved through the type registry.
    Record(Arc<dyn Record>),
    /// `bool[]`
    BoolArray(Vec<bool>),
    /// `byte[]`, copied verbatim.
    ByteArray(Vec<u8>),
    /// `char[]` of UTF-16 code units.
    CharArray(Vec<u16>),
    /// `short[]`
    ShortArray(Vec<i16>),
    /// `int[]`
    IntArray(Vec<i32>),
    /// `long[]`
    LongArray(Vec<i64>),
    /// `float[]`
    FloatArray(Vec<f32>),
    /// `double[]`
    DoubleArray(Vec<f64>),
    /// `String[]`
    StringArray(Vec<String>),
    /// Heterogeneous array; element types come from the elements.
    Array(Vec<Value>),
    /// Ordered list.
    List(Vec<Value>),
    /// Map as key/value pairs in iteration order.
    Map(Vec<(Value, Value)>),
    /// Set in iteration order.
    Set(Vec<Value>),
    /// Opaque payload produced by a fallback serializer.
    Serialized(Vec<u8>),
    /// Caller-defined type for an extension hook.
    Extension(ExtensionValue),
}

impl Value {
    /// Wrap a record.
    pub fn record<R: Record>(record: R) -> Self {
        Self::Record(Arc::new(record))
    }

    /// Build a map from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list from anything convertible into values.
    pub fn list<T: Into<Value>, I: IntoIterator<Item = T>>(items: I) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// The built-in tag this value encodes with, or `None` for extensions.
    pub fn tag(&self) -> Option<TypeTag> {
        let tag = match self {
            Self::Null => TypeTag::Null,
            Self::String(_) => TypeTag::String,
            Self::Bool(_) => TypeTag::Bool,
            Self::Char(_) => TypeTag::Char,
            Self::Byte(_) => TypeTag::Byte,
            Self::Short(_) => TypeTag::Short,
            Self::Int(_) => TypeTag::Int,
            Self::Long(_) => TypeTag::Long,
            Self::Float(_) => TypeTag::Float,
            Self::Double(_) => TypeTag::Double,
            Self::AtomicInt(_) => TypeTag::AtomicInt,
            Self::AtomicLong(_) => TypeTag::AtomicLong,
            Self::BigDecimal(_) => TypeTag::BigDecimal,
            Self::BigInteger(_) => TypeTag::BigInteger,
            Self::Date(_) => TypeTag::Date,
            Self::Record(_) => TypeTag::Record,
            Self::BoolArray(_) => TypeTag::BoolArray,
            Self::ByteArray(_) => TypeTag::ByteArray,
            Self::CharArray(_) => TypeTag::CharArray,
            Self::ShortArray(_) => TypeTag::ShortArray,
            Self::IntArray(_) => TypeTag::IntArray,
            Self::LongArray(_) => TypeTag::LongArray,
            Self::FloatArray(_) => TypeTag::FloatArray,
            Self::DoubleArray(_) => TypeTag::DoubleArray,
            Self::StringArray(_) => TypeTag::StringArray,
            Self::Array(_) => TypeTag::Array,
            Self::List(_) => TypeTag::List,
            Self::Map(_) => TypeTag::Map,
            Self::Set(_) => TypeTag::Set,
            Self::Serialized(_) => TypeTag::Serialized,
            Self::Extension(_) => return None,
        };
        Some(tag)
    }

    /// Name of the variant for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self.tag() {
            Some(tag) => tag.name(),
            None => "extension",
        }
    }

    /// Whether this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// String contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integral scalar widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v) => Some(v.into()),
            Self::Short(v) => Some(v.into()),
            Self::Int(v) | Self::AtomicInt(v) => Some(v.into()),
            Self::Long(v) | Self::AtomicLong(v) => Some(v),
            Self::Char(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Any numeric scalar as `f64` (possibly lossy).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            Self::BigDecimal(d) => Some(d.to_f64()),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Elements of a list, set or heterogeneous array.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Set(items) | Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Entries of a map.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a map entry by string key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Downcast a record value to a concrete type.
    pub fn as_record<R: Record>(&self) -> Option<&R> {
        match self {
            Self::Record(r) => r.as_any().downcast_ref::<R>(),
            _ => None,
        }
    }

    /// Extension payload, if this is an extension value of type `P`.
    pub fn as_extension<P: Any>(&self) -> Option<&P> {
        match self {
            Self::Extension(ext) => ext.downcast_ref::<P>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (String(a), String(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Byte(a), Byte(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Int(a), Int(b)) | (AtomicInt(a), AtomicInt(b)) => a == b,
            (Long(a), Long(b)) | (AtomicLong(a), AtomicLong(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (BigDecimal(a), BigDecimal(b)) => a == b,
            (BigInteger(a), BigInteger(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Record(a), Record(b)) => a.type_name() == b.type_name() && a.fields() == b.fields(),
            (BoolArray(a), BoolArray(b)) => a == b,
            (ByteArray(a), ByteArray(b)) => a == b,
            (CharArray(a), CharArray(b)) => a == b,
            (ShortArray(a), ShortArray(b)) => a == b,
            (IntArray(a), IntArray(b)) => a == b,
            (LongArray(a), LongArray(b)) => a == b,
            (FloatArray(a), FloatArray(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (DoubleArray(a), DoubleArray(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (StringArray(a), StringArray(b)) => a == b,
            (Array(a), Array(b)) | (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => same_elements(a, b),
            (Set(a), Set(b)) => same_elements(a, b),
            (Serialized(a), Serialized(b)) => a == b,
            (Extension(a), Extension(b)) => a == b,
            _ => false,
        }
    }
}

/// Order-insensitive multiset comparison; values are not hashable.
fn same_elements<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        match b
            .iter()
            .enumerate()
            .find(|(i, y)| !used[*i] && x == *y)
        {
            Some((i, _)) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    String => String,
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    BigDecimal => BigDecimal,
    BigInteger => BigInteger,
    DateValue => Date,
    ExtensionValue => Extension,
    Vec<bool> => BoolArray,
    Vec<u8> => ByteArray,
    Vec<i16> => ShortArray,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
    Vec<f32> => FloatArray,
    Vec<f64> => DoubleArray,
    Vec<String> => StringArray,
    Vec<Value> => List,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Sub-kind of a date-like value (the byte after tag 14).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateKind {
    /// Calendar date without time of day.
    Date,
    /// Time of day.
    Time,
    /// Timestamp with sub-second precision.
    Timestamp,
    /// Plain instant.
    Generic,
    /// Some other named date type.
    Other(String),
}

impl DateKind {
    /// Wire code of this kind.
    pub fn code(&self) -> u8 {
        match self {
            Self::Date => 1,
            Self::Time => 2,
            Self::Timestamp => 3,
            Self::Generic => 4,
            Self::Other(_) => 5,
        }
    }
}

/// A date-like value: a kind plus milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateValue {
    /// What kind of date this is.
    pub kind: DateKind,
    /// Milliseconds since 1970-01-01T00:00:00Z (may be negative).
    pub millis: i64,
}

impl DateValue {
    /// Create a date value.
    pub fn new(kind: DateKind, millis: i64) -> Self {
        Self { kind, millis }
    }

    /// A generic instant.
    pub fn generic(millis: i64) -> Self {
        Self::new(DateKind::Generic, millis)
    }

    /// A timestamp.
    pub fn timestamp(millis: i64) -> Self {
        Self::new(DateKind::Timestamp, millis)
    }

    /// Convert a `SystemTime` into a generic instant (millisecond precision).
    pub fn from_system_time(time: SystemTime) -> Self {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
            Err(e) => i64::try_from(e.duration().as_millis()).map_or(i64::MIN, |m| -m),
        };
        Self::generic(millis)
    }

    /// Convert to a `SystemTime`.
    pub fn to_system_time(&self) -> SystemTime {
        let offset = Duration::from_millis(self.millis.unsigned_abs());
        if self.millis >= 0 {
            UNIX_EPOCH + offset
        } else {
            UNIX_EPOCH - offset
        }
    }
}
