//! Type tag bytes.
//!
//! Every encoded value starts with a one-byte tag selecting its variant:
//!
//! | Range    | Meaning                                      |
//! |----------|----------------------------------------------|
//! | 1-15     | scalars, boxed numerics, dates, records      |
//! | 20-28    | homogeneous primitive and string arrays      |
//! | 50-53    | heterogeneous array, list, map, set          |
//! | 60       | opaque serialized payload                    |
//! | 100-254  | caller-defined extension types               |
//! | 0xFF     | null                                         |
//!
//! Any other byte below 100 is rejected by the decoder.

use std::fmt;

/// First tag value reserved for caller-defined extensions.
pub const EXTENSION_TAG_MIN: u8 = 100;

/// Built-in type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    /// UTF-8 string via the string table.
    String = 1,
    /// Boolean.
    Bool = 2,
    /// UTF-16 code unit.
    Char = 3,
    /// Signed 8-bit integer.
    Byte = 4,
    /// Signed 16-bit integer.
    Short = 5,
    /// Signed 32-bit integer.
    Int = 6,
    /// Signed 64-bit integer.
    Long = 7,
    /// 32-bit float.
    Float = 8,
    /// 64-bit float.
    Double = 9,
    /// Atomic 32-bit integer.
    AtomicInt = 10,
    /// Atomic 64-bit integer.
    AtomicLong = 11,
    /// Arbitrary-precision decimal.
    BigDecimal = 12,
    /// Arbitrary-precision integer.
    BigInteger = 13,
    /// Date-like value.
    Date = 14,
    /// Self-describing user record.
    Record = 15,
    /// `bool[]`
    BoolArray = 20,
    /// `byte[]`
    ByteArray = 21,
    /// `char[]`
    CharArray = 22,
    /// `short[]`
    ShortArray = 23,
    /// `int[]`
    IntArray = 24,
    /// `long[]`
    LongArray = 25,
    /// `float[]`
    FloatArray = 26,
    /// `double[]`
    DoubleArray = 27,
    /// `String[]`
    StringArray = 28,
    /// Heterogeneous object array.
    Array = 50,
    /// Ordered list.
    List = 51,
    /// Key-value map.
    Map = 52,
    /// Set.
    Set = 53,
    /// Opaque serialized payload.
    Serialized = 60,
    /// Null.
    Null = 0xFF,
}

impl TypeTag {
    /// Parse a built-in tag. Returns `None` for unassigned and extension tags.
    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        let tag = match b {
            1 => Self::String,
            2 => Self::Bool,
            3 => Self::Char,
            4 => Self::Byte,
            5 => Self::Short,
            6 => Self::Int,
            7 => Self::Long,
            8 => Self::Float,
            9 => Self::Double,
            10 => Self::AtomicInt,
            11 => Self::AtomicLong,
            12 => Self::BigDecimal,
            13 => Self::BigInteger,
            14 => Self::Date,
            15 => Self::Record,
            20 => Self::BoolArray,
            21 => Self::ByteArray,
            22 => Self::CharArray,
            23 => Self::ShortArray,
            24 => Self::IntArray,
            25 => Self::LongArray,
            26 => Self::FloatArray,
            27 => Self::DoubleArray,
            28 => Self::StringArray,
            50 => Self::Array,
            51 => Self::List,
            52 => Self::Map,
            53 => Self::Set,
            60 => Self::Serialized,
            0xFF => Self::Null,
            _ => return None,
        };
        Some(tag)
    }

    /// The raw tag byte.
    #[inline]
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Short lowercase name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::AtomicInt => "atomic-int",
            Self::AtomicLong => "atomic-long",
            Self::BigDecimal => "big-decimal",
            Self::BigInteger => "big-integer",
            Self::Date => "date",
            Self::Record => "record",
            Self::BoolArray => "bool[]",
            Self::ByteArray => "byte[]",
            Self::CharArray => "char[]",
            Self::ShortArray => "short[]",
            Self::IntArray => "int[]",
            Self::LongArray => "long[]",
            Self::FloatArray => "float[]",
            Self::DoubleArray => "double[]",
            Self::StringArray => "string[]",
            Self::Array => "array",
            Self::List => "list",
            Self::Map => "map",
            Self::Set => "set",
            Self::Serialized => "serialized",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.byte())
    }
}

/// Whether `b` lies in the caller-defined extension range.
///
/// `0xFF` is null, not an extension.
#[inline]
#[must_use]
pub const fn is_extension_tag(b: u8) -> bool {
    b >= EXTENSION_TAG_MIN && b != TypeTag::Null as u8
}
