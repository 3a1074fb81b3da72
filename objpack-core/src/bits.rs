//! Bit-length helpers used by the VarInt codec.

/// Integer widths the VarInt codec can measure.
pub trait BitLength: Copy {
    /// Number of bits needed to represent the value (0 for 0).
    fn bit_length(self) -> u32;

    /// Bytes needed to hold the value's bits plus `extra_bits` header bits.
    #[inline]
    fn byte_count(self, extra_bits: u32) -> u32 {
        (self.bit_length() + extra_bits).div_ceil(8)
    }
}

impl BitLength for u32 {
    #[inline]
    fn bit_length(self) -> u32 {
        u32::BITS - self.leading_zeros()
    }
}

impl BitLength for u64 {
    #[inline]
    fn bit_length(self) -> u32 {
        u64::BITS - self.leading_zeros()
    }
}

/// Number of bits needed to represent `x`; 0 for 0.
#[inline]
#[must_use]
pub fn bit_length<T: BitLength>(x: T) -> u32 {
    x.bit_length()
}

/// `ceil((bit_length(x) + extra_bits) / 8)`.
#[inline]
#[must_use]
pub fn byte_count<T: BitLength>(x: T, extra_bits: u32) -> u32 {
    x.byte_count(extra_bits)
}
