//! Bridges the native float types (and bit containers for the formats Rust
//! has no native type for) to the raw layouts described by `Semantics`.

use super::float::{Category, FloatBits, Semantics};
use super::float::{FP128, FP16, FP32, FP64, FP80};
use half::f16;

/// A binary floating point type that can be converted to and from text.
pub trait IeeeFloat: Copy {
    /// The layout of the encoding.
    const SEMANTICS: Semantics;

    /// Returns the encoding, right-aligned in a `u128`.
    fn to_raw(self) -> u128;

    /// Builds a value from an encoding produced by `to_raw`.
    fn from_raw(raw: u128) -> Self;

    /// Splits the value into its fields.
    fn to_float_bits(self) -> FloatBits {
        FloatBits::unpack(Self::SEMANTICS, self.to_raw())
    }

    /// Assembles a value from its fields.
    fn from_float_bits(bits: FloatBits) -> Self {
        Self::from_raw(bits.pack(Self::SEMANTICS))
    }
}

impl IeeeFloat for f16 {
    const SEMANTICS: Semantics = FP16;
    fn to_raw(self) -> u128 {
        self.to_bits() as u128
    }
    fn from_raw(raw: u128) -> Self {
        f16::from_bits(raw as u16)
    }
}

impl IeeeFloat for f32 {
    const SEMANTICS: Semantics = FP32;
    fn to_raw(self) -> u128 {
        self.to_bits() as u128
    }
    fn from_raw(raw: u128) -> Self {
        f32::from_bits(raw as u32)
    }
}

impl IeeeFloat for f64 {
    const SEMANTICS: Semantics = FP64;
    fn to_raw(self) -> u128 {
        self.to_bits() as u128
    }
    fn from_raw(raw: u128) -> Self {
        f64::from_bits(raw as u64)
    }
}

/// An x87 80-bit extended precision value, stored as raw bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct F80(u128);

/// An IEEE binary128 value, stored as raw bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct F128(u128);

impl F80 {
    /// Creates a value from the low 80 bits of `bits`.
    pub const fn from_bits(bits: u128) -> Self {
        F80(bits & ((1u128 << 80) - 1))
    }
    pub const fn to_bits(self) -> u128 {
        self.0
    }
    /// Creates a value from the sign/exponent word and the 64-bit
    /// significand (which includes the integer bit).
    pub const fn from_parts(sign_exponent: u16, significand: u64) -> Self {
        F80(((sign_exponent as u128) << 64) | significand as u128)
    }
    /// Converts a double. Every double is exactly representable.
    pub fn from_f64(val: f64) -> Self {
        F80(widen(FP64, val.to_bits() as u128, FP80))
    }
}

impl F128 {
    pub const fn from_bits(bits: u128) -> Self {
        F128(bits)
    }
    pub const fn to_bits(self) -> u128 {
        self.0
    }
    /// Converts a double. Every double is exactly representable.
    pub fn from_f64(val: f64) -> Self {
        F128(widen(FP64, val.to_bits() as u128, FP128))
    }
}

impl IeeeFloat for F80 {
    const SEMANTICS: Semantics = FP80;
    fn to_raw(self) -> u128 {
        self.0
    }
    fn from_raw(raw: u128) -> Self {
        F80::from_bits(raw)
    }
}

impl IeeeFloat for F128 {
    const SEMANTICS: Semantics = FP128;
    fn to_raw(self) -> u128 {
        self.0
    }
    fn from_raw(raw: u128) -> Self {
        F128(raw)
    }
}

/// Re-encode `raw` from the format `from` into the wider format `to`. The
/// target must have at least the precision and exponent range of the
/// source, so no rounding is needed.
fn widen(from: Semantics, raw: u128, to: Semantics) -> u128 {
    debug_assert!(to.get_precision() >= from.get_precision());
    debug_assert!(to.get_exponent_len() >= from.get_exponent_len());
    let bits = FloatBits::unpack(from, raw);
    let out = match bits.category(from) {
        Category::Zero => FloatBits::zero(bits.sign),
        Category::Infinity => FloatBits::infinity(to, bits.sign),
        Category::NaN(kind) => FloatBits::nan(to, bits.sign, kind),
        Category::Finite => {
            let (m, q) = bits.significand(from);
            // Align the leading bit of the significand to the target
            // precision. Denormals of the source are normal in the target.
            let msb = (u128::BITS - 1 - m.leading_zeros()) as i64;
            let shift = to.get_precision() as i64 - 1 - msb;
            let m = m << shift;
            let exp = q - shift + to.get_precision() as i64 - 1;
            let mut mantissa = m;
            if !to.explicit_bit {
                mantissa &= !(1u128 << (to.get_precision() - 1));
            }
            FloatBits {
                sign: bits.sign,
                biased_exponent: (exp + to.get_bias()) as u32,
                mantissa,
            }
        }
    };
    out.pack(to)
}

#[test]
fn test_native_round_trip() {
    for v in [0.0f64, -0.0, 1.5, f64::MAX, f64::from_bits(1), -3.25e-300] {
        let bits = v.to_float_bits();
        assert_eq!(f64::from_float_bits(bits).to_bits(), v.to_bits());
    }
    let h = f16::from_f32(0.333);
    assert_eq!(f16::from_raw(h.to_raw()), h);
    assert_eq!(f32::from_raw(2.5f32.to_raw()), 2.5);
}

#[test]
fn test_widen_to_extended() {
    assert_eq!(F80::from_f64(1.0), F80::from_parts(0x3fff, 1 << 63));
    assert_eq!(F80::from_f64(-2.0), F80::from_parts(0xc000, 1 << 63));
    assert_eq!(F80::from_f64(0.0), F80::from_parts(0, 0));
    assert_eq!(
        F80::from_f64(f64::INFINITY),
        F80::from_parts(0x7fff, 1 << 63)
    );
    // The smallest double denormal is normal in the extended format.
    let tiny = F80::from_f64(f64::from_bits(1));
    assert_eq!(tiny, F80::from_parts(0x3fff - 1074, 1 << 63));

    assert_eq!(F128::from_f64(1.0).to_bits(), 0x3fffu128 << 112);
    assert_eq!(
        F128::from_f64(1.5).to_bits(),
        (0x3fffu128 << 112) | (1u128 << 111)
    );
}
