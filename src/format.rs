//! The configuration of a conversion: the notation flags, the precision and
//! the rounding mode.

use super::bigint::Radix;
use super::float::{RoundingMode, Semantics};
use core::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of options that select the notation and the spelling of a numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FormatFlags(u16);

impl FormatFlags {
    /// No flags. Same as `NORMAL` for the notation.
    pub const NONE: FormatFlags = FormatFlags(0);
    /// Positional notation: `123.456`.
    pub const NORMAL: FormatFlags = FormatFlags(1 << 0);
    /// Scientific notation: `1.23456e+02`.
    pub const SCIENTIFIC: FormatFlags = FormatFlags(1 << 1);
    /// Pick normal or scientific notation, whichever is shorter (`%g`).
    pub const GENERAL: FormatFlags = FormatFlags(1 << 0 | 1 << 1);
    /// Hex digits with a hex exponent: `1.8s+00`.
    pub const HEX_MANTISSA: FormatFlags = FormatFlags(1 << 2);
    /// Hex digits with a binary exponent: `1.8p+00`.
    pub const HEX_FLOAT: FormatFlags = FormatFlags(1 << 3);
    /// Upper case digits, markers and special values.
    pub const UPPERCASE: FormatFlags = FormatFlags(1 << 4);
    /// Always print the radix point.
    pub const FORCE_POINT: FormatFlags = FormatFlags(1 << 5);
    /// Print every digit of the exact value. The precision is ignored.
    pub const EXACT: FormatFlags = FormatFlags(1 << 6);
    /// Remove trailing zeros of the fraction.
    pub const TRIM_ZEROS: FormatFlags = FormatFlags(1 << 7);
    /// Do not pad the exponent to two digits.
    pub const NO_EXP_PAD: FormatFlags = FormatFlags(1 << 8);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn from_bits(bits: u16) -> Self {
        FormatFlags(bits & 0x1ff)
    }

    /// Returns true if all of the flags in `other` are set.
    pub const fn contains(self, other: FormatFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: FormatFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: FormatFlags) {
        self.0 &= !other.0;
    }

    /// Returns true if both notation bits are set.
    pub(crate) fn is_general(self) -> bool {
        self.contains(Self::GENERAL) && !self.is_hex_float()
    }

    /// Returns true if the scientific notation is requested without the
    /// normal notation. Hex-float numerals always use the scientific shape.
    pub(crate) fn is_scientific(self) -> bool {
        if self.is_hex_float() {
            return true;
        }
        self.contains(Self::SCIENTIFIC) && !self.contains(Self::NORMAL)
    }

    /// Returns true if the exponent is written as a power of two.
    pub(crate) fn is_hex_float(self) -> bool {
        self.contains(Self::HEX_FLOAT)
    }

    /// Returns the radix of the digits.
    pub fn radix(self) -> Radix {
        if self.contains(Self::HEX_MANTISSA) || self.contains(Self::HEX_FLOAT)
        {
            Radix::Hex
        } else {
            Radix::Decimal
        }
    }
}

impl BitOr for FormatFlags {
    type Output = FormatFlags;
    fn bitor(self, rhs: Self) -> Self {
        FormatFlags(self.0 | rhs.0)
    }
}

impl BitAnd for FormatFlags {
    type Output = FormatFlags;
    fn bitand(self, rhs: Self) -> Self {
        FormatFlags(self.0 & rhs.0)
    }
}

impl BitOrAssign for FormatFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[test]
fn test_flag_set() {
    let mut f = FormatFlags::SCIENTIFIC | FormatFlags::UPPERCASE;
    assert!(f.contains(FormatFlags::SCIENTIFIC));
    assert!(!f.contains(FormatFlags::GENERAL));
    assert!(f.is_scientific());
    f.insert(FormatFlags::NORMAL);
    assert!(f.is_general());
    assert!(!f.is_scientific());
    f.remove(FormatFlags::UPPERCASE);
    assert_eq!(f, FormatFlags::GENERAL);
    assert_eq!(f.radix(), Radix::Decimal);
    f |= FormatFlags::HEX_FLOAT;
    assert_eq!(f.radix(), Radix::Hex);
    assert_eq!(f & FormatFlags::HEX_FLOAT, FormatFlags::HEX_FLOAT);
    assert!(FormatFlags::HEX_FLOAT.is_scientific());
    assert_eq!(FormatFlags::from_bits(0xffff).bits(), 0x1ff);
}

/// Describes how a value is written, or how a numeral is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    pub flags: FormatFlags,
    /// The number of digits. For normal notation this is the number of
    /// fraction digits. For scientific notation this is the number of
    /// digits after the point. For general notation this is the number of
    /// significant digits.
    pub precision: usize,
    pub rounding: RoundingMode,
}

impl Default for Format {
    /// The `%g` defaults, with trailing zeros removed.
    fn default() -> Self {
        let flags = FormatFlags::GENERAL | FormatFlags::TRIM_ZEROS;
        Format::general(6).with_flags(flags)
    }
}

const NEAREST: RoundingMode = RoundingMode::NearestTiesToEven;

impl Format {
    pub const fn new(
        flags: FormatFlags,
        precision: usize,
        rounding: RoundingMode,
    ) -> Self {
        Format {
            flags,
            precision,
            rounding,
        }
    }

    /// Positional notation with `precision` fraction digits.
    pub const fn normal(precision: usize) -> Self {
        Self::new(FormatFlags::NORMAL, precision, NEAREST)
    }

    /// Scientific notation with `precision` digits after the point.
    pub const fn scientific(precision: usize) -> Self {
        Self::new(FormatFlags::SCIENTIFIC, precision, NEAREST)
    }

    /// The shorter of the normal and scientific notations, with `precision`
    /// significant digits.
    pub const fn general(precision: usize) -> Self {
        Self::new(FormatFlags::GENERAL, precision, NEAREST)
    }

    /// Hex digits with a binary exponent, with `precision` hex digits after
    /// the point.
    pub const fn hex_float(precision: usize) -> Self {
        let flags =
            FormatFlags(FormatFlags::SCIENTIFIC.0 | FormatFlags::HEX_FLOAT.0);
        Self::new(flags, precision, NEAREST)
    }

    /// Every digit of the exact value, in positional notation.
    pub const fn exact() -> Self {
        let flags = FormatFlags(FormatFlags::NORMAL.0 | FormatFlags::EXACT.0);
        Self::new(flags, 0, NEAREST)
    }

    /// The shortest general format that is guaranteed to restore a value of
    /// the format `sem` when the text is parsed back.
    pub fn round_trip(sem: Semantics) -> Self {
        let flags = FormatFlags::GENERAL | FormatFlags::TRIM_ZEROS;
        Self::general(sem.decimal_accuracy()).with_flags(flags)
    }

    pub const fn with_flags(mut self, flags: FormatFlags) -> Self {
        self.flags = flags;
        self
    }

    pub const fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub const fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub(crate) fn has(&self, flag: FormatFlags) -> bool {
        self.flags.contains(flag)
    }

    pub(crate) fn radix(&self) -> Radix {
        self.flags.radix()
    }
}

#[test]
fn test_format_builders() {
    use super::float::FP64;
    let f = Format::default();
    assert!(f.flags.is_general());
    assert!(f.has(FormatFlags::TRIM_ZEROS));
    assert_eq!(f.precision, 6);
    assert_eq!(f.rounding, RoundingMode::NearestTiesToEven);

    let f = Format::scientific(3).with_rounding(RoundingMode::Zero);
    assert!(f.flags.is_scientific());
    assert_eq!(f.rounding, RoundingMode::Zero);

    let f = Format::round_trip(FP64);
    assert_eq!(f.precision, 17);
    assert!(f.flags.is_general());

    let f = Format::hex_float(4).with_precision(2);
    assert!(f.flags.is_hex_float());
    assert_eq!(f.precision, 2);
    assert_eq!(f.radix(), Radix::Hex);

    assert!(Format::exact().has(FormatFlags::EXACT));
}
