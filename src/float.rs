//! Describes the binary interchange formats, the rounding modes, and the raw
//! bit decomposition of a floating point value.

use super::utils::mask;

/// Defines the supported rounding modes.
/// See IEEE754-2019 Section 4.3 Rounding-direction attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    #[default]
    NearestTiesToEven,
    NearestTiesToAway,
    Zero,
    Positive,
    Negative,
}

impl RoundingMode {
    /// Returns the name of the rounding mode.
    pub fn as_string(&self) -> &'static str {
        match self {
            RoundingMode::NearestTiesToEven => "NearestTiesToEven",
            RoundingMode::NearestTiesToAway => "NearestTiesToAway",
            RoundingMode::Zero => "Zero",
            RoundingMode::Positive => "Positive",
            RoundingMode::Negative => "Negative",
        }
    }

    /// Parses the name returned by `as_string`.
    pub fn from_string(name: &str) -> Option<Self> {
        match name {
            "NearestTiesToEven" => Some(RoundingMode::NearestTiesToEven),
            "NearestTiesToAway" => Some(RoundingMode::NearestTiesToAway),
            "Zero" => Some(RoundingMode::Zero),
            "Positive" => Some(RoundingMode::Positive),
            "Negative" => Some(RoundingMode::Negative),
            _ => None,
        }
    }

    /// Returns true if the truncated magnitude needs to be incremented (moved
    /// away from zero). `negative` is the sign of the value, `odd` is the
    /// parity of the last kept digit (or bit), and `loss` describes what was
    /// cut off.
    pub(crate) fn need_round_away_from_zero(
        &self,
        negative: bool,
        odd: bool,
        loss: LossFraction,
    ) -> bool {
        if loss.is_exactly_zero() {
            return false;
        }
        match self {
            RoundingMode::Positive => !negative,
            RoundingMode::Negative => negative,
            RoundingMode::Zero => false,
            RoundingMode::NearestTiesToAway => loss.is_gte_half(),
            RoundingMode::NearestTiesToEven => {
                if loss.is_mt_half() {
                    return true;
                }
                loss.is_exactly_half() && odd
            }
        }
    }
}

/// Reports the kind of value that is lost when digits or bits are cut off.
/// In some context this is used as the guard and sticky bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LossFraction {
    ExactlyZero,  //0000000
    LessThanHalf, //0xxxxxx
    ExactlyHalf,  //1000000
    MoreThanHalf, //1xxxxxx
}

impl LossFraction {
    pub fn is_exactly_zero(&self) -> bool {
        matches!(self, Self::ExactlyZero)
    }
    pub fn is_exactly_half(&self) -> bool {
        matches!(self, Self::ExactlyHalf)
    }
    pub fn is_mt_half(&self) -> bool {
        matches!(self, Self::MoreThanHalf)
    }
    pub fn is_gte_half(&self) -> bool {
        self.is_mt_half() || self.is_exactly_half()
    }

    /// Classify the cut from the first dropped digit `first` (in a radix
    /// whose half is `half`) and whether anything below it is nonzero.
    pub fn from_digits(first: u64, rest_nonzero: bool, half: u64) -> Self {
        if first == 0 && !rest_nonzero {
            return LossFraction::ExactlyZero;
        }
        if first < half {
            return LossFraction::LessThanHalf;
        }
        if first == half && !rest_nonzero {
            return LossFraction::ExactlyHalf;
        }
        LossFraction::MoreThanHalf
    }

    /// Classify the dropped low bits `low` against the half-way value `half`
    /// (a single bit), with `sticky` reporting nonzero bits below `low`.
    pub fn from_bits(low: u128, half: u128, sticky: bool) -> Self {
        if low == 0 && !sticky {
            return LossFraction::ExactlyZero;
        }
        match low.cmp(&half) {
            core::cmp::Ordering::Less => LossFraction::LessThanHalf,
            core::cmp::Ordering::Equal if !sticky => LossFraction::ExactlyHalf,
            _ => LossFraction::MoreThanHalf,
        }
    }
}

#[test]
fn test_loss_classification() {
    assert!(LossFraction::from_digits(0, false, 5).is_exactly_zero());
    assert_eq!(
        LossFraction::from_digits(0, true, 5),
        LossFraction::LessThanHalf
    );
    assert_eq!(
        LossFraction::from_digits(4, true, 5),
        LossFraction::LessThanHalf
    );
    assert!(LossFraction::from_digits(5, false, 5).is_exactly_half());
    assert!(LossFraction::from_digits(5, true, 5).is_mt_half());
    assert!(LossFraction::from_digits(9, false, 8).is_mt_half());

    assert!(LossFraction::from_bits(0b000, 0b100, false).is_exactly_zero());
    assert!(LossFraction::from_bits(0b100, 0b100, false).is_exactly_half());
    assert!(LossFraction::from_bits(0b100, 0b100, true).is_mt_half());
    assert!(LossFraction::from_bits(0b101, 0b100, false).is_mt_half());
    assert_eq!(
        LossFraction::from_bits(0, 0b100, true),
        LossFraction::LessThanHalf
    );
}

#[test]
fn test_round_away_decisions() {
    use LossFraction::*;
    use RoundingMode::*;

    assert!(!NearestTiesToEven.need_round_away_from_zero(false, false, ExactlyHalf));
    assert!(NearestTiesToEven.need_round_away_from_zero(false, true, ExactlyHalf));
    assert!(NearestTiesToAway.need_round_away_from_zero(true, false, ExactlyHalf));
    assert!(!NearestTiesToEven.need_round_away_from_zero(false, true, LessThanHalf));
    assert!(Positive.need_round_away_from_zero(false, false, LessThanHalf));
    assert!(!Positive.need_round_away_from_zero(true, false, MoreThanHalf));
    assert!(Negative.need_round_away_from_zero(true, false, LessThanHalf));
    assert!(!Zero.need_round_away_from_zero(true, true, MoreThanHalf));
    assert!(!Positive.need_round_away_from_zero(false, false, ExactlyZero));

    for rm in [NearestTiesToEven, NearestTiesToAway, Zero, Positive, Negative]
    {
        assert_eq!(RoundingMode::from_string(rm.as_string()), Some(rm));
    }
    assert_eq!(RoundingMode::from_string("Up"), None);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantics {
    /// The number of bits that define the range of the exponent.
    pub exponent: usize,
    /// The number of bits in the significand (including the leading bit).
    pub precision: usize,
    /// True when the leading significand bit is stored (x87 extended).
    pub explicit_bit: bool,
}

impl Semantics {
    pub const fn new(exponent: usize, precision: usize) -> Self {
        Semantics {
            exponent,
            precision,
            explicit_bit: false,
        }
    }

    /// A format that stores the leading significand bit explicitly.
    pub const fn with_explicit_bit(exponent: usize, precision: usize) -> Self {
        Semantics {
            exponent,
            precision,
            explicit_bit: true,
        }
    }

    /// Returns the precision in bits.
    pub fn get_precision(&self) -> usize {
        self.precision
    }

    /// Returns the length of the exponent in bits, which defines the valid
    /// range.
    pub fn get_exponent_len(&self) -> usize {
        self.exponent
    }

    /// Returns the width of the stored significand field.
    pub fn get_fraction_len(&self) -> usize {
        if self.explicit_bit {
            self.precision
        } else {
            self.precision - 1
        }
    }

    /// Returns the total number of bits in the encoding.
    pub fn get_total_len(&self) -> usize {
        1 + self.exponent + self.get_fraction_len()
    }

    /// Returns the exponent bias for the number, as a positive number.
    /// https://en.wikipedia.org/wiki/IEEE_754#Basic_and_interchange_formats
    pub fn get_bias(&self) -> i64 {
        let e = self.get_exponent_len();
        ((1u64 << (e - 1)) - 1) as i64
    }

    /// Returns the lower and upper bounds of the unbiased exponent of normal
    /// numbers.
    pub fn get_exp_bounds(&self) -> (i64, i64) {
        let bias = self.get_bias();
        (1 - bias, bias)
    }

    /// Returns the number of significant decimal digits that guarantee that
    /// printing and parsing a value restores it exactly.
    pub fn decimal_accuracy(&self) -> usize {
        // Matula, David W. “A Formalization of Floating-Point Numeric Base
        // N = 2 + floor(n / log_b(B)) = 2 + floor(n / log(10, 2))
        // We convert from bits to base-10 digits: log(2)/log(10) ==> 59/196.
        // A continuous fraction of 5 iteration gives the ratio.
        2 + (self.precision * 59) / 196
    }
}

// IEEE 754-2019
// Table 3.5: Binary interchange format parameters.

/// Predefined FP16 float with 5 exponent bits, and 10 mantissa bits.
pub const FP16: Semantics = Semantics::new(5, 11);
/// Predefined FP32 float with 8 exponent bits, and 23 mantissa bits.
pub const FP32: Semantics = Semantics::new(8, 24);
/// Predefined FP64 float with 11 exponent bits, and 52 mantissa bits.
pub const FP64: Semantics = Semantics::new(11, 53);
/// The x87 extended format: 15 exponent bits, and a 64-bit significand
/// with an explicit integer bit.
pub const FP80: Semantics = Semantics::with_explicit_bit(15, 64);
/// Predefined FP128 float with 15 exponent bits, and 112 mantissa bits.
pub const FP128: Semantics = Semantics::new(15, 113);

#[test]
fn test_semantics_layout() {
    assert_eq!(FP16.get_total_len(), 16);
    assert_eq!(FP32.get_total_len(), 32);
    assert_eq!(FP64.get_total_len(), 64);
    assert_eq!(FP80.get_total_len(), 80);
    assert_eq!(FP128.get_total_len(), 128);
    assert_eq!(FP64.get_bias(), 1023);
    assert_eq!(FP64.get_exp_bounds(), (-1022, 1023));
    assert_eq!(FP80.get_fraction_len(), 64);
}

#[test]
fn test_decimal_accuracy_for_type() {
    assert_eq!(FP16.decimal_accuracy(), 5);
    assert_eq!(FP32.decimal_accuracy(), 9);
    assert_eq!(FP64.decimal_accuracy(), 17);
    assert_eq!(FP80.decimal_accuracy(), 21);
    assert_eq!(FP128.decimal_accuracy(), 36);
}

/// The NaN spellings. IEEE leaves the payload unspecified; the three kinds
/// are a textual convention: `nan`, `-nan(ind)` and `nan(snan)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NanKind {
    Quiet,
    Indeterminate,
    Signaling,
}

/// Declare the different categories of the floating point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Infinity,
    NaN(NanKind),
    Finite,
    Zero,
}

/// The fields of an encoded float, extracted from (or ready to be packed
/// into) the native bit layout described by a [`Semantics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatBits {
    pub sign: bool,
    pub biased_exponent: u32,
    /// The stored significand field (including the integer bit for
    /// formats that keep it explicitly).
    pub mantissa: u128,
}

impl FloatBits {
    /// Split the raw encoding `raw` into its fields.
    pub fn unpack(sem: Semantics, raw: u128) -> Self {
        let frac_len = sem.get_fraction_len();
        let exp_len = sem.get_exponent_len();
        let mantissa = raw & mask(frac_len);
        let biased_exponent = ((raw >> frac_len) & mask(exp_len)) as u32;
        let sign = (raw >> (frac_len + exp_len)) & 1 == 1;
        FloatBits {
            sign,
            biased_exponent,
            mantissa,
        }
    }

    /// Reassemble the fields into the raw encoding.
    pub fn pack(&self, sem: Semantics) -> u128 {
        let frac_len = sem.get_fraction_len();
        let exp_len = sem.get_exponent_len();
        debug_assert!(self.mantissa <= mask(frac_len));
        debug_assert!((self.biased_exponent as u128) <= mask(exp_len));
        let mut bits = self.sign as u128;
        bits <<= exp_len;
        bits |= self.biased_exponent as u128;
        bits <<= frac_len;
        bits | self.mantissa
    }

    /// Returns a signed zero.
    pub fn zero(negative: bool) -> Self {
        FloatBits {
            sign: negative,
            biased_exponent: 0,
            mantissa: 0,
        }
    }

    /// Returns a signed infinity.
    pub fn infinity(sem: Semantics, negative: bool) -> Self {
        FloatBits {
            sign: negative,
            biased_exponent: mask(sem.get_exponent_len()) as u32,
            mantissa: Self::integer_bit(sem),
        }
    }

    /// Returns the largest finite magnitude with the sign `negative`.
    pub fn max_finite(sem: Semantics, negative: bool) -> Self {
        FloatBits {
            sign: negative,
            biased_exponent: (mask(sem.get_exponent_len()) - 1) as u32,
            mantissa: mask(sem.get_fraction_len()),
        }
    }

    /// Returns the canonical NaN encoding for the spelling `kind`.
    pub fn nan(sem: Semantics, negative: bool, kind: NanKind) -> Self {
        let quiet_bit = 1u128 << (sem.get_precision() - 2);
        let payload = match kind {
            NanKind::Quiet => quiet_bit,
            NanKind::Indeterminate => quiet_bit,
            NanKind::Signaling => 1,
        };
        let negative = negative || kind == NanKind::Indeterminate;
        FloatBits {
            sign: negative,
            biased_exponent: mask(sem.get_exponent_len()) as u32,
            mantissa: payload | Self::integer_bit(sem),
        }
    }

    // The stored integer bit of infinities and NaNs in explicit formats.
    fn integer_bit(sem: Semantics) -> u128 {
        if sem.explicit_bit {
            1u128 << (sem.get_precision() - 1)
        } else {
            0
        }
    }

    // The significand bits that carry the value (or the NaN payload).
    fn payload(&self, sem: Semantics) -> u128 {
        self.mantissa & mask(sem.get_precision() - 1)
    }

    /// Classify the encoded value.
    pub fn category(&self, sem: Semantics) -> Category {
        let max_exp = mask(sem.get_exponent_len()) as u32;
        if self.biased_exponent == max_exp {
            let payload = self.payload(sem);
            if payload == 0 {
                return Category::Infinity;
            }
            let quiet = (payload >> (sem.get_precision() - 2)) & 1 == 1;
            let kind = match (quiet, self.sign) {
                (false, _) => NanKind::Signaling,
                (true, true) => NanKind::Indeterminate,
                (true, false) => NanKind::Quiet,
            };
            return Category::NaN(kind);
        }
        if self.significand(sem).0 == 0 {
            return Category::Zero;
        }
        Category::Finite
    }

    /// Returns the integer significand `m` and the binary exponent `q` such
    /// that the finite value is `m * 2^q`.
    pub fn significand(&self, sem: Semantics) -> (u128, i64) {
        let shift = sem.get_precision() as i64 - 1;
        let exp = (self.biased_exponent.max(1)) as i64 - sem.get_bias();
        let mut m = self.mantissa;
        // Add the implicit bit for normal numbers.
        if !sem.explicit_bit && self.biased_exponent != 0 {
            m |= 1u128 << shift;
        }
        (m, exp - shift)
    }
}

#[test]
fn test_unpack_pack_f64() {
    let raw = (-1.5f64).to_bits() as u128;
    let bits = FloatBits::unpack(FP64, raw);
    assert!(bits.sign);
    assert_eq!(bits.biased_exponent, 1023);
    assert_eq!(bits.mantissa, 1 << 51);
    assert_eq!(bits.pack(FP64), raw);
    assert_eq!(bits.category(FP64), Category::Finite);
    assert_eq!(bits.significand(FP64), (3 << 51, -52));
}

#[test]
fn test_special_categories() {
    let inf = FloatBits::unpack(FP32, f32::INFINITY.to_bits() as u128);
    assert_eq!(inf.category(FP32), Category::Infinity);
    assert_eq!(FloatBits::infinity(FP32, false), inf);

    let nan = FloatBits::unpack(FP64, f64::NAN.to_bits() as u128);
    assert_eq!(nan.category(FP64), Category::NaN(NanKind::Quiet));
    let ind = FloatBits::unpack(FP64, (-f64::NAN).to_bits() as u128);
    assert_eq!(ind.category(FP64), Category::NaN(NanKind::Indeterminate));
    let snan = FloatBits::nan(FP64, false, NanKind::Signaling);
    assert_eq!(snan.category(FP64), Category::NaN(NanKind::Signaling));
    assert_eq!(snan.pack(FP64), 0x7ff0_0000_0000_0001);

    let zero = FloatBits::unpack(FP16, 0x8000);
    assert_eq!(zero.category(FP16), Category::Zero);
    assert!(zero.sign);

    // Denormals have no implicit bit and use the minimum exponent.
    let tiny = FloatBits::unpack(FP64, 1);
    assert_eq!(tiny.category(FP64), Category::Finite);
    assert_eq!(tiny.significand(FP64), (1, -1074));
}

#[test]
fn test_explicit_integer_bit() {
    // 1.0 in x87 extended precision: exponent 0x3fff, significand 1<<63.
    let raw = (0x3fffu128 << 64) | (1u128 << 63);
    let bits = FloatBits::unpack(FP80, raw);
    assert_eq!(bits.category(FP80), Category::Finite);
    assert_eq!(bits.significand(FP80), (1 << 63, -63));
    assert_eq!(bits.pack(FP80), raw);

    let inf = FloatBits::infinity(FP80, true);
    assert_eq!(inf.category(FP80), Category::Infinity);
    assert_eq!(inf.pack(FP80), (0xffffu128 << 64) | (1u128 << 63));

    let qnan = FloatBits::nan(FP80, false, NanKind::Quiet);
    assert_eq!(qnan.mantissa, 0xc000_0000_0000_0000);
    assert_eq!(qnan.category(FP80), Category::NaN(NanKind::Quiet));
}

#[test]
fn test_max_finite() {
    let max = FloatBits::max_finite(FP64, false).pack(FP64);
    assert_eq!(f64::from_bits(max as u64), f64::MAX);
    let min = FloatBits::max_finite(FP32, true).pack(FP32);
    assert_eq!(f32::from_bits(min as u32), f32::MIN);
}
