//! Reduces an exact big-radix value to the nearest binary float. The bits
//! of the integer part are extracted by halving, and the bits of the
//! fraction by doubling. The leading bits are collected in a 128-bit window,
//! and anything below the window is kept as a sticky bit.

use super::bigint::{BigRadixFrac, BigRadixInt, Radix};
use super::float::{FloatBits, LossFraction, RoundingMode, Semantics};
use super::utils::mask;

/// The result of the reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Reduced {
    pub bits: FloatBits,
    /// Set when the magnitude exceeded the exponent range of the format.
    pub overflowed: bool,
}

/// Returns the value that an overflow is rounded to: an infinity, or the
/// largest finite value when the rounding mode points toward zero.
pub(crate) fn overflow(sem: Semantics, negative: bool, rm: RoundingMode) -> Reduced {
    let inf = FloatBits::infinity(sem, negative);
    let max = FloatBits::max_finite(sem, negative);
    let bits = match rm {
        RoundingMode::NearestTiesToEven => inf,
        RoundingMode::NearestTiesToAway => inf,
        RoundingMode::Zero => max,
        RoundingMode::Positive => {
            if negative {
                max
            } else {
                inf
            }
        }
        RoundingMode::Negative => {
            if negative {
                inf
            } else {
                max
            }
        }
    };
    Reduced {
        bits,
        overflowed: true,
    }
}

/// Returns the value that a magnitude below half of the smallest denormal
/// is rounded to: a signed zero, or the smallest denormal when the rounding
/// mode points away from zero.
pub(crate) fn underflow(negative: bool, rm: RoundingMode) -> Reduced {
    let away = rm.need_round_away_from_zero(negative, false, LossFraction::LessThanHalf);
    Reduced {
        bits: FloatBits {
            sign: negative,
            biased_exponent: 0,
            mantissa: away as u128,
        },
        overflowed: false,
    }
}

/// The position of a value relative to the exponent range of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Range {
    /// At least 2^(emax+1): the value overflows in every rounding mode.
    Above,
    /// Below half of the smallest denormal.
    Below,
    /// Needs the full reduction.
    Inside,
}

/// Classify a nonzero value whose leading digit has the weight B^lead. The
/// bounds are rounded outward, so `Inside` may still overflow or underflow.
pub(crate) fn classify(lead: i64, radix: Radix, sem: Semantics) -> Range {
    let p = sem.get_precision() as i64;
    let (emin, emax) = sem.get_exp_bounds();
    let (lo, hi) = match radix {
        // 59/196 is slightly below log10(2).
        Radix::Decimal => ((emin - p) * 59 / 196 - 3, (emax + 1) * 59 / 196 + 1),
        Radix::Hex => ((emin - p) / 4 - 2, (emax + 1) / 4 + 1),
    };
    if lead > hi {
        Range::Above
    } else if lead < lo {
        Range::Below
    } else {
        Range::Inside
    }
}

/// Convert the value `(int + frac) * 2^scale` with the sign `negative` to
/// the format `sem`, rounding with `rm`.
pub(crate) fn reduce<const N: usize>(
    mut int: BigRadixInt<N>,
    mut frac: BigRadixFrac<N>,
    scale: i64,
    negative: bool,
    sem: Semantics,
    rm: RoundingMode,
) -> Reduced {
    let p = sem.get_precision() as i64;
    let (emin, emax) = sem.get_exp_bounds();

    if int.is_zero() && frac.is_zero() {
        return Reduced {
            bits: FloatBits::zero(negative),
            overflowed: false,
        };
    }

    // Bit 127 of the window has the weight 2^exp.
    let mut window: u128 = 0;
    let mut sticky = false;
    let exp: i64;
    let mut filled: usize;

    if !int.is_zero() {
        let mut n: i64 = 0;
        while !int.is_zero() {
            let bit = int.halve() as u128;
            sticky |= window & 1 == 1;
            window = (window >> 1) | (bit << 127);
            n += 1;
        }
        exp = n - 1 + scale;
        if exp > emax {
            return overflow(sem, negative, rm);
        }
        filled = n.min(128) as usize;
    } else {
        // Find the leading one of the fraction.
        let mut e = -1;
        loop {
            if frac.double() == 1 {
                window = 1 << 127;
                filled = 1;
                break;
            }
            e -= 1;
            // The value is below half of the smallest denormal.
            if e + scale < emin - p {
                sticky = true;
                filled = 128;
                break;
            }
        }
        exp = e + scale;
    }

    while filled < 128 {
        let bit = frac.double() as u128;
        window |= bit << (127 - filled);
        filled += 1;
    }
    sticky |= !frac.is_zero();

    round_window(window, sticky, exp, negative, sem, rm)
}

/// Round the window (with the leading bit weight 2^exp) to the precision of
/// `sem`, and assemble the fields.
fn round_window(
    window: u128,
    sticky: bool,
    exp: i64,
    negative: bool,
    sem: Semantics,
    rm: RoundingMode,
) -> Reduced {
    let p = sem.get_precision() as i64;
    let (emin, emax) = sem.get_exp_bounds();

    // The weight of the last bit of the significand, and its index in the
    // window. Denormals have fewer bits.
    let mut lsb_exp = exp.max(emin) - (p - 1);
    let k = lsb_exp - exp + 127;

    let (mut mantissa, loss) = if k >= 129 {
        (0, LossFraction::from_bits(0, 1, sticky || window != 0))
    } else if k == 128 {
        (0, LossFraction::from_bits(window, 1 << 127, sticky))
    } else {
        let k = k as usize;
        let low = window & mask(k);
        (window >> k, LossFraction::from_bits(low, 1 << (k - 1), sticky))
    };

    let odd = mantissa & 1 == 1;
    if rm.need_round_away_from_zero(negative, odd, loss) {
        mantissa += 1;
        if mantissa == 1 << p {
            mantissa >>= 1;
            lsb_exp += 1;
        }
    }

    let leading = 1u128 << (p - 1);
    if mantissa & leading == 0 {
        // A denormal, or a zero after an underflow.
        return Reduced {
            bits: FloatBits {
                sign: negative,
                biased_exponent: 0,
                mantissa,
            },
            overflowed: false,
        };
    }

    let top_exp = lsb_exp + p - 1;
    if top_exp > emax {
        return overflow(sem, negative, rm);
    }
    if !sem.explicit_bit {
        mantissa &= !leading;
    }
    Reduced {
        bits: FloatBits {
            sign: negative,
            biased_exponent: (top_exp + sem.get_bias()) as u32,
            mantissa,
        },
        overflowed: false,
    }
}

#[cfg(test)]
fn reduce_text(
    digits: &str,
    shift: i64,
    sem: Semantics,
    rm: RoundingMode,
) -> Reduced {
    use super::bigint::Radix;
    let mut int = BigRadixInt::<64>::new(Radix::Decimal);
    let mut frac = BigRadixFrac::<64>::new(Radix::Decimal);
    int.from_chars(digits.as_bytes(), shift).unwrap();
    frac.from_chars(digits.as_bytes(), shift).unwrap();
    reduce(int, frac, 0, false, sem, rm)
}

#[cfg(test)]
fn reduce_f64(digits: &str, shift: i64) -> f64 {
    use super::float::FP64;
    let r = reduce_text(digits, shift, FP64, RoundingMode::NearestTiesToEven);
    assert!(!r.overflowed);
    f64::from_bits(r.bits.pack(FP64) as u64)
}

#[test]
fn test_reduce_simple() {
    assert_eq!(reduce_f64("26", 0), 26.0);
    assert_eq!(reduce_f64("0.1", 0), 0.1);
    assert_eq!(reduce_f64("1.5", 0), 1.5);
    assert_eq!(reduce_f64("123.456", 0), 123.456);
    assert_eq!(reduce_f64("0", 0), 0.0);
    assert_eq!(reduce_f64("17976931348623157", 292), f64::MAX);
    assert_eq!(reduce_f64("22250738585072014", -324), f64::MIN_POSITIVE);
    assert_eq!(reduce_f64("9007199254740993", 0), 9007199254740992.0);
    assert_eq!(reduce_f64("9007199254740995", 0), 9007199254740996.0);
}

#[test]
fn test_reduce_matches_std() {
    let cases = [
        "3.141592653589793238462643383279",
        "2.718281828459045",
        "0.30000000000000004",
        "1e22",
        "123456789012345678901234567890",
        "4.9e-324",
        "2.4703282292062328e-324",
        "2.4703282292062327e-324",
        "1e-320",
        "2.2250738585072011e-308",
        "1.7976931348623158e308",
        "0.000000000000000000000000000001",
    ];
    for case in cases {
        let (mantissa, exp) = match case.split_once('e') {
            Some((m, e)) => (m, e.parse::<i64>().unwrap()),
            None => (case, 0),
        };
        let expected: f64 = case.parse().unwrap();
        assert_eq!(reduce_f64(mantissa, exp).to_bits(), expected.to_bits(), "{}", case);
    }
}

#[test]
fn test_reduce_ties_f32() {
    use super::float::FP32;
    let nearest = RoundingMode::NearestTiesToEven;
    let to_f32 = |r: Reduced| f32::from_bits(r.bits.pack(FP32) as u32);
    assert_eq!(to_f32(reduce_text("16777217", 0, FP32, nearest)), 16777216.0);
    assert_eq!(to_f32(reduce_text("16777219", 0, FP32, nearest)), 16777220.0);
    let away = RoundingMode::NearestTiesToAway;
    assert_eq!(to_f32(reduce_text("16777217", 0, FP32, away)), 16777218.0);
    let up = RoundingMode::Positive;
    assert_eq!(to_f32(reduce_text("16777216.001", 0, FP32, up)), 16777218.0);
    let zero = RoundingMode::Zero;
    assert_eq!(to_f32(reduce_text("16777217.999", 0, FP32, zero)), 16777216.0);
}

#[test]
fn test_reduce_overflow_and_underflow() {
    use super::float::FP64;
    let nearest = RoundingMode::NearestTiesToEven;

    let r = reduce_text("18", 307, FP64, nearest);
    assert!(r.overflowed);
    assert_eq!(f64::from_bits(r.bits.pack(FP64) as u64), f64::INFINITY);

    let r = reduce_text("18", 307, FP64, RoundingMode::Zero);
    assert!(r.overflowed);
    assert_eq!(f64::from_bits(r.bits.pack(FP64) as u64), f64::MAX);

    // Rounding up the largest finite value overflows.
    let r = reduce_text("17976931348623158", 292, FP64, RoundingMode::Positive);
    assert!(r.overflowed);

    let r = reduce_text("1", -400, FP64, nearest);
    assert!(!r.overflowed);
    assert_eq!(r.bits, FloatBits::zero(false));

    // Away from zero, the tiniest value rounds to the smallest denormal.
    let r = reduce_text("1", -400, FP64, RoundingMode::Positive);
    assert_eq!(r.bits.pack(FP64), 1);
}

#[test]
fn test_reduce_extended() {
    use super::float::{FP128, FP80};
    let nearest = RoundingMode::NearestTiesToEven;

    let r = reduce_text("1", 0, FP80, nearest);
    assert_eq!(r.bits.pack(FP80), (0x3fffu128 << 64) | (1 << 63));

    let r = reduce_text("0.1", 0, FP128, nearest);
    // 0.1 in binary128: 0x3ffb999999999999999999999999999a.
    assert_eq!(r.bits.pack(FP128), 0x3ffb_9999_9999_9999_9999_9999_9999_999a);
}

#[test]
fn test_reduce_scaled() {
    use super::float::{FP64, FP80};
    let nearest = RoundingMode::NearestTiesToEven;
    let load = |digits: &[u8]| {
        let mut int = BigRadixInt::<2>::new(Radix::Decimal);
        let mut frac = BigRadixFrac::<2>::new(Radix::Decimal);
        int.from_chars(digits, 0).unwrap();
        frac.from_chars(digits, 0).unwrap();
        (int, frac)
    };

    // 3 * 2^-1076 is between the two smallest denormals.
    let (int, frac) = load(b"3");
    let r = reduce(int, frac, -1076, false, FP64, nearest);
    assert_eq!(r.bits.pack(FP64), 1);
    let (int, frac) = load(b"0.75");
    let r = reduce(int, frac, 1024, false, FP64, nearest);
    assert_eq!(f64::from_bits(r.bits.pack(FP64) as u64), 0.75 * 2f64.powi(1023) * 2.0);
    let (int, frac) = load(b"1");
    let r = reduce(int, frac, 1024, false, FP64, nearest);
    assert!(r.overflowed);

    // The largest extended value, and one binade above it.
    let (int, frac) = load(b"1");
    let r = reduce(int, frac, 16383, false, FP80, nearest);
    assert_eq!(r.bits.pack(FP80), (0x7ffeu128 << 64) | (1 << 63));
    let (int, frac) = load(b"1");
    assert!(reduce(int, frac, 16384, false, FP80, nearest).overflowed);
    // Half of the smallest denormal, 2^-16445.
    let (int, frac) = load(b"0.5");
    let r = reduce(int, frac, -16445, false, FP80, RoundingMode::Zero);
    assert_eq!(r.bits.pack(FP80), 0);
    let (int, frac) = load(b"0.5");
    let r = reduce(int, frac, -16445, false, FP80, RoundingMode::Positive);
    assert_eq!(r.bits.pack(FP80), 1);
}

#[test]
fn test_classify_range() {
    use super::float::{FP128, FP16, FP64, FP80};
    let decimal = Radix::Decimal;
    assert_eq!(classify(308, decimal, FP64), Range::Inside);
    assert_eq!(classify(310, decimal, FP64), Range::Above);
    assert_eq!(classify(-324, decimal, FP64), Range::Inside);
    assert_eq!(classify(-330, decimal, FP64), Range::Below);
    assert_eq!(classify(4932, decimal, FP80), Range::Inside);
    assert_eq!(classify(-4951, decimal, FP80), Range::Inside);
    assert_eq!(classify(-4966, decimal, FP128), Range::Inside);
    assert_eq!(classify(5000, decimal, FP128), Range::Above);
    assert_eq!(classify(4, decimal, FP16), Range::Inside);
    assert_eq!(classify(-8, decimal, FP16), Range::Inside);
    assert_eq!(classify(i64::MIN, decimal, FP16), Range::Below);

    let hex = Radix::Hex;
    // 1p-1074 has its leading hex digit at 16^-269.
    assert_eq!(classify(-269, hex, FP64), Range::Inside);
    assert_eq!(classify(255, hex, FP64), Range::Inside);
    assert_eq!(classify(258, hex, FP64), Range::Above);
    assert_eq!(classify(-280, hex, FP64), Range::Below);

    assert_eq!(underflow(false, RoundingMode::NearestTiesToEven).bits, FloatBits::zero(false));
    assert_eq!(underflow(true, RoundingMode::Negative).bits.pack(FP64), (1 << 63) | 1);
    assert_eq!(underflow(true, RoundingMode::Positive).bits, FloatBits::zero(true));
}
