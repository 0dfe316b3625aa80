//! The public entry points: encode a float into a numeral, and decode a
//! numeral into a float. Special values are handled here. Finite values go
//! through the capacity planner and the big-radix pipeline.

use super::bigint::{divide_pair, multiply_pair, BigRadixFrac, BigRadixInt, Radix};
use super::capacity::{
    leading_exponent, plan_decode, plan_encode, plan_encode_scaled, with_capacity, Capacity,
};
use super::cast::IeeeFloat;
use super::error::{BigNumError, Error, ParseFailure, Result};
use super::expand::{expand, expand_scaled};
use super::float::{Category, FloatBits, RoundingMode, Semantics};
use super::format::{Format, FormatFlags};
use super::reduce::{classify, overflow, reduce, underflow, Range, Reduced};
use super::render::{render, render_special, render_zero, CountingSink, SliceSink, Sink};
use super::string::{parse_numeral, Numeral};
use tracing::{debug, trace};

/// The result of decoding a numeral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoded<F> {
    /// The decoded value. When `overflowed` is set this is the infinity or
    /// the largest finite value selected by the rounding mode.
    pub value: F,
    /// The number of bytes of the numeral.
    pub consumed: usize,
    /// Set when the magnitude exceeded the range of the format.
    pub overflowed: bool,
}

impl<F> Decoded<F> {
    /// Returns the value, or `Error::Overflowed`.
    pub fn into_result(self) -> Result<F> {
        if self.overflowed {
            return Err(Error::Overflowed);
        }
        Ok(self.value)
    }
}

/// Expand, round and render the finite nonzero value `m * 2^q`. A
/// `scaled` expansion keeps only a window of the leading digits.
fn encode_finite<const N: usize>(
    m: u128,
    q: i64,
    negative: bool,
    scaled: bool,
    format: &Format,
    out: &mut dyn Sink,
) -> core::result::Result<(), BigNumError> {
    let radix = format.radix();
    let mut x = if scaled {
        expand_scaled::<N>(m, q, radix)?
    } else {
        expand::<N>(m, q, radix)?
    };
    // The dropped digits may change the rounded numeral. Round the largest
    // value they could stand for as well, and compare.
    let mut upper = x.upper_bound();
    let layout = x.round(format, negative);
    if x.error > 0 && N < Capacity::largest().limbs() {
        let upper_layout = upper.round(format, negative);
        if upper_layout != layout || upper != x {
            return Err(BigNumError::Ambiguous);
        }
    }
    trace!(
        notation = ?layout.notation,
        exponent = layout.exponent,
        digits = layout.digits,
        "rounded"
    );
    render(&x, &layout, format, negative, out);
    Ok(())
}

/// Write the numeral of `value` into `out`.
fn write_numeral<F: IeeeFloat>(
    value: F,
    format: &Format,
    out: &mut dyn Sink,
) -> Result<()> {
    let sem = F::SEMANTICS;
    let bits = value.to_float_bits();
    let negative = bits.sign;

    let category = bits.category(sem);
    match category {
        Category::Infinity | Category::NaN(_) => {
            let upper = format.has(FormatFlags::UPPERCASE);
            render_special(category, negative, upper, out);
            Ok(())
        }
        Category::Zero => {
            render_zero(negative, format, out);
            Ok(())
        }
        Category::Finite => {
            let (m, q) = bits.significand(sem);
            let (plan, scaled) = match plan_encode(m, q, format) {
                Ok(plan) => (plan, false),
                Err(_) => {
                    let plan = plan_encode_scaled(m, format).map_err(|_| {
                        debug!(mantissa = %m, exponent = q, "value exceeds the largest capacity");
                        Error::Overflowed
                    })?;
                    (plan, true)
                }
            };
            debug!(
                capacity = ?plan.capacity,
                int_digits = plan.int_digits,
                frac_digits = plan.frac_digits,
                scaled,
                "encode"
            );
            let res = with_capacity!(
                plan.capacity,
                encode_finite(m, q, negative, scaled, format, out)
            );
            let res = match res {
                Err(BigNumError::Ambiguous) => {
                    debug!("the truncated digits are ambiguous, retrying");
                    let largest = Capacity::largest();
                    with_capacity!(largest, encode_finite(m, q, negative, scaled, format, out))
                }
                res => res,
            };
            res.map_err(|_| Error::Overflowed)
        }
    }
}

/// Convert `value` into a numeral, as described by `format`.
pub fn encode<F: IeeeFloat>(value: F, format: &Format) -> Result<String> {
    let mut s = String::new();
    write_numeral(value, format, &mut s)?;
    Ok(s)
}

/// Convert `value` into a numeral in the buffer `buf`, and return the
/// length of the numeral. If the buffer is too short the error reports the
/// required length.
pub fn encode_into<F: IeeeFloat>(
    value: F,
    format: &Format,
    buf: &mut [u8],
) -> Result<usize> {
    let mut sink = SliceSink::new(buf);
    write_numeral(value, format, &mut sink)?;
    if sink.is_truncated() {
        debug!(required = sink.len(), "output buffer too small");
        return Err(Error::BufferTooSmall {
            required: sink.len(),
        });
    }
    Ok(sink.len())
}

/// Returns the length of the numeral of `value`.
pub fn encoded_len<F: IeeeFloat>(value: F, format: &Format) -> Result<usize> {
    let mut counter = CountingSink::default();
    write_numeral(value, format, &mut counter)?;
    Ok(counter.len)
}

/// Load the digits and reduce the value, times two to the binary residual
/// of the exponent, to the format `sem`.
fn decode_digits<const N: usize>(
    digits: &[u8],
    shift: i64,
    residual: u32,
    negative: bool,
    radix: Radix,
    sem: Semantics,
    rm: RoundingMode,
) -> core::result::Result<Reduced, BigNumError> {
    let mut int = BigRadixInt::<N>::new(radix);
    let mut frac = BigRadixFrac::<N>::new(radix);
    int.from_chars(digits, shift)?;
    frac.from_chars(digits, shift)?;
    if int.is_overflowed() {
        return Err(BigNumError::CapacityExceeded);
    }
    Ok(reduce(int, frac, residual as i64, negative, sem, rm))
}

const WIDE: usize = 64;

/// Load a numeral whose leading digit is too far from the radix point for
/// the exact path. The digits go into a window with the leading digit near
/// the top, and the radix exponent of the window is turned into the binary
/// scale that is returned with it. A decimal exponent `t` is `2^t * 5^t`,
/// and the powers of five are applied to the window one at a time. Halving
/// or doubling keeps the leading digit in place.
fn load_scaled(
    digits: &[u8],
    lead: i64,
    shift: i64,
    radix: Radix,
) -> core::result::Result<(BigRadixInt<WIDE>, BigRadixFrac<WIDE>, i64), BigNumError> {
    let top = WIDE * radix.digits_per_limb() - 3;
    let t = lead.saturating_sub(top as i64);

    let mut int = BigRadixInt::<WIDE>::new(radix);
    let mut frac = BigRadixFrac::<WIDE>::new(radix);
    int.from_chars(digits, shift.saturating_sub(t))?;
    frac.from_chars(digits, shift.saturating_sub(t))?;

    let scale = match radix {
        Radix::Hex => t.saturating_mul(4),
        Radix::Decimal => {
            let mut scale = t;
            let top_of = |int: &BigRadixInt<WIDE>| int.top_digit().unwrap_or(0);
            if t >= 0 {
                for _ in 0..t {
                    multiply_pair(&mut int, &mut frac, 5);
                    while top_of(&int) > top {
                        divide_pair(&mut int, &mut frac, 2);
                        scale += 1;
                    }
                }
            } else {
                for _ in 0..t.unsigned_abs() {
                    divide_pair(&mut int, &mut frac, 5);
                    while top_of(&int) < top {
                        multiply_pair(&mut int, &mut frac, 2);
                        scale -= 1;
                    }
                }
            }
            scale
        }
    };
    if int.is_overflowed() {
        return Err(BigNumError::CapacityExceeded);
    }
    trace!(window = t, scale, "scaled window");
    Ok((int, frac, scale))
}

/// Decode the numeral at the start of `text`. Trailing characters are not
/// consumed, and `Decoded::consumed` reports where the numeral ends.
pub fn decode<F: IeeeFloat>(text: &str, format: &Format) -> Result<Decoded<F>> {
    let sem = F::SEMANTICS;
    let rm = format.rounding;
    let radix = format.radix();
    let parsed = parse_numeral(text.as_bytes(), radix)?;

    let reduced = match parsed.numeral {
        Numeral::Nan { negative, kind } => Reduced {
            bits: FloatBits::nan(sem, negative, kind),
            overflowed: false,
        },
        Numeral::Infinity { negative } => Reduced {
            bits: FloatBits::infinity(sem, negative),
            overflowed: false,
        },
        Numeral::Digits {
            negative,
            run,
            ..
        } if run.is_zero() => Reduced {
            bits: FloatBits::zero(negative),
            overflowed: false,
        },
        Numeral::Digits {
            negative,
            start,
            run,
            shift,
            residual,
        } => {
            let digits = &text.as_bytes()[start..];
            let lead = leading_exponent(&run, shift);
            match classify(lead, radix, sem) {
                Range::Above => overflow(sem, negative, rm),
                Range::Below => underflow(negative, rm),
                Range::Inside => {
                    let res = match plan_decode(&run, shift, radix) {
                        Ok(plan) => {
                            debug!(
                                capacity = ?plan.capacity,
                                int_digits = plan.int_digits,
                                frac_digits = plan.frac_digits,
                                "decode"
                            );
                            with_capacity!(
                                plan.capacity,
                                decode_digits(digits, shift, residual, negative, radix, sem, rm)
                            )
                        }
                        Err(_) => {
                            debug!(lead, "decode on a scaled window");
                            load_scaled(digits, lead, shift, radix).map(|(int, frac, scale)| {
                                let scale = scale.saturating_add(residual as i64);
                                reduce(int, frac, scale, negative, sem, rm)
                            })
                        }
                    };
                    res.unwrap_or_else(|_| overflow(sem, negative, rm))
                }
            }
        }
    };

    if reduced.overflowed {
        debug!(consumed = parsed.consumed, "decoded value overflowed");
    }
    Ok(Decoded {
        value: F::from_float_bits(reduced.bits),
        consumed: parsed.consumed,
        overflowed: reduced.overflowed,
    })
}

/// Decode the whole of `text`. Trailing characters and overflow are errors.
pub fn parse<F: IeeeFloat>(text: &str, format: &Format) -> Result<F> {
    let decoded = decode::<F>(text, format)?;
    if decoded.consumed != text.len() {
        let failure = ParseFailure::TrailingCharacters(decoded.consumed);
        return Err(Error::ParseFailed(failure));
    }
    decoded.into_result()
}

#[cfg(test)]
fn enc(v: f64, format: Format) -> String {
    encode(v, &format).unwrap()
}

#[cfg(test)]
fn flags(format: Format, extra: FormatFlags) -> Format {
    format.with_flags(format.flags | extra)
}

#[test]
fn test_encode_defaults() {
    let f = Format::default();
    assert_eq!(enc(5.0, f), "5");
    assert_eq!(enc(0.0, f), "0");
    assert_eq!(enc(-0.0, f), "-0");
    assert_eq!(enc(123.456, f), "123.456");
    assert_eq!(enc(1e-5, f), "1e-05");
    assert_eq!(enc(0.0001, f), "0.0001");
    assert_eq!(enc(1e6, f), "1e+06");
    assert_eq!(enc(123456.0, f), "123456");
    assert_eq!(enc(f64::MAX, f), "1.79769e+308");
    assert_eq!(enc(-2.5, f), "-2.5");
    assert_eq!(enc(f64::INFINITY, f), "inf");
    assert_eq!(enc(f64::NEG_INFINITY, f), "-inf");
    assert_eq!(enc(f64::NAN, f), "nan");
    assert_eq!(enc(-f64::NAN, f), "-nan(ind)");
}

#[test]
fn test_encode_normal() {
    assert_eq!(enc(1.0 / 3.0, Format::normal(1)), "0.3");
    assert_eq!(enc(2.0 / 3.0, Format::normal(1)), "0.7");
    assert_eq!(enc(0.1, Format::normal(20)), "0.10000000000000000555");
    assert_eq!(enc(0.125, Format::normal(2)), "0.12");
    assert_eq!(enc(0.375, Format::normal(2)), "0.38");
    assert_eq!(enc(9.995, Format::normal(2)), "9.99");
    assert_eq!(enc(99.96, Format::normal(1)), "100.0");
    assert_eq!(enc(2.5, Format::normal(0)), "2");
    assert_eq!(enc(3.5, Format::normal(0)), "4");
    assert_eq!(enc(-0.001, Format::normal(2)), "-0.00");
    assert_eq!(enc(3.0, flags(Format::normal(0), FormatFlags::FORCE_POINT)), "3.");
    assert_eq!(enc(1e21, Format::normal(0)), "1000000000000000000000");
    assert_eq!(enc(1.5, flags(Format::normal(6), FormatFlags::TRIM_ZEROS)), "1.5");
}

#[test]
fn test_encode_rounding_modes() {
    let with = |rm| Format::normal(2).with_rounding(rm);
    assert_eq!(enc(-0.1, with(RoundingMode::Negative)), "-0.11");
    assert_eq!(enc(-0.1, with(RoundingMode::Positive)), "-0.10");
    assert_eq!(enc(0.1, with(RoundingMode::Positive)), "0.11");
    assert_eq!(enc(0.129, with(RoundingMode::Zero)), "0.12");
    assert_eq!(enc(0.125, with(RoundingMode::NearestTiesToAway)), "0.13");
    assert_eq!(enc(0.125, with(RoundingMode::NearestTiesToEven)), "0.12");
}

#[test]
fn test_encode_scientific() {
    assert_eq!(enc(0.1, Format::scientific(20)), "1.00000000000000005551e-01");
    assert_eq!(enc(1234.0, Format::scientific(2)), "1.23e+03");
    let upper = flags(Format::scientific(2), FormatFlags::UPPERCASE);
    assert_eq!(enc(1234.0, upper), "1.23E+03");
    assert_eq!(enc(9.99, Format::scientific(1)), "1.0e+01");
    assert_eq!(enc(1e-300, Format::scientific(3)), "1.000e-300");
    assert_eq!(enc(5e-324, Format::scientific(3)), "4.941e-324");
    let nopad = flags(Format::scientific(0), FormatFlags::NO_EXP_PAD);
    assert_eq!(enc(3e5, nopad), "3e+5");
    assert_eq!(enc(0.0, Format::scientific(2)), "0.00e+00");
}

#[test]
fn test_encode_general() {
    assert_eq!(enc(0.0001, Format::general(6)), "0.000100000");
    assert_eq!(enc(1e21, Format::general(17)), "1.0000000000000000e+21");
    let trimmed = flags(Format::general(17), FormatFlags::TRIM_ZEROS);
    assert_eq!(enc(1e21, trimmed), "1e+21");
    assert_eq!(enc(0.1, trimmed), "0.10000000000000001");
    assert_eq!(enc(100.0, Format::general(3)), "100");
    assert_eq!(enc(1000.0, Format::general(3)), "1.00e+03");
}

#[test]
fn test_encode_exact() {
    assert_eq!(
        enc(0.1, Format::exact()),
        "0.1000000000000000055511151231257827021181583404541015625"
    );
    assert_eq!(enc(2.0f64.powi(70), Format::exact()), "1180591620717411303424");
    let tiny = enc(f64::from_bits(1), Format::exact());
    assert_eq!(tiny.len(), 2 + 1074);
    assert!(tiny.starts_with("0.000"));

    let sci = Format::exact().with_flags(FormatFlags::SCIENTIFIC | FormatFlags::EXACT);
    assert_eq!(enc(0.375, sci), "3.75e-01");
    assert_eq!(enc(1e15, sci), "1e+15");
    let general = Format::exact().with_flags(FormatFlags::GENERAL | FormatFlags::EXACT);
    assert_eq!(enc(0.375, general), "0.375");
    assert_eq!(enc(1e15, general), "1e+15");
    assert_eq!(enc(1234.5, general), "1234.5");
}

#[test]
fn test_encode_hex() {
    assert_eq!(enc(1.0, Format::hex_float(13)), "1.0000000000000p+00");
    let trimmed = flags(Format::hex_float(13), FormatFlags::TRIM_ZEROS);
    assert_eq!(enc(1.0, trimmed), "1p+00");
    assert_eq!(enc(0.1, Format::hex_float(13)), "1.999999999999ap-04");
    assert_eq!(enc(0.5, trimmed), "8p-04");
    let upper = flags(Format::hex_float(2), FormatFlags::UPPERCASE);
    assert_eq!(enc(-255.0, upper), "-F.F0P+04");

    let hex = FormatFlags::NORMAL | FormatFlags::HEX_MANTISSA;
    assert_eq!(enc(255.5, Format::normal(1).with_flags(hex)), "ff.8");
    let hex = FormatFlags::SCIENTIFIC | FormatFlags::HEX_MANTISSA;
    assert_eq!(enc(256.0, Format::scientific(1).with_flags(hex)), "1.0s+02");
}

#[test]
fn test_encode_other_types() {
    use super::cast::{F128, F80};
    use half::f16;
    let f = Format::default();
    assert_eq!(encode(0.1f32, &Format::general(9)).unwrap(), "0.100000001");
    assert_eq!(encode(f16::from_f32(0.1), &Format::general(5)).unwrap(), "0.099976");
    assert_eq!(encode(f16::MAX, &f).unwrap(), "65504");
    assert_eq!(encode(F80::from_f64(1.5), &f).unwrap(), "1.5");
    assert_eq!(encode(F128::from_f64(-0.25), &f).unwrap(), "-0.25");

    let max = F80::from_parts(0x7ffe, u64::MAX);
    assert_eq!(encode(max, &f).unwrap(), "1.18973e+4932");
    // Every digit of the integer part does not fit the largest capacity.
    assert_eq!(encode(max, &Format::exact()), Err(Error::Overflowed));
    assert_eq!(encode(max, &Format::normal(0)), Err(Error::Overflowed));
}

#[test]
fn test_extended_range() {
    use super::cast::{F128, F80};
    use super::float::{FP128, FP80};
    let f = Format::default();
    let f80_max = F80::from_parts(0x7ffe, u64::MAX);
    let f80_min = F80::from_parts(0, 1);
    let f128_max = F128::from_bits(0x7ffe_ffff_ffff_ffff_ffff_ffff_ffff_ffff);
    let f128_min = F128::from_bits(1);

    assert_eq!(encode(f80_min, &f).unwrap(), "3.6452e-4951");
    assert_eq!(encode(f128_max, &f).unwrap(), "1.18973e+4932");
    assert_eq!(encode(f128_min, &f).unwrap(), "6.47518e-4966");
    assert_eq!(
        encode(f80_max, &Format::scientific(20)).unwrap(),
        "1.18973149535723176502e+4932"
    );
    assert_eq!(
        encode(f80_min, &Format::scientific(20)).unwrap(),
        "3.64519953188247460253e-4951"
    );
    assert_eq!(
        encode(f80_max, &Format::hex_float(15)).unwrap(),
        "f.fffffffffffffffp+16380"
    );

    let wide = Format::round_trip(FP80);
    for x in [f80_max, f80_min] {
        let text = encode(x, &wide).unwrap();
        assert_eq!(parse::<F80>(&text, &f), Ok(x), "{}", text);
    }
    let wide = Format::round_trip(FP128);
    for x in [f128_max, f128_min] {
        let text = encode(x, &wide).unwrap();
        assert_eq!(parse::<F128>(&text, &f), Ok(x), "{}", text);
    }

    for (text, printed) in [
        ("1e2000", "1e+2000"),
        ("1e-2000", "1e-2000"),
        ("1e4000", "1e+4000"),
        ("1e-4000", "1e-4000"),
    ] {
        let x = parse::<F80>(text, &f).unwrap();
        assert_eq!(encode(x, &f).unwrap(), printed);
        let y = parse::<F128>(text, &f).unwrap();
        assert_eq!(encode(y, &f).unwrap(), printed);
        let back = encode(y, &Format::round_trip(FP128)).unwrap();
        assert_eq!(parse::<F128>(&back, &f), Ok(y));
    }

    assert_eq!(parse::<F80>("3.6e-4951", &f), Ok(f80_min));
    assert_eq!(parse::<F80>("1e-4960", &f), Ok(F80::from_bits(0)));
    assert_eq!(parse::<F80>("1.2e4932", &f), Err(Error::Overflowed));
    assert_eq!(parse::<F80>("1p-16445", &Format::hex_float(0)), Ok(f80_min));
    assert_eq!(parse::<F80>("-1p-16446", &Format::hex_float(0)), Ok(F80::from_parts(0x8000, 0)));
}

#[test]
fn test_decode_huge_exponents() {
    let f = Format::default();
    let d = decode::<f64>("1.000e-99999999999999999999999", &f).unwrap();
    assert_eq!(d.value.to_bits(), 0);
    assert!(!d.overflowed);
    assert_eq!(d.consumed, 30);

    let d = decode::<f64>("-1e-9999999999999999999999", &f).unwrap();
    assert_eq!(d.value.to_bits(), (-0.0f64).to_bits());
    assert!(!d.overflowed);

    let d = decode::<f64>("1e99999999999999999999999", &f).unwrap();
    assert_eq!(d.value, f64::INFINITY);
    assert!(d.overflowed);

    let up = f.with_rounding(RoundingMode::Positive);
    assert_eq!(parse::<f64>("1e-99999999999", &up), Ok(f64::from_bits(1)));
}

#[test]
fn test_buffer_contract() {
    let f = Format::scientific(10);
    let needed = encoded_len(0.1f64, &f).unwrap();
    assert_eq!(needed, "1.0000000000e-01".len());

    let mut short = vec![0u8; needed - 1];
    assert_eq!(
        encode_into(0.1f64, &f, &mut short),
        Err(Error::BufferTooSmall { required: needed })
    );
    assert_eq!(
        encode_into(0.1f64, &f, &mut [0u8; 0]),
        Err(Error::BufferTooSmall { required: needed })
    );

    let mut buf = vec![0u8; needed + 4];
    assert_eq!(encode_into(0.1f64, &f, &mut buf), Ok(needed));
    assert_eq!(&buf[..needed], b"1.0000000000e-01");
}

#[test]
fn test_decode() {
    let f = Format::default();
    let d = decode::<f64>("26", &f).unwrap();
    assert_eq!(d.value, 26.0);
    assert_eq!(d.consumed, 2);
    assert!(!d.overflowed);

    assert_eq!(parse::<f64>("0.1", &f), Ok(0.1));
    assert_eq!(parse::<f64>("-1.25e2", &f), Ok(-125.0));
    assert_eq!(parse::<f64>(".5", &f), Ok(0.5));
    assert_eq!(parse::<f64>("5.", &f), Ok(5.0));
    assert_eq!(parse::<f64>("0e999999", &f), Ok(0.0));
    assert_eq!(parse::<f64>("1e-400", &f), Ok(0.0));
    assert!(parse::<f64>("-0", &f).unwrap().is_sign_negative());
    assert_eq!(parse::<f64>("-Infinity", &f), Ok(f64::NEG_INFINITY));
    assert!(parse::<f64>("nan", &f).unwrap().is_nan());
    assert_eq!(parse::<f32>("3.4028235e38", &f), Ok(f32::MAX));

    let d = decode::<f64>("12abc", &f).unwrap();
    assert_eq!((d.value, d.consumed), (12.0, 2));
    assert_eq!(
        parse::<f64>("12abc", &f),
        Err(Error::ParseFailed(ParseFailure::TrailingCharacters(2)))
    );
    assert_eq!(
        parse::<f64>("", &f),
        Err(Error::ParseFailed(ParseFailure::Empty))
    );
    assert_eq!(
        parse::<f64>("e5", &f),
        Err(Error::ParseFailed(ParseFailure::NoDigits))
    );
    assert_eq!(
        parse::<f64>("1e+", &f),
        Err(Error::ParseFailed(ParseFailure::MalformedExponent))
    );
}

#[test]
fn test_decode_nan_patterns() {
    let f = Format::default();
    let snan = parse::<f64>("nan(snan)", &f).unwrap();
    assert_eq!(snan.to_bits(), 0x7ff0_0000_0000_0001);
    let ind = parse::<f64>("-nan(ind)", &f).unwrap();
    assert_eq!(ind.to_bits(), 0xfff8_0000_0000_0000);
    let qnan = parse::<f64>("NAN", &f).unwrap();
    assert_eq!(qnan.to_bits(), 0x7ff8_0000_0000_0000);

    // Every NaN spelling decodes back to the same spelling.
    for s in ["nan", "-nan(ind)", "nan(snan)", "-nan(snan)"] {
        let v = parse::<f64>(s, &f).unwrap();
        assert_eq!(enc(v, f), s);
    }
}

#[test]
fn test_decode_overflow() {
    let f = Format::default();
    let d = decode::<f64>("1e400", &f).unwrap();
    assert!(d.overflowed);
    assert_eq!(d.value, f64::INFINITY);
    assert_eq!(d.into_result(), Err(Error::Overflowed));
    assert_eq!(parse::<f64>("-1e400", &f), Err(Error::Overflowed));

    let toward_zero = f.with_rounding(RoundingMode::Zero);
    let d = decode::<f64>("-1e400", &toward_zero).unwrap();
    assert_eq!(d.value, f64::MIN);
    assert!(d.overflowed);

    // Far above the range of the format.
    let d = decode::<f64>("1e99999", &f).unwrap();
    assert!(d.overflowed);
    assert_eq!(d.value, f64::INFINITY);
}

#[test]
fn test_decode_hex() {
    let f = Format::hex_float(0);
    assert_eq!(parse::<f64>("1.8p+01", &f), Ok(3.0));
    assert_eq!(parse::<f64>("1.999999999999ap-04", &f), Ok(0.1));
    assert_eq!(parse::<f64>("8p-04", &f), Ok(0.5));
    assert_eq!(parse::<f64>("1p-1074", &f), Ok(f64::from_bits(1)));
    assert_eq!(parse::<f64>("FFp0", &f), Ok(255.0));

    let hex = Format::normal(0).with_flags(FormatFlags::HEX_MANTISSA);
    assert_eq!(parse::<f64>("ff.8", &hex), Ok(255.5));
    assert_eq!(parse::<f64>("1s+02", &hex), Ok(256.0));
    assert_eq!(parse::<f64>("1s-01", &hex), Ok(0.0625));
}

#[test]
fn test_decode_other_types() {
    use super::cast::{F128, F80};
    use half::f16;
    let f = Format::default();
    assert_eq!(parse::<f16>("65504", &f), Ok(f16::MAX));
    assert!(parse::<f16>("65520", &f).is_err());
    assert_eq!(parse::<f16>("0.1", &f), Ok(f16::from_f32(0.1)));
    assert_eq!(parse::<F80>("1.5", &f), Ok(F80::from_f64(1.5)));
    assert_eq!(parse::<F128>("-0.25", &f), Ok(F128::from_f64(-0.25)));

    let x = parse::<F128>("0.1", &f).unwrap();
    let text = encode(x, &Format::round_trip(super::float::FP128)).unwrap();
    assert_eq!(parse::<F128>(&text, &f), Ok(x));
}

#[test]
fn test_round_trip_random() {
    use super::utils::{get_special_test_values, Lfsr};
    let shortest = Format::round_trip(super::float::FP64);
    let sci = Format::scientific(16);
    let normal = Format::normal(20);

    let mut values: Vec<f64> = get_special_test_values().to_vec();
    let mut lfsr = Lfsr::new();
    for _ in 0..2000 {
        values.push(lfsr.get_finite_f64());
    }

    for v in values.into_iter().filter(|v| v.is_finite()) {
        for format in [shortest, sci] {
            let text = enc(v, format);
            let back: f64 = parse(&text, &format).unwrap();
            assert_eq!(back.to_bits(), v.to_bits(), "{} {}", v, text);
        }
        // Positional notation with a short fraction agrees with the
        // scientific numeral when both are precise enough.
        if v.abs() >= 1e-3 && v.abs() < 1e15 {
            let text = enc(v, normal);
            let back: f64 = parse(&text, &normal).unwrap();
            assert_eq!(back.to_bits(), v.to_bits(), "{} {}", v, text);
        }
    }
}

#[test]
fn test_encode_matches_std() {
    use super::utils::Lfsr;
    let mut lfsr = Lfsr::new_with_seed(42);
    for _ in 0..500 {
        let v = lfsr.get_finite_f64();
        assert_eq!(enc(v, Format::scientific(12)), std_scientific(v, 12));
    }
}

/// Rust's `{:e}` formatting, with the exponent written as sign and two
/// digits at least.
#[cfg(test)]
fn std_scientific(v: f64, precision: usize) -> String {
    let s = format!("{:.*e}", precision, v);
    let (mantissa, exp) = s.split_once('e').unwrap();
    let exp: i64 = exp.parse().unwrap();
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
}
