//! Property-based tests for the conversions.

use proptest::prelude::*;

use radixfloat::{decode, encode, parse, Format, FormatFlags, RoundingMode, FP32, FP64};

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<u64>()
        .prop_map(f64::from_bits)
        .prop_filter("finite", |v| v.is_finite())
}

fn finite_f32() -> impl Strategy<Value = f32> {
    any::<u32>()
        .prop_map(f32::from_bits)
        .prop_filter("finite", |v| v.is_finite())
}

/// Decode the numeral without failing on overflow.
fn read(text: &str, format: &Format) -> f64 {
    decode::<f64>(text, format).unwrap().value
}

/// Normal values that stay finite when rounded to one digit.
fn in_range(v: &f64) -> bool {
    v.is_normal() && v.abs() < 1e307
}

/// Returns the digits of the numeral before the exponent marker.
fn mantissa_part(text: &str) -> &str {
    match text.find(['e', 'p', 's']) {
        Some(pos) => &text[..pos],
        None => text,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Seventeen significant digits restore every double.
    #[test]
    fn round_trip_f64(v in finite_f64()) {
        for format in [Format::scientific(16), Format::general(17), Format::round_trip(FP64)] {
            let text = encode(v, &format).unwrap();
            let back: f64 = parse(&text, &format).unwrap();
            prop_assert_eq!(back.to_bits(), v.to_bits(), "{} -> {}", v, text);
        }
    }

    /// Nine significant digits restore every single precision float.
    #[test]
    fn round_trip_f32(v in finite_f32()) {
        let format = Format::round_trip(FP32);
        let text = encode(v, &format).unwrap();
        let back: f32 = parse(&text, &format).unwrap();
        prop_assert_eq!(back.to_bits(), v.to_bits(), "{} -> {}", v, text);
    }

    /// Hex floats with thirteen digits after the point are exact.
    #[test]
    fn round_trip_hex(v in finite_f64()) {
        let format = Format::hex_float(13);
        let text = encode(v, &format).unwrap();
        let back: f64 = parse(&text, &format).unwrap();
        prop_assert_eq!(back.to_bits(), v.to_bits(), "{} -> {}", v, text);
    }

    /// Directed rounding never moves the numeral past the value.
    #[test]
    fn directed_rounding_is_monotone(v in finite_f64(), precision in 0usize..20) {
        let up = Format::scientific(precision).with_rounding(RoundingMode::Positive);
        let text = encode(v, &up).unwrap();
        prop_assert!(read(&text, &up) >= v, "{} -> {}", v, text);

        let down = Format::scientific(precision).with_rounding(RoundingMode::Negative);
        let text = encode(v, &down).unwrap();
        prop_assert!(read(&text, &down) <= v, "{} -> {}", v, text);

        let zero = Format::scientific(precision).with_rounding(RoundingMode::Zero);
        let text = encode(v, &zero).unwrap();
        prop_assert!(read(&text, &zero).abs() <= v.abs(), "{} -> {}", v, text);
    }

    /// Trimmed numerals have no trailing zeros after the point, and
    /// printing the parsed numeral again gives the same text.
    #[test]
    fn trimming_is_idempotent(v in finite_f64().prop_filter("in range", in_range),
                              precision in 1usize..16) {
        for format in [Format::general(precision), Format::scientific(precision - 1)] {
            let format = format.with_flags(format.flags | FormatFlags::TRIM_ZEROS);
            let text = encode(v, &format).unwrap();
            let digits = mantissa_part(&text);
            if digits.contains('.') {
                prop_assert!(!digits.ends_with('0'), "{}", text);
                prop_assert!(!digits.ends_with('.'), "{}", text);
            }
            let again = encode(read(&text, &format), &format).unwrap();
            prop_assert_eq!(again, text);
        }
    }

    /// The scientific and the exact positional numerals name the same value.
    #[test]
    fn notations_agree(v in finite_f64()) {
        let sci = Format::scientific(16);
        let exact = Format::exact();
        let a = read(&encode(v, &sci).unwrap(), &sci);
        let b = read(&encode(v, &exact).unwrap(), &exact);
        prop_assert_eq!(a.to_bits(), v.to_bits());
        prop_assert_eq!(b.to_bits(), v.to_bits());
    }
}
