//! This module contains the grammar of the numerals that are accepted by
//! the decoder. It splits the text into the sign, the special spellings,
//! the digit run and the exponent, without evaluating the digits.

use super::bigint::{DigitRun, Radix};
use super::error::ParseFailure;
use super::float::NanKind;

/// A recognized numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Numeral {
    Nan {
        negative: bool,
        kind: NanKind,
    },
    Infinity {
        negative: bool,
    },
    Digits {
        negative: bool,
        /// The offset of the digit run in the text.
        start: usize,
        run: DigitRun,
        /// Move the radix point by this number of digits to the right.
        shift: i64,
        /// Multiply the value by 2^residual (hex-float exponents only).
        residual: u32,
    },
}

/// The numeral and the number of bytes it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Parsed {
    pub numeral: Numeral,
    pub consumed: usize,
}

/// Returns true if `text` starts with `word`, ignoring the case.
fn starts_with_word(text: &[u8], word: &str) -> bool {
    text.len() >= word.len() && text[..word.len()].eq_ignore_ascii_case(word.as_bytes())
}

/// Exponents are clamped to this magnitude. Any nonzero value scaled by
/// it is out of the range of every format, and the shifted digit positions
/// stay far from the limits of `i64`.
const EXPONENT_LIMIT: i64 = 1 << 40;

/// Parse the exponent after the marker: an optional sign followed by
/// decimal digits. Returns the value (clamped to `EXPONENT_LIMIT`) and the
/// number of bytes.
fn parse_exponent(text: &[u8]) -> Result<(i64, usize), ParseFailure> {
    let (negative, mut pos) = match text.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    let digits_start = pos;
    let mut value: i64 = 0;
    while let Some(c) = text.get(pos).filter(|c| c.is_ascii_digit()) {
        value = (value * 10 + (c - b'0') as i64).min(EXPONENT_LIMIT);
        pos += 1;
    }
    if pos == digits_start {
        return Err(ParseFailure::MalformedExponent);
    }
    Ok((if negative { -value } else { value }, pos))
}

/// Parse the numeral at the start of `text`, with digits in `radix`.
pub(crate) fn parse_numeral(
    text: &[u8],
    radix: Radix,
) -> Result<Parsed, ParseFailure> {
    if text.is_empty() {
        return Err(ParseFailure::Empty);
    }

    let negative = text[0] == b'-';
    let mut pos = negative as usize;
    let rest = &text[pos..];

    // Handle NaN, with the optional spelling of the kind.
    if starts_with_word(rest, "nan") {
        pos += 3;
        let mut kind = NanKind::Quiet;
        if starts_with_word(&text[pos..], "(ind)") {
            kind = NanKind::Indeterminate;
            pos += 5;
        } else if starts_with_word(&text[pos..], "(snan)") {
            kind = NanKind::Signaling;
            pos += 6;
        }
        return Ok(Parsed {
            numeral: Numeral::Nan { negative, kind },
            consumed: pos,
        });
    }

    // Handle Inf.
    for word in ["infinity", "inf"] {
        if starts_with_word(rest, word) {
            return Ok(Parsed {
                numeral: Numeral::Infinity { negative },
                consumed: pos + word.len(),
            });
        }
    }

    let start = pos;
    let run = DigitRun::scan(rest, radix);
    if run.digits == 0 {
        return Err(ParseFailure::NoDigits);
    }
    pos += run.len;

    let mut shift = 0;
    let mut residual = 0;
    if let Some(&marker) = text.get(pos) {
        let marker = marker.to_ascii_lowercase();
        let binary = radix == Radix::Hex && marker == b'p';
        let scaled = match radix {
            Radix::Decimal => marker == b'e',
            Radix::Hex => marker == b's',
        };
        if binary || scaled {
            let (exp, len) = parse_exponent(&text[pos + 1..])?;
            pos += 1 + len;
            if binary {
                shift = exp.div_euclid(4);
                residual = exp.rem_euclid(4) as u32;
            } else {
                shift = exp;
            }
        }
    }

    Ok(Parsed {
        numeral: Numeral::Digits {
            negative,
            start,
            run,
            shift,
            residual,
        },
        consumed: pos,
    })
}

#[test]
fn test_parse_specials() {
    let parse = |s: &str| parse_numeral(s.as_bytes(), Radix::Decimal).unwrap();

    let p = parse("nan");
    assert_eq!(
        p.numeral,
        Numeral::Nan {
            negative: false,
            kind: NanKind::Quiet
        }
    );
    assert_eq!(p.consumed, 3);

    let p = parse("-NaN(IND)");
    assert_eq!(
        p.numeral,
        Numeral::Nan {
            negative: true,
            kind: NanKind::Indeterminate
        }
    );
    assert_eq!(p.consumed, 9);

    let p = parse("nan(snan)xyz");
    assert_eq!(
        p.numeral,
        Numeral::Nan {
            negative: false,
            kind: NanKind::Signaling
        }
    );
    assert_eq!(p.consumed, 9);

    // An unknown suffix is not consumed.
    assert_eq!(parse("nan(q)").consumed, 3);

    assert_eq!(parse("-INF").numeral, Numeral::Infinity { negative: true });
    let p = parse("Infinity!");
    assert_eq!(p.numeral, Numeral::Infinity { negative: false });
    assert_eq!(p.consumed, 8);
}

#[test]
fn test_parse_digits() {
    let parse = |s: &str, radix| parse_numeral(s.as_bytes(), radix).unwrap();

    let p = parse("-12.5e-3,", Radix::Decimal);
    assert_eq!(p.consumed, 8);
    let Numeral::Digits {
        negative,
        start,
        run,
        shift,
        residual,
    } = p.numeral
    else {
        panic!("expected digits");
    };
    assert!(negative);
    assert_eq!(start, 1);
    assert_eq!(run.digits, 3);
    assert_eq!(run.int_digits, 2);
    assert_eq!(shift, -3);
    assert_eq!(residual, 0);

    // Hex digits do not mistake 'e' for a marker.
    let p = parse("1e.8s+2", Radix::Hex);
    assert_eq!(p.consumed, 7);
    let Numeral::Digits { run, shift, .. } = p.numeral else {
        panic!("expected digits");
    };
    assert_eq!(run.digits, 3);
    assert_eq!(shift, 2);

    // A binary exponent is split into hex digits and a residual.
    let p = parse("1.8p-3", Radix::Hex);
    let Numeral::Digits {
        shift, residual, ..
    } = p.numeral
    else {
        panic!("expected digits");
    };
    assert_eq!((shift, residual), (-1, 1));

    // The marker of the other radix ends the numeral.
    let p = parse("12p3", Radix::Decimal);
    assert_eq!(p.consumed, 2);

    // Huge exponents are clamped.
    let p = parse("1e99999999999999999999999", Radix::Decimal);
    let Numeral::Digits { shift, .. } = p.numeral else {
        panic!("expected digits");
    };
    assert_eq!(shift, EXPONENT_LIMIT);
    let p = parse("1.000e-99999999999999999999999", Radix::Decimal);
    assert_eq!(p.consumed, 30);
    let Numeral::Digits { shift, .. } = p.numeral else {
        panic!("expected digits");
    };
    assert_eq!(shift, -EXPONENT_LIMIT);
}

#[test]
fn test_parse_errors() {
    let parse = |s: &str| parse_numeral(s.as_bytes(), Radix::Decimal);
    assert_eq!(parse(""), Err(ParseFailure::Empty));
    assert_eq!(parse("-"), Err(ParseFailure::NoDigits));
    assert_eq!(parse("."), Err(ParseFailure::NoDigits));
    assert_eq!(parse("+1"), Err(ParseFailure::NoDigits));
    assert_eq!(parse("abc"), Err(ParseFailure::NoDigits));
    assert_eq!(parse("1e"), Err(ParseFailure::MalformedExponent));
    assert_eq!(parse("1e+"), Err(ParseFailure::MalformedExponent));
    assert_eq!(parse("2E-x"), Err(ParseFailure::MalformedExponent));
}
