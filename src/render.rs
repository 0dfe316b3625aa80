//! Writes the characters of a numeral: the digits of the rounded value, the
//! radix point, the exponent, and the spellings of the special values.

use super::bigint::Radix;
use super::expand::Expansion;
use super::float::{Category, NanKind};
use super::format::{Format, FormatFlags};
use super::round::{Layout, Notation};

/// A destination for the characters of a numeral.
pub(crate) trait Sink {
    fn push(&mut self, c: u8);

    fn push_str(&mut self, s: &str) {
        for c in s.bytes() {
            self.push(c);
        }
    }
}

impl Sink for String {
    fn push(&mut self, c: u8) {
        String::push(self, c as char);
    }
}

/// Writes into a fixed buffer. Characters past the end of the buffer are
/// counted but not stored.
pub(crate) struct SliceSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        SliceSink { buf, len: 0 }
    }

    /// Returns the length of the numeral, which may exceed the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the numeral did not fit.
    pub fn is_truncated(&self) -> bool {
        self.len > self.buf.len()
    }
}

impl Sink for SliceSink<'_> {
    fn push(&mut self, c: u8) {
        if let Some(slot) = self.buf.get_mut(self.len) {
            *slot = c;
        }
        self.len += 1;
    }
}

/// Counts the characters without storing them.
#[derive(Default)]
pub(crate) struct CountingSink {
    pub len: usize,
}

impl Sink for CountingSink {
    fn push(&mut self, _: u8) {
        self.len += 1;
    }
}

/// Writes the spelling of an infinity or a NaN.
pub(crate) fn render_special(
    category: Category,
    negative: bool,
    upper: bool,
    out: &mut dyn Sink,
) {
    let (sign, word) = match category {
        Category::Infinity => (negative, "inf"),
        Category::NaN(NanKind::Quiet) => (false, "nan"),
        Category::NaN(NanKind::Indeterminate) => (true, "nan(ind)"),
        Category::NaN(NanKind::Signaling) => (negative, "nan(snan)"),
        Category::Finite | Category::Zero => return,
    };
    if sign {
        out.push(b'-');
    }
    for c in word.bytes() {
        out.push(if upper { c.to_ascii_uppercase() } else { c });
    }
}

/// Writes the exponent marker and the signed exponent.
fn render_exponent(exponent: i64, format: &Format, out: &mut dyn Sink) {
    let upper = format.has(FormatFlags::UPPERCASE);
    let (marker, exponent) = if format.flags.is_hex_float() {
        (b'p', exponent * 4)
    } else if format.radix() == Radix::Hex {
        (b's', exponent)
    } else {
        (b'e', exponent)
    };
    out.push(if upper { marker.to_ascii_uppercase() } else { marker });
    out.push(if exponent < 0 { b'-' } else { b'+' });

    let mut buf = [0u8; 20];
    let mut n = exponent.unsigned_abs();
    let mut len = 0;
    loop {
        buf[len] = b'0' + (n % 10) as u8;
        len += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    if len < 2 && !format.has(FormatFlags::NO_EXP_PAD) {
        out.push(b'0');
    }
    for &c in buf[..len].iter().rev() {
        out.push(c);
    }
}

/// Writes a signed zero.
pub(crate) fn render_zero(negative: bool, format: &Format, out: &mut dyn Sink) {
    let flags = format.flags;
    if negative {
        out.push(b'-');
    }
    out.push(b'0');

    let digits = if flags.contains(FormatFlags::EXACT)
        || flags.contains(FormatFlags::TRIM_ZEROS)
    {
        0
    } else if flags.is_general() {
        format.precision.max(1) - 1
    } else {
        format.precision
    };
    if digits > 0 || flags.contains(FormatFlags::FORCE_POINT) {
        out.push(b'.');
    }
    for _ in 0..digits {
        out.push(b'0');
    }
    if flags.is_scientific() {
        render_exponent(0, format, out);
    }
}

impl<const N: usize> Expansion<N> {
    /// Returns the digit with the weight B^k.
    fn digit_at_exponent(&self, k: i64) -> u8 {
        let k = k - self.shift;
        if k >= 0 {
            self.int.digit_at(k as usize)
        } else {
            self.frac.digit_at((-k - 1) as usize)
        }
    }
}

/// Writes the rounded value `x` in the shape `layout`.
pub(crate) fn render<const N: usize>(
    x: &Expansion<N>,
    layout: &Layout,
    format: &Format,
    negative: bool,
    out: &mut dyn Sink,
) {
    let upper = format.has(FormatFlags::UPPERCASE);
    let trim = format.has(FormatFlags::TRIM_ZEROS);
    let force_point = format.has(FormatFlags::FORCE_POINT);
    let radix = format.radix();

    if negative {
        out.push(b'-');
    }

    match layout.notation {
        Notation::Normal => {
            // An unshifted window splits at the radix point of the value.
            let unshifted = x.shift == 0;
            let top = x.exponent().filter(|&e| e >= 0);
            match top {
                Some(_) if unshifted => x.int.to_chars(upper, None, out),
                Some(top) => {
                    for k in (0..=top).rev() {
                        out.push(radix.digit_char(x.digit_at_exponent(k), upper));
                    }
                }
                None => out.push(b'0'),
            }
            let mut digits = layout.digits;
            if trim {
                let last = x.lowest_exponent().map_or(0, |lo| (-lo).max(0) as usize);
                digits = digits.min(last);
            }
            if digits > 0 || force_point {
                out.push(b'.');
            }
            if unshifted {
                x.frac.to_chars(upper, 0, digits, out);
            } else {
                for i in 1..=digits as i64 {
                    out.push(radix.digit_char(x.digit_at_exponent(-i), upper));
                }
            }
        }
        Notation::Scientific => {
            let e = layout.exponent;
            let mut digits = layout.digits;
            if trim {
                while digits > 0 && x.digit_at_exponent(e - digits as i64) == 0
                {
                    digits -= 1;
                }
            }
            out.push(radix.digit_char(x.digit_at_exponent(e), upper));
            if digits > 0 || force_point {
                out.push(b'.');
            }
            for i in 1..=digits as i64 {
                out.push(radix.digit_char(x.digit_at_exponent(e - i), upper));
            }
            render_exponent(e, format, out);
        }
    }
}

#[test]
fn test_sinks() {
    let mut buf = [0u8; 4];
    let mut sink = SliceSink::new(&mut buf);
    sink.push_str("abc");
    assert!(!sink.is_truncated());
    sink.push_str("de");
    assert_eq!(sink.len(), 5);
    assert!(sink.is_truncated());
    assert_eq!(&buf, b"abcd");

    let mut counter = CountingSink::default();
    counter.push_str("12345");
    assert_eq!(counter.len, 5);

    let mut s = String::new();
    Sink::push(&mut s, b'x');
    assert_eq!(s, "x");
}

#[test]
fn test_special_spellings() {
    let spell = |category, negative, upper| {
        let mut s = String::new();
        render_special(category, negative, upper, &mut s);
        s
    };
    assert_eq!(spell(Category::Infinity, false, false), "inf");
    assert_eq!(spell(Category::Infinity, true, true), "-INF");
    assert_eq!(spell(Category::NaN(NanKind::Quiet), false, false), "nan");
    assert_eq!(
        spell(Category::NaN(NanKind::Indeterminate), true, false),
        "-nan(ind)"
    );
    assert_eq!(
        spell(Category::NaN(NanKind::Signaling), false, true),
        "NAN(SNAN)"
    );
    assert_eq!(
        spell(Category::NaN(NanKind::Signaling), true, false),
        "-nan(snan)"
    );
}

#[test]
fn test_zero_spellings() {
    let spell = |negative, format: Format| {
        let mut s = String::new();
        render_zero(negative, &format, &mut s);
        s
    };
    assert_eq!(spell(false, Format::default()), "0");
    assert_eq!(spell(true, Format::default()), "-0");
    assert_eq!(spell(false, Format::normal(2)), "0.00");
    assert_eq!(spell(false, Format::normal(0)), "0");
    let forced = FormatFlags::NORMAL | FormatFlags::FORCE_POINT;
    let forced = Format::normal(0).with_flags(forced);
    assert_eq!(spell(false, forced), "0.");
    assert_eq!(spell(false, Format::scientific(3)), "0.000e+00");
    assert_eq!(spell(false, Format::general(3)), "0.00");
    assert_eq!(spell(false, Format::hex_float(0)), "0p+00");
    let upper = FormatFlags::SCIENTIFIC
        | FormatFlags::UPPERCASE
        | FormatFlags::NO_EXP_PAD;
    let upper = Format::scientific(0).with_flags(upper);
    assert_eq!(spell(false, upper), "0E+0");
    assert_eq!(spell(false, Format::exact()), "0");
}

#[test]
fn test_exponent_spelling() {
    let spell = |exponent, format: Format| {
        let mut s = String::new();
        render_exponent(exponent, &format, &mut s);
        s
    };
    assert_eq!(spell(5, Format::scientific(1)), "e+05");
    assert_eq!(spell(-308, Format::scientific(1)), "e-308");
    assert_eq!(spell(-2, Format::hex_float(1)), "p-08");
    let hex = FormatFlags::SCIENTIFIC
        | FormatFlags::HEX_MANTISSA
        | FormatFlags::UPPERCASE;
    let hex = Format::scientific(1).with_flags(hex);
    assert_eq!(spell(3, hex), "S+03");
    let nopad = Format::scientific(1)
        .with_flags(FormatFlags::SCIENTIFIC | FormatFlags::NO_EXP_PAD);
    assert_eq!(spell(7, nopad), "e+7");
}
