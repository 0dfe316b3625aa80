//! Rounds the expanded value to the requested number of digits, and selects
//! the notation of the general format.

use super::expand::Expansion;
use super::float::RoundingMode;
use super::format::{Format, FormatFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notation {
    /// Positional: `123.456`.
    Normal,
    /// One leading digit and an exponent: `1.23456e+02`.
    Scientific,
}

/// Describes the shape of the rounded numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    pub notation: Notation,
    /// The radix exponent of the leading digit. Zero for a zero value.
    pub exponent: i64,
    /// The number of digits after the radix point.
    pub digits: usize,
}

impl<const N: usize> Expansion<N> {
    /// Returns the exponent of the most significant nonzero digit inside
    /// the window: `k` for the integer digit with the weight B^k, and
    /// `-(j+1)` for the fraction digit `j`. Returns None for zero.
    fn window_exponent(&self) -> Option<i64> {
        if let Some(top) = self.int.top_digit() {
            return Some(top as i64);
        }
        self.frac.first_nonzero().map(|j| -(j as i64 + 1))
    }

    /// Returns the radix exponent of the most significant nonzero digit of
    /// the value.
    pub fn exponent(&self) -> Option<i64> {
        self.window_exponent().map(|e| e + self.shift)
    }

    /// Returns the radix exponent of the least significant nonzero digit.
    pub fn lowest_exponent(&self) -> Option<i64> {
        let low = match self.frac.last_nonzero() {
            Some(j) => -(j as i64 + 1),
            None => self.int.lowest_nonzero()? as i64,
        };
        Some(low + self.shift)
    }

    /// Returns the number of significant digits of the exact value.
    pub fn significant_digits(&self) -> usize {
        match (self.exponent(), self.lowest_exponent()) {
            (Some(hi), Some(lo)) => (hi - lo + 1) as usize,
            _ => 0,
        }
    }

    /// Propagate a carry out of the fraction into the integer part.
    fn carry_into_int(&mut self, carry: bool) {
        if carry {
            self.int.increment();
            self.bi_available = true;
        }
    }

    /// Round the fraction of the window to `keep` digits.
    fn round_fraction(&mut self, keep: usize, negative: bool, rm: RoundingMode) {
        let lsd_odd = self.int.digit_at(0) & 1 == 1;
        let carry = self.frac.round_at(keep, negative, rm, lsd_odd);
        self.carry_into_int(carry);
    }

    /// Round the value to `precision` digits after the radix point.
    pub fn round_normal(
        &mut self,
        precision: usize,
        negative: bool,
        rm: RoundingMode,
    ) {
        let keep = precision as i64 + self.shift;
        if keep >= 0 {
            self.round_fraction(keep as usize, negative, rm);
        } else {
            // The cut is inside the integer part of the window.
            let frac_nonzero = !self.frac.is_zero();
            self.int.round_at((-keep) as usize, negative, rm, frac_nonzero);
            self.frac.clear();
        }
    }

    /// Round the value to `precision` digits after the leading digit.
    /// Returns the exponent of the rounded value, which can be one more
    /// than the exponent before rounding.
    pub fn round_scientific(
        &mut self,
        precision: usize,
        negative: bool,
        rm: RoundingMode,
    ) -> Option<i64> {
        let exp = self.window_exponent()?;
        let low = exp - precision as i64;
        if low >= 1 {
            // The cut is inside the integer part.
            let frac_nonzero = !self.frac.is_zero();
            self.int.round_at(low as usize, negative, rm, frac_nonzero);
            self.frac.clear();
        } else {
            self.round_fraction((-low) as usize, negative, rm);
        }
        self.exponent()
    }

    /// Round for the general notation with `precision` significant digits.
    /// The notation is selected by the exponent of a trial rounding of a
    /// copy. The selected rounding is then applied once to the value.
    pub fn round_general(
        &mut self,
        precision: usize,
        negative: bool,
        rm: RoundingMode,
    ) -> Layout {
        let p = precision.max(1);
        let mut trial = *self;
        let exp = trial.round_scientific(p - 1, negative, rm).unwrap_or(0);
        if exp < -4 || exp >= p as i64 {
            let exponent = self.round_scientific(p - 1, negative, rm);
            return Layout {
                notation: Notation::Scientific,
                exponent: exponent.unwrap_or(0),
                digits: p - 1,
            };
        }
        let digits = (p as i64 - 1 - exp) as usize;
        self.round_normal(digits, negative, rm);
        Layout {
            notation: Notation::Normal,
            exponent: self.exponent().unwrap_or(0),
            digits,
        }
    }

    /// Returns the layout that shows every digit of the value.
    fn exact_layout(&self, flags: FormatFlags) -> Layout {
        let exponent = self.exponent().unwrap_or(0);
        let sig = self.significant_digits();
        let scientific = flags.is_scientific()
            || (flags.is_general()
                && (exponent < -4 || exponent >= sig.max(1) as i64));
        if scientific {
            return Layout {
                notation: Notation::Scientific,
                exponent,
                digits: sig.saturating_sub(1),
            };
        }
        Layout {
            notation: Notation::Normal,
            exponent,
            digits: self.lowest_exponent().map_or(0, |lo| (-lo).max(0) as usize),
        }
    }

    /// Round the value as requested by `format`, and return the shape of
    /// the numeral.
    pub fn round(&mut self, format: &Format, negative: bool) -> Layout {
        let flags = format.flags;
        let rm = format.rounding;
        let p = format.precision;
        if flags.contains(FormatFlags::EXACT) {
            return self.exact_layout(flags);
        }
        if flags.is_general() {
            return self.round_general(p, negative, rm);
        }
        if flags.is_scientific() {
            let exponent = self.round_scientific(p, negative, rm);
            return Layout {
                notation: Notation::Scientific,
                exponent: exponent.unwrap_or(0),
                digits: p,
            };
        }
        self.round_normal(p, negative, rm);
        Layout {
            notation: Notation::Normal,
            exponent: self.exponent().unwrap_or(0),
            digits: p,
        }
    }
}

#[cfg(test)]
fn expand_decimal(val: f64) -> Expansion<64> {
    use super::bigint::Radix;
    use super::expand::expand;
    use super::float::{FloatBits, FP64};
    let bits = FloatBits::unpack(FP64, val.abs().to_bits() as u128);
    let (m, q) = bits.significand(FP64);
    expand::<64>(m, q, Radix::Decimal).unwrap()
}

#[cfg(test)]
fn int_frac(x: &Expansion<64>, frac_digits: usize) -> String {
    let mut s = String::new();
    x.int.to_chars(false, None, &mut s);
    s.push('.');
    x.frac.to_chars(false, 0, frac_digits, &mut s);
    s
}

#[test]
fn test_exponent() {
    assert_eq!(expand_decimal(1234.5).exponent(), Some(3));
    assert_eq!(expand_decimal(0.015625).exponent(), Some(-2));
    assert_eq!(expand_decimal(0.0).exponent(), None);
    assert_eq!(expand_decimal(1234.5).significant_digits(), 5);
    assert_eq!(expand_decimal(1200.0).significant_digits(), 2);
    assert_eq!(expand_decimal(0.015625).significant_digits(), 5);
}

#[test]
fn test_round_normal() {
    use RoundingMode::*;
    let mut x = expand_decimal(2.675);
    // 2.675 is really 2.67499999999999982236431605997495353221893310546875.
    x.round_normal(2, false, NearestTiesToEven);
    assert_eq!(int_frac(&x, 2), "2.67");

    let mut x = expand_decimal(0.125);
    x.round_normal(2, false, NearestTiesToEven);
    assert_eq!(int_frac(&x, 2), ".12");
    let mut x = expand_decimal(0.125);
    x.round_normal(2, false, NearestTiesToAway);
    assert_eq!(int_frac(&x, 2), ".13");

    let mut x = expand_decimal(9.96);
    x.round_normal(1, false, NearestTiesToEven);
    assert_eq!(int_frac(&x, 1), "10.0");
    assert!(x.bi_available);

    // A carry out of a fraction with no kept digits.
    let mut x = expand_decimal(0.5);
    x.round_normal(0, false, NearestTiesToEven);
    assert!(!x.bi_available);
    let mut x = expand_decimal(1.5);
    x.round_normal(0, false, NearestTiesToEven);
    assert_eq!(int_frac(&x, 0), "2.");
    let mut x = expand_decimal(0.75);
    x.round_normal(0, true, Negative);
    assert_eq!(int_frac(&x, 0), "1.");
}

#[test]
fn test_round_scientific() {
    use RoundingMode::*;
    let mut x = expand_decimal(123456.0);
    assert_eq!(x.round_scientific(2, false, NearestTiesToEven), Some(5));
    assert_eq!(int_frac(&x, 0), "123000.");

    let mut x = expand_decimal(999.9);
    assert_eq!(x.round_scientific(2, false, NearestTiesToEven), Some(3));
    assert_eq!(int_frac(&x, 0), "1000.");

    let mut x = expand_decimal(0.00123456);
    assert_eq!(x.round_scientific(1, false, Positive), Some(-3));
    assert_eq!(int_frac(&x, 4), ".0013");

    let mut x = expand_decimal(123.456);
    assert_eq!(x.round_scientific(2, false, Zero), Some(2));
    assert_eq!(int_frac(&x, 1), "123.0");
    assert!(x.frac.is_zero());
}

#[test]
fn test_round_general_selection() {
    let nearest = RoundingMode::NearestTiesToEven;

    let mut x = expand_decimal(123456.0);
    let layout = x.round_general(6, false, nearest);
    assert_eq!(layout.notation, Notation::Normal);
    assert_eq!(layout.digits, 0);

    let mut x = expand_decimal(1234567.0);
    let layout = x.round_general(6, false, nearest);
    assert_eq!(layout.notation, Notation::Scientific);
    assert_eq!(layout.exponent, 6);
    assert_eq!(layout.digits, 5);

    // 999999.5 rounds to 1e+06 at six digits, which selects scientific.
    let mut x = expand_decimal(999999.5);
    let layout = x.round_general(6, false, nearest);
    assert_eq!(layout.notation, Notation::Scientific);
    assert_eq!(layout.exponent, 6);

    let mut x = expand_decimal(0.0001);
    let layout = x.round_general(6, false, nearest);
    assert_eq!(layout.notation, Notation::Normal);
    assert_eq!(layout.digits, 9);

    let mut x = expand_decimal(0.00001);
    let layout = x.round_general(6, false, nearest);
    assert_eq!(layout.notation, Notation::Scientific);
    assert_eq!(layout.exponent, -5);

    // A precision of zero is treated as one.
    let mut x = expand_decimal(25.0);
    let layout = x.round_general(0, false, nearest);
    assert_eq!(layout.notation, Notation::Scientific);
    assert_eq!(layout.exponent, 1);
    assert_eq!(layout.digits, 0);
}

#[test]
fn test_exact_layout() {
    let x = expand_decimal(0.375);
    let layout = x.exact_layout(FormatFlags::NORMAL);
    assert_eq!(layout.notation, Notation::Normal);
    assert_eq!(layout.digits, 3);

    let layout = x.exact_layout(FormatFlags::SCIENTIFIC);
    assert_eq!(layout.notation, Notation::Scientific);
    assert_eq!(layout.exponent, -1);
    assert_eq!(layout.digits, 2);

    // 1e15 has one significant digit: general prefers scientific.
    let x = expand_decimal(1e15);
    let layout = x.exact_layout(FormatFlags::GENERAL);
    assert_eq!(layout.notation, Notation::Scientific);
    assert_eq!(layout.digits, 0);
}

#[test]
fn test_round_shifted_window() {
    use super::bigint::Radix;
    use super::expand::expand_scaled;
    let nearest = RoundingMode::NearestTiesToEven;

    // 2^200 = 1.606938044258990275541962092341162602522202993782792835301376e+60
    let mut x = expand_scaled::<2>(1, 200, Radix::Decimal).unwrap();
    assert_eq!(x.exponent(), Some(60));
    assert_eq!(x.round_scientific(5, false, nearest), Some(60));
    assert_eq!(x.int.top_digit(), Some(33));
    assert_eq!(x.int.digit_at(28), 4);
    assert_eq!(x.int.lowest_nonzero(), Some(28));

    let mut x = expand_scaled::<2>(1, 200, Radix::Decimal).unwrap();
    let layout = x.round(&Format::default(), false);
    assert_eq!(layout.notation, Notation::Scientific);
    assert_eq!(layout.exponent, 60);

    // Hex windows: 0xf8 * 16^1000 in positional notation keeps every digit.
    let mut x = expand_scaled::<2>(0x1f, 4003, Radix::Hex).unwrap();
    assert_eq!(x.lowest_exponent(), Some(1000));
    x.round_normal(3, false, nearest);
    assert_eq!(x.exponent(), Some(1001));
    let layout = x.exact_layout(FormatFlags::NORMAL);
    assert_eq!(layout.digits, 0);
    assert_eq!(x.significant_digits(), 2);

    // 2^-4001 = 0x8 * 16^-1001
    let mut x = expand_scaled::<2>(1, -4001, Radix::Hex).unwrap();
    assert_eq!(x.exponent(), Some(-1001));
    assert_eq!(x.exact_layout(FormatFlags::NORMAL).digits, 1001);
    assert_eq!(x.round_scientific(2, false, nearest), Some(-1001));
}
