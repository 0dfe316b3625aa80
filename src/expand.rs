//! Expands the exact value of a binary float into the big-radix integer and
//! fraction pair. No rounding happens here, except when the planned
//! fraction is shorter than the exact expansion. In that case the dropped
//! digits are tracked by the sticky flag of the fraction.
//!
//! Values too large or too small for the largest class are expanded into a
//! window of their leading digits, with a radix exponent on the side.

use super::bigint::{divide_pair, multiply_pair, BigRadixFrac, BigRadixInt, Radix};
use super::error::BigNumError;

/// The value `(int + frac) * B^shift`, in the radix B of the conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Expansion<const N: usize> {
    pub int: BigRadixInt<N>,
    pub frac: BigRadixFrac<N>,
    /// The radix exponent of the window. Zero for exact expansions.
    pub shift: i64,
    /// Bounds the digits lost to truncation: the exact value is below the
    /// stored one plus `error` units of the bottom cell of the fraction.
    pub error: u64,
    /// True when the value has a nonzero integer part.
    pub bi_available: bool,
}

/// Returns the bit of `m * 2^q` with the weight 2^e.
fn bit_at(m: u128, q: i64, e: i64) -> bool {
    let idx = e - q;
    if !(0..u128::BITS as i64).contains(&idx) {
        return false;
    }
    (m >> idx) & 1 == 1
}

/// Expand the value `m * 2^q`.
pub(crate) fn expand<const N: usize>(
    m: u128,
    q: i64,
    radix: Radix,
) -> Result<Expansion<N>, BigNumError> {
    let mut int = BigRadixInt::<N>::new(radix);
    let mut frac = BigRadixFrac::<N>::new(radix);

    if m != 0 {
        let top = (u128::BITS - 1 - m.leading_zeros()) as i64 + q;
        let low = m.trailing_zeros() as i64 + q;

        // The bits at and above the radix point, from the most significant
        // bit down: x = 2x + bit.
        let one = BigRadixInt::<N>::from_u64(radix, 1);
        for e in (0..=top).rev() {
            int.double();
            if bit_at(m, q, e) {
                int.add(&one);
            }
            if int.is_overflowed() {
                return Err(BigNumError::CapacityExceeded);
            }
        }

        // The bits below the radix point, from the least significant bit
        // up: x = x/2 + bit/2.
        let half = BigRadixFrac::<N>::half(radix);
        for e in low..0 {
            frac.halve();
            if bit_at(m, q, e) {
                let carry = frac.add(&half);
                debug_assert!(!carry, "the fraction is below one");
            }
        }
    }

    // Every halving loses less than a unit of the bottom cell, and halves
    // the earlier losses.
    let error = if frac.is_inexact() { 2 } else { 0 };
    Ok(Expansion {
        bi_available: !int.is_zero(),
        int,
        frac,
        shift: 0,
        error,
    })
}

/// Expand `m * 2^q` into a window of its leading digits. The integer part
/// keeps its leading digit near the top of the capacity, and the radix
/// exponent of the window goes to `shift`.
pub(crate) fn expand_scaled<const N: usize>(
    m: u128,
    q: i64,
    radix: Radix,
) -> Result<Expansion<N>, BigNumError> {
    let mut x = match radix {
        // 2^q = 16^(q div 4) * 2^(q mod 4), so the hex window is exact.
        Radix::Hex => {
            let mut x = expand::<N>(m, q.rem_euclid(4), radix)?;
            x.shift = q.div_euclid(4);
            x
        }
        Radix::Decimal => scale_decimal::<N>(m, q)?,
    };
    x.bi_available = x.shift >= 0 && !x.int.is_zero();
    Ok(x)
}

/// Computes the decimal window of `m * 2^q` by doubling or halving it `|q|`
/// times. Dividing or multiplying the window by ten keeps the leading digit
/// at the top position.
fn scale_decimal<const N: usize>(m: u128, q: i64) -> Result<Expansion<N>, BigNumError> {
    let mut x = expand::<N>(m, 0, Radix::Decimal)?;
    let top = N * Radix::Decimal.digits_per_limb() - 3;
    let is_full = |int: &BigRadixInt<N>| int.top_digit().is_some_and(|d| d >= top);

    if q >= 0 {
        for _ in 0..q {
            if is_full(&x.int) {
                divide_pair(&mut x.int, &mut x.frac, 10);
                x.shift += 1;
                x.error = x.error.div_ceil(10) + 1;
            }
            multiply_pair(&mut x.int, &mut x.frac, 2);
            x.error = x.error.saturating_mul(2);
        }
    } else {
        for _ in 0..q.unsigned_abs() {
            while !is_full(&x.int) {
                multiply_pair(&mut x.int, &mut x.frac, 10);
                x.shift -= 1;
                x.error = x.error.saturating_mul(10);
            }
            divide_pair(&mut x.int, &mut x.frac, 2);
            x.error = x.error.div_ceil(2) + 1;
        }
    }
    if x.int.is_overflowed() {
        return Err(BigNumError::CapacityExceeded);
    }
    Ok(x)
}

impl<const N: usize> Expansion<N> {
    /// Returns the largest value the truncated digits could stand for. An
    /// exact expansion is its own bound.
    pub fn upper_bound(&self) -> Self {
        let mut hi = *self;
        if hi.frac.add_units(self.error) {
            hi.int.increment();
        }
        hi
    }
}

#[cfg(test)]
fn expand_f64<const N: usize>(val: f64, radix: Radix) -> Expansion<N> {
    use super::float::{FloatBits, FP64};
    let bits = FloatBits::unpack(FP64, val.to_bits() as u128);
    let (m, q) = bits.significand(FP64);
    expand::<N>(m, q, radix).unwrap()
}

#[cfg(test)]
fn digits<const N: usize>(x: &Expansion<N>) -> (String, String) {
    let mut int = String::new();
    x.int.to_chars(false, None, &mut int);
    let mut frac = String::new();
    let end = x.frac.last_nonzero().map_or(0, |j| j + 1);
    x.frac.to_chars(false, 0, end, &mut frac);
    (int, frac)
}

#[test]
fn test_expand_simple() {
    let x = expand_f64::<2>(6.375, Radix::Decimal);
    assert!(x.bi_available);
    assert_eq!(digits(&x), ("6".to_string(), "375".to_string()));

    let x = expand_f64::<2>(6.375, Radix::Hex);
    assert_eq!(digits(&x), ("6".to_string(), "6".to_string()));

    let x = expand_f64::<2>(0.25, Radix::Decimal);
    assert!(!x.bi_available);
    assert_eq!(digits(&x), ("".to_string(), "25".to_string()));

    let x = expand_f64::<2>(1024.0, Radix::Hex);
    assert_eq!(digits(&x), ("400".to_string(), "".to_string()));

    let x = expand_f64::<2>(0.0, Radix::Decimal);
    assert!(!x.bi_available);
    assert!(x.frac.is_zero());
}

#[test]
fn test_expand_exact_tenth() {
    let x = expand_f64::<4>(0.1, Radix::Decimal);
    let (_, frac) = digits(&x);
    assert_eq!(
        frac,
        "1000000000000000055511151231257827021181583404541015625"
    );
    assert!(!x.frac.is_inexact());
}

#[test]
fn test_expand_extremes() {
    let x = expand_f64::<64>(f64::from_bits(1), Radix::Decimal);
    let (_, frac) = digits(&x);
    assert_eq!(frac.len(), 1074);
    assert!(frac[323..].starts_with("4940656458412465441765687928682213723650"));
    assert!(frac.ends_with("625"));

    let x = expand_f64::<32>(f64::MAX, Radix::Decimal);
    let (int, _) = digits(&x);
    assert_eq!(int.len(), 309);
    assert!(int.starts_with("17976931348623157"));

    let x = expand_f64::<32>(f64::MAX, Radix::Hex);
    let (int, _) = digits(&x);
    let top = format!("{:x}", ((1u128 << 53) - 1) << 3);
    assert_eq!(int, top + &"0".repeat(242));
}

#[test]
fn test_expand_scaled_decimal() {
    // 2^200 = 1606938044258990275541962092341162602522202993782792835301376.
    // The digits divided out of the window still fit the fraction.
    let x = expand_scaled::<2>(1, 200, Radix::Decimal).unwrap();
    let (int, frac) = digits(&x);
    assert_eq!(int, "1606938044258990275541962092341162");
    assert_eq!(frac, "602522202993782792835301376");
    assert_eq!(x.shift, 61 - 34);
    assert!(!x.frac.is_inexact());
    assert!(x.error > 0);
    assert!(x.bi_available);
    let hi = x.upper_bound();
    assert!(hi.frac != x.frac);

    // 2^-200 = 6.2230152778611417071440640537801242405902521687...e-61
    let x = expand_scaled::<2>(1, -200, Radix::Decimal).unwrap();
    let (int, _) = digits(&x);
    assert_eq!(int, "622301527786114170714406405378012");
    assert_eq!(x.shift, -93);
    assert!(x.frac.is_inexact());
    assert!(!x.bi_available);

    // 3 * 2^-2 is expanded exactly.
    let x = expand_scaled::<1>(3, -2, Radix::Decimal).unwrap();
    let (int, frac) = digits(&x);
    assert_eq!((int.as_str(), frac.as_str()), ("750000000000000", ""));
    assert_eq!(x.shift, -15);
    assert_eq!(x.error, 2);
}

#[test]
fn test_expand_scaled_hex() {
    let x = expand_scaled::<2>(0x1f, 4003, Radix::Hex).unwrap();
    assert_eq!(digits(&x), ("f8".to_string(), "".to_string()));
    assert_eq!(x.shift, 1000);
    assert_eq!(x.error, 0);

    let x = expand_scaled::<2>(1, -4001, Radix::Hex).unwrap();
    assert_eq!(digits(&x), ("8".to_string(), "".to_string()));
    assert_eq!(x.shift, -1001);
    assert!(!x.bi_available);
    assert_eq!(x.upper_bound(), x);
}

#[test]
fn test_expand_truncated() {
    // A single limb cannot hold the 1074 digits of the smallest denormal.
    let x = expand_f64::<1>(f64::from_bits(1), Radix::Decimal);
    assert!(x.frac.is_inexact());
    assert!(!x.frac.is_zero());
    assert_eq!(x.frac.first_nonzero(), None);

    // 2^100 does not fit a single limb.
    let bits = (1u128 << 100, 0);
    assert_eq!(
        expand::<1>(bits.0, bits.1, Radix::Decimal).err(),
        Some(BigNumError::CapacityExceeded)
    );
}
