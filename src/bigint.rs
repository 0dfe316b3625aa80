//! This module contains the fixed-capacity radix-10/16 numbers that hold the
//! exact value of a float during conversion. The value is split at the radix
//! point into an integer number and a fraction number. Both are arrays of
//! `N` limbs, where every limb packs several digits of the radix in a `u64`.
//! The capacity is selected per conversion (see `capacity.rs`) so the
//! numbers never grow and live on the stack.

use super::error::BigNumError;
use super::float::{LossFraction, RoundingMode};
use super::render::Sink;

type PartTy = u64;

const fn powers<const K: usize>(base: u64) -> [u64; K] {
    let mut table = [1; K];
    let mut i = 1;
    while i < K {
        table[i] = table[i - 1] * base;
        i += 1;
    }
    table
}

const POW10: [u64; 19] = powers::<19>(10);
const POW16: [u64; 16] = powers::<16>(16);

/// The radix of the digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Hex,
}

impl Radix {
    /// Returns the base (10 or 16).
    pub const fn base(self) -> u64 {
        match self {
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }

    /// Returns the number of digits stored in one limb. Limbs stay below
    /// 2^63 so that doubling a limb never overflows.
    pub const fn digits_per_limb(self) -> usize {
        match self {
            Radix::Decimal => 18,
            Radix::Hex => 15,
        }
    }

    /// Returns base^digits_per_limb, the exclusive upper bound of a limb.
    pub const fn limb_ceiling(self) -> u64 {
        self.pow(self.digits_per_limb())
    }

    /// Returns base^n, for n <= digits_per_limb.
    pub const fn pow(self, n: usize) -> u64 {
        match self {
            Radix::Decimal => POW10[n],
            Radix::Hex => POW16[n],
        }
    }

    /// Returns half of the base, the digit that starts a tie.
    pub const fn half(self) -> u64 {
        self.base() / 2
    }

    /// Returns the ASCII character for the digit `d`.
    pub fn digit_char(self, d: u8, upper: bool) -> u8 {
        debug_assert!((d as u64) < self.base());
        match d {
            0..=9 => b'0' + d,
            _ if upper => b'A' + d - 10,
            _ => b'a' + d - 10,
        }
    }

    /// Returns the value of the ASCII digit `c`, if it is a digit of this
    /// radix.
    pub fn digit_value(self, c: u8) -> Option<u8> {
        let d = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => return None,
        };
        if (d as u64) < self.base() {
            Some(d)
        } else {
            None
        }
    }
}

#[test]
fn test_radix_table() {
    assert_eq!(Radix::Decimal.limb_ceiling(), 1_000_000_000_000_000_000);
    assert_eq!(Radix::Hex.limb_ceiling(), 1 << 60);
    assert_eq!(Radix::Hex.pow(3), 4096);
    assert!(Radix::Decimal.limb_ceiling() * 2 > Radix::Decimal.limb_ceiling());
    assert_eq!(Radix::Hex.digit_char(11, true), b'B');
    assert_eq!(Radix::Hex.digit_char(11, false), b'b');
    assert_eq!(Radix::Decimal.digit_value(b'a'), None);
    assert_eq!(Radix::Hex.digit_value(b'F'), Some(15));
    assert_eq!(Radix::Decimal.half(), 5);
    assert_eq!(Radix::Hex.half(), 8);
}

/// The shape of a run of digits with an optional embedded radix point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DigitRun {
    /// The number of bytes in the run (digits and the point).
    pub len: usize,
    /// The number of digits in the run.
    pub digits: usize,
    /// The number of digits before the radix point.
    pub int_digits: usize,
    /// The number of zero digits before the first nonzero digit.
    pub leading_zeros: usize,
}

impl DigitRun {
    /// Scan the digit run at the start of `text`.
    pub fn scan(text: &[u8], radix: Radix) -> Self {
        let mut run = DigitRun {
            len: 0,
            digits: 0,
            int_digits: 0,
            leading_zeros: 0,
        };
        let mut seen_point = false;
        let mut seen_nonzero = false;
        for &c in text {
            if c == b'.' && !seen_point {
                seen_point = true;
                run.len += 1;
                continue;
            }
            let Some(d) = radix.digit_value(c) else {
                break;
            };
            run.len += 1;
            run.digits += 1;
            if !seen_point {
                run.int_digits += 1;
            }
            if d != 0 {
                seen_nonzero = true;
            } else if !seen_nonzero {
                run.leading_zeros += 1;
            }
        }
        run
    }

    /// Returns true if the run has no nonzero digit.
    pub fn is_zero(&self) -> bool {
        self.leading_zeros == self.digits
    }

    /// Iterate over the digit values of the run in `text`.
    fn values<'a>(
        &self,
        text: &'a [u8],
        radix: Radix,
    ) -> impl Iterator<Item = u8> + 'a {
        text[..self.len]
            .iter()
            .filter_map(move |&c| radix.digit_value(c))
    }
}

#[test]
fn test_scan_digit_run() {
    let run = DigitRun::scan(b"0012.50e3", Radix::Decimal);
    assert_eq!(run.len, 7);
    assert_eq!(run.digits, 6);
    assert_eq!(run.int_digits, 4);
    assert_eq!(run.leading_zeros, 2);

    let run = DigitRun::scan(b".0.1", Radix::Decimal);
    assert_eq!(run.len, 2);
    assert_eq!(run.digits, 1);
    assert!(run.is_zero());

    let run = DigitRun::scan(b"fe.8p1", Radix::Hex);
    assert_eq!(run.len, 4);
    assert_eq!(run.int_digits, 2);
}

/// The integer part of a number: the limbs are ordered from the least
/// significant to the most significant. Digit `k` has the weight B^k.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigRadixInt<const N: usize> {
    radix: Radix,
    limbs: [PartTy; N],
    // The carry-out cell above the top limb. Must stay zero when the
    // capacity was planned correctly.
    over: PartTy,
}

impl<const N: usize> BigRadixInt<N> {
    /// Create a new zero number.
    pub fn new(radix: Radix) -> Self {
        BigRadixInt {
            radix,
            limbs: [0; N],
            over: 0,
        }
    }

    /// Create a number with the value `val`, which must fit in one limb.
    pub fn from_u64(radix: Radix, val: u64) -> Self {
        debug_assert!(val < radix.limb_ceiling());
        let mut x = Self::new(radix);
        if N > 0 {
            x.limbs[0] = val;
        } else {
            x.over = val;
        }
        x
    }

    /// Return true if the number is equal to zero.
    pub fn is_zero(&self) -> bool {
        self.over == 0 && self.limbs.iter().all(|&l| l == 0)
    }

    /// Returns true if a carry escaped the top limb.
    pub fn is_overflowed(&self) -> bool {
        self.over != 0
    }

    /// Add `rhs` to this number.
    pub fn add(&mut self, rhs: &Self) {
        debug_assert_eq!(self.radix, rhs.radix);
        let ceil = self.radix.limb_ceiling();
        let mut carry = 0;
        for (l, r) in self.limbs.iter_mut().zip(rhs.limbs.iter()) {
            let sum = *l + *r + carry;
            (*l, carry) = if sum >= ceil { (sum - ceil, 1) } else { (sum, 0) };
        }
        self.over += rhs.over + carry;
    }

    /// Add one unit at digit `pos`, and propagate the carry.
    fn increment_at(&mut self, pos: usize) {
        let dpl = self.radix.digits_per_limb();
        let ceil = self.radix.limb_ceiling();
        let (li, r) = (pos / dpl, pos % dpl);
        if li >= N {
            self.over += 1;
            return;
        }
        let mut carry = self.radix.pow(r);
        for limb in self.limbs[li..].iter_mut() {
            let sum = *limb + carry;
            if sum < ceil {
                *limb = sum;
                return;
            }
            *limb = sum - ceil;
            carry = 1;
        }
        self.over += carry;
    }

    /// Add one to the number.
    pub fn increment(&mut self) {
        self.increment_at(0);
    }

    /// Multiply the number by two.
    pub fn double(&mut self) {
        let ceil = self.radix.limb_ceiling();
        let mut carry = 0;
        for limb in self.limbs.iter_mut() {
            let v = *limb * 2 + carry;
            (*limb, carry) = if v >= ceil { (v - ceil, 1) } else { (v, 0) };
        }
        self.over = self.over * 2 + carry;
    }

    /// Multiply the number by the small constant `d` (at most the base),
    /// and add `carry` (less than `d`) to the product.
    pub fn multiply_by_small(&mut self, d: u64, mut carry: u64) {
        debug_assert!(d <= self.radix.base() && (carry < d || carry == 0));
        let ceil = self.radix.limb_ceiling();
        for limb in self.limbs.iter_mut() {
            let v = *limb * d + carry;
            (*limb, carry) = (v % ceil, v / ceil);
        }
        self.over = self.over * d + carry;
    }

    /// Divide the number by two. Returns the bit that was shifted out below
    /// the radix point.
    pub fn halve(&mut self) -> u8 {
        self.divide_by_small(2) as u8
    }

    /// Divide the number by the small constant `d` and return the
    /// remainder.
    pub fn divide_by_small(&mut self, d: u64) -> u64 {
        let ceil = self.radix.limb_ceiling();
        // The partial dividend rem * ceil + limb must fit in a u64.
        debug_assert!(d > 0 && d <= 16);
        let mut rem = self.over % d;
        self.over /= d;
        for limb in self.limbs.iter_mut().rev() {
            let cur = rem * ceil + *limb;
            *limb = cur / d;
            rem = cur % d;
        }
        rem
    }

    /// Returns the digit at position `pos` (the coefficient of B^pos).
    /// Positions beyond the capacity read as zero.
    pub fn digit_at(&self, pos: usize) -> u8 {
        let dpl = self.radix.digits_per_limb();
        let (li, r) = (pos / dpl, pos % dpl);
        if li >= N {
            return 0;
        }
        ((self.limbs[li] / self.radix.pow(r)) % self.radix.base()) as u8
    }

    /// Sets the digit at `pos`, which must currently be zero.
    fn put_digit(&mut self, pos: usize, d: u8) -> Result<(), BigNumError> {
        if d == 0 {
            return Ok(());
        }
        let dpl = self.radix.digits_per_limb();
        let (li, r) = (pos / dpl, pos % dpl);
        if li >= N {
            return Err(BigNumError::CapacityExceeded);
        }
        debug_assert_eq!(self.digit_at(pos), 0);
        self.limbs[li] += d as u64 * self.radix.pow(r);
        Ok(())
    }

    /// Returns the position of the most significant nonzero digit.
    pub fn top_digit(&self) -> Option<usize> {
        debug_assert!(!self.is_overflowed());
        let dpl = self.radix.digits_per_limb();
        let li = self.limbs.iter().rposition(|&l| l != 0)?;
        let limb = self.limbs[li];
        let r = (0..dpl).rev().find(|&r| limb >= self.radix.pow(r))?;
        Some(li * dpl + r)
    }

    /// Returns the position of the least significant nonzero digit.
    pub fn lowest_nonzero(&self) -> Option<usize> {
        let dpl = self.radix.digits_per_limb();
        let li = self.limbs.iter().position(|&l| l != 0)?;
        let limb = self.limbs[li];
        let r = (0..dpl).find(|&r| {
            (limb / self.radix.pow(r)) % self.radix.base() != 0
        })?;
        Some(li * dpl + r)
    }

    /// Returns true if all the digits below `pos` are zero.
    fn is_zero_below(&self, pos: usize) -> bool {
        let dpl = self.radix.digits_per_limb();
        let (li, r) = (pos / dpl, pos % dpl);
        if li >= N {
            return self.limbs.iter().all(|&l| l == 0);
        }
        self.limbs[..li].iter().all(|&l| l == 0)
            && self.limbs[li] % self.radix.pow(r) == 0
    }

    /// Zero out all of the digits below `pos`.
    fn truncate_below(&mut self, pos: usize) {
        let dpl = self.radix.digits_per_limb();
        let (li, r) = (pos / dpl, pos % dpl);
        if li >= N {
            self.limbs = [0; N];
            return;
        }
        self.limbs[..li].iter_mut().for_each(|l| *l = 0);
        self.limbs[li] -= self.limbs[li] % self.radix.pow(r);
    }

    /// Round the number so that `pos` is the lowest kept digit (`pos` >= 1).
    /// `frac_nonzero` reports a nonzero fraction below the radix point,
    /// which is part of the discarded tail.
    pub fn round_at(
        &mut self,
        pos: usize,
        negative: bool,
        rm: RoundingMode,
        frac_nonzero: bool,
    ) {
        debug_assert!(pos >= 1);
        let first = self.digit_at(pos - 1) as u64;
        let rest = frac_nonzero || !self.is_zero_below(pos - 1);
        let loss = LossFraction::from_digits(first, rest, self.radix.half());
        let odd = self.digit_at(pos) & 1 == 1;
        self.truncate_below(pos);
        if rm.need_round_away_from_zero(negative, odd, loss) {
            self.increment_at(pos);
        }
    }

    /// Writes the digits from position `from` (or from the most significant
    /// digit) down to position zero.
    pub fn to_chars(&self, upper: bool, from: Option<usize>, out: &mut dyn Sink) {
        let Some(top) = from.or_else(|| self.top_digit()) else {
            return;
        };
        for pos in (0..=top).rev() {
            out.push(self.radix.digit_char(self.digit_at(pos), upper));
        }
    }

    /// Load the integer digits of the digit run at the start of `text`.
    /// The radix point is moved `shift` digits to the right before the
    /// digits are placed. Returns the number of bytes consumed.
    pub fn from_chars(
        &mut self,
        text: &[u8],
        shift: i64,
    ) -> Result<usize, BigNumError> {
        let run = DigitRun::scan(text, self.radix);
        if run.digits == 0 {
            return Err(BigNumError::NoDigits);
        }
        let point = (run.int_digits as i64).saturating_add(shift);
        for (i, d) in run.values(text, self.radix).enumerate() {
            let place = point.saturating_sub(1 + i as i64);
            if place < 0 {
                break;
            }
            self.put_digit(place as usize, d)?;
        }
        Ok(run.len)
    }
}

/// The fractional part of a number: the limbs are ordered from the most
/// significant (next to the radix point) to the least significant. Digit
/// `j` has the weight B^-(j+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigRadixFrac<const N: usize> {
    radix: Radix,
    limbs: [PartTy; N],
    // The digit right below the last limb.
    under: PartTy,
    // Set when nonzero digits were discarded below `under`.
    sticky: bool,
}

impl<const N: usize> BigRadixFrac<N> {
    /// Create a new zero number.
    pub fn new(radix: Radix) -> Self {
        BigRadixFrac {
            radix,
            limbs: [0; N],
            under: 0,
            sticky: false,
        }
    }

    /// Create the number 1/2.
    pub fn half(radix: Radix) -> Self {
        let mut x = Self::new(radix);
        let dpl = radix.digits_per_limb();
        if N > 0 {
            x.limbs[0] = radix.half() * radix.pow(dpl - 1);
        } else {
            x.under = radix.half();
        }
        x
    }

    /// Returns the number of digits the limbs can hold.
    pub fn capacity_digits(&self) -> usize {
        N * self.radix.digits_per_limb()
    }

    /// Return true if the number is exactly zero (including the discarded
    /// digits).
    pub fn is_zero(&self) -> bool {
        self.under == 0 && !self.sticky && self.limbs.iter().all(|&l| l == 0)
    }

    /// Returns true if nonzero digits were discarded during the conversion.
    pub fn is_inexact(&self) -> bool {
        self.sticky
    }

    /// Set the number to zero.
    pub fn clear(&mut self) {
        *self = Self::new(self.radix);
    }

    /// Add `rhs` to this number. Returns the carry into the integer part.
    pub fn add(&mut self, rhs: &Self) -> bool {
        debug_assert_eq!(self.radix, rhs.radix);
        let base = self.radix.base();
        let ceil = self.radix.limb_ceiling();
        let u = self.under + rhs.under;
        self.under = u % base;
        let mut carry = u / base;
        for (l, r) in self.limbs.iter_mut().zip(rhs.limbs.iter()).rev() {
            let sum = *l + *r + carry;
            (*l, carry) = if sum >= ceil { (sum - ceil, 1) } else { (sum, 0) };
        }
        self.sticky |= rhs.sticky;
        carry == 1
    }

    /// Multiply the number by two. Returns the bit that crossed the radix
    /// point into the integer part.
    pub fn double(&mut self) -> u8 {
        let base = self.radix.base();
        let ceil = self.radix.limb_ceiling();
        let u = self.under * 2;
        self.under = u % base;
        let mut carry = u / base;
        for limb in self.limbs.iter_mut().rev() {
            let v = *limb * 2 + carry;
            (*limb, carry) = if v >= ceil { (v - ceil, 1) } else { (v, 0) };
        }
        carry as u8
    }

    /// Divide the number by two.
    pub fn halve(&mut self) {
        self.divide_by_small(0, 2);
    }

    /// Multiply the number by the small constant `d` (at most the base).
    /// Returns the integer part of the product, which is less than `d`.
    /// The discarded tail is scaled too, so the sticky flag is kept.
    pub fn multiply_by_small(&mut self, d: u64) -> u64 {
        debug_assert!(d <= self.radix.base());
        let base = self.radix.base();
        let ceil = self.radix.limb_ceiling();
        let u = self.under * d;
        self.under = u % base;
        let mut carry = u / base;
        for limb in self.limbs.iter_mut().rev() {
            let v = *limb * d + carry;
            (*limb, carry) = (v % ceil, v / ceil);
        }
        carry
    }

    /// Add `n` units of the bottom cell. Returns the carry into the integer
    /// part.
    pub fn add_units(&mut self, n: u64) -> bool {
        let base = self.radix.base();
        let ceil = self.radix.limb_ceiling();
        let u = self.under + n;
        self.under = u % base;
        let mut carry = u / base;
        for limb in self.limbs.iter_mut().rev() {
            if carry == 0 {
                break;
            }
            let v = *limb + carry;
            (*limb, carry) = (v % ceil, v / ceil);
        }
        carry != 0
    }

    /// Divide the number by the small constant `d`. `rem` is the remainder
    /// carried in from the integer part (less than `d`). Digits that fall
    /// off the bottom are folded into the sticky flag.
    pub fn divide_by_small(&mut self, mut rem: u64, d: u64) {
        debug_assert!(d > 0 && d <= 16 && rem < d);
        let ceil = self.radix.limb_ceiling();
        for limb in self.limbs.iter_mut() {
            let cur = rem * ceil + *limb;
            *limb = cur / d;
            rem = cur % d;
        }
        let cur = rem * self.radix.base() + self.under;
        self.under = cur / d;
        self.sticky |= cur % d != 0;
    }

    /// Returns the digit at position `j` (the coefficient of B^-(j+1)).
    /// Positions beyond the capacity read as zero.
    pub fn digit_at(&self, j: usize) -> u8 {
        let dpl = self.radix.digits_per_limb();
        let (li, r) = (j / dpl, j % dpl);
        if li < N {
            let div = self.radix.pow(dpl - 1 - r);
            return ((self.limbs[li] / div) % self.radix.base()) as u8;
        }
        if j == self.capacity_digits() {
            return self.under as u8;
        }
        0
    }

    /// Sets the digit at `j`, which must currently be zero. Digits below
    /// the bottom cell are folded into the sticky flag.
    fn put_digit(&mut self, j: usize, d: u8) {
        if d == 0 {
            return;
        }
        let dpl = self.radix.digits_per_limb();
        let (li, r) = (j / dpl, j % dpl);
        if li < N {
            self.limbs[li] += d as u64 * self.radix.pow(dpl - 1 - r);
        } else if j == self.capacity_digits() {
            self.under = d as u64;
        } else {
            self.sticky = true;
        }
    }

    /// Returns the position of the most significant nonzero digit.
    pub fn first_nonzero(&self) -> Option<usize> {
        let dpl = self.radix.digits_per_limb();
        let Some(li) = self.limbs.iter().position(|&l| l != 0) else {
            return (self.under != 0).then(|| self.capacity_digits());
        };
        let limb = self.limbs[li];
        let r = (0..dpl).find(|&r| limb >= self.radix.pow(dpl - 1 - r))?;
        Some(li * dpl + r)
    }

    /// Returns the position of the least significant nonzero digit.
    pub fn last_nonzero(&self) -> Option<usize> {
        if self.under != 0 {
            return Some(self.capacity_digits());
        }
        let dpl = self.radix.digits_per_limb();
        let li = self.limbs.iter().rposition(|&l| l != 0)?;
        let limb = self.limbs[li];
        let r = (0..dpl).rev().find(|&r| {
            let div = self.radix.pow(dpl - 1 - r);
            (limb / div) % self.radix.base() != 0
        })?;
        Some(li * dpl + r)
    }

    /// Returns true if any digit at position `j` or below is nonzero.
    fn is_nonzero_from(&self, j: usize) -> bool {
        if self.sticky {
            return true;
        }
        if j <= self.capacity_digits() && self.under != 0 {
            return true;
        }
        let dpl = self.radix.digits_per_limb();
        let (li, r) = (j / dpl, j % dpl);
        if li >= N {
            return false;
        }
        self.limbs[li] % self.radix.pow(dpl - r) != 0
            || self.limbs[li + 1..].iter().any(|&l| l != 0)
    }

    /// Zero out the digit at position `j` and all the digits below it.
    fn truncate_from(&mut self, j: usize) {
        let dpl = self.radix.digits_per_limb();
        let (li, r) = (j / dpl, j % dpl);
        if li < N {
            self.limbs[li] -= self.limbs[li] % self.radix.pow(dpl - r);
            self.limbs[li + 1..].iter_mut().for_each(|l| *l = 0);
        }
        if j <= self.capacity_digits() {
            self.under = 0;
        }
        self.sticky = false;
    }

    /// Add one unit at digit `j`, and propagate the carry toward the radix
    /// point. Returns the carry into the integer part.
    fn increment_at(&mut self, j: usize) -> bool {
        let dpl = self.radix.digits_per_limb();
        let ceil = self.radix.limb_ceiling();
        let (li, r) = (j / dpl, j % dpl);
        debug_assert!(li < N, "rounding below the capacity");
        if li >= N {
            return false;
        }
        let mut carry = self.radix.pow(dpl - 1 - r);
        for limb in self.limbs[..=li].iter_mut().rev() {
            let sum = *limb + carry;
            if sum < ceil {
                *limb = sum;
                return false;
            }
            *limb = sum - ceil;
            carry = 1;
        }
        true
    }

    /// Round the number to `keep` fractional digits. `lsd_odd` is the
    /// parity of the lowest integer digit, used for ties when `keep` is
    /// zero. Returns the carry into the integer part.
    pub fn round_at(
        &mut self,
        keep: usize,
        negative: bool,
        rm: RoundingMode,
        lsd_odd: bool,
    ) -> bool {
        let first = self.digit_at(keep) as u64;
        let rest = self.is_nonzero_from(keep + 1);
        let loss = LossFraction::from_digits(first, rest, self.radix.half());
        let odd = if keep == 0 {
            lsd_odd
        } else {
            self.digit_at(keep - 1) & 1 == 1
        };
        self.truncate_from(keep);
        if !rm.need_round_away_from_zero(negative, odd, loss) {
            return false;
        }
        if keep == 0 {
            return true;
        }
        self.increment_at(keep - 1)
    }

    /// Writes the digits in the position range `from..to`.
    pub fn to_chars(&self, upper: bool, from: usize, to: usize, out: &mut dyn Sink) {
        for j in from..to {
            out.push(self.radix.digit_char(self.digit_at(j), upper));
        }
    }

    /// Load the fractional digits of the digit run at the start of `text`.
    /// The radix point is moved `shift` digits to the right before the
    /// digits are placed. Returns the number of bytes consumed.
    pub fn from_chars(
        &mut self,
        text: &[u8],
        shift: i64,
    ) -> Result<usize, BigNumError> {
        let run = DigitRun::scan(text, self.radix);
        if run.digits == 0 {
            return Err(BigNumError::NoDigits);
        }
        let point = (run.int_digits as i64).saturating_add(shift);
        let bottom = self.capacity_digits() as i64;
        for (i, d) in run.values(text, self.radix).enumerate() {
            let j = (i as i64).saturating_sub(point);
            if j < 0 || d == 0 {
                continue;
            }
            if j > bottom {
                self.sticky = true;
                continue;
            }
            self.put_digit(j as usize, d);
        }
        Ok(run.len)
    }
}

/// Multiply the value `int + frac` by the small constant `d`.
pub(crate) fn multiply_pair<const N: usize>(
    int: &mut BigRadixInt<N>,
    frac: &mut BigRadixFrac<N>,
    d: u64,
) {
    let carry = frac.multiply_by_small(d);
    int.multiply_by_small(d, carry);
}

/// Divide the value `int + frac` by the small constant `d`. The digits
/// that fall off the bottom of the fraction set its sticky flag.
pub(crate) fn divide_pair<const N: usize>(
    int: &mut BigRadixInt<N>,
    frac: &mut BigRadixFrac<N>,
    d: u64,
) {
    let rem = int.divide_by_small(d);
    frac.divide_by_small(rem, d);
}

#[cfg(test)]
fn int_as_string<const N: usize>(x: &BigRadixInt<N>) -> String {
    let mut s = String::new();
    x.to_chars(false, None, &mut s);
    if s.is_empty() {
        s.push('0');
    }
    s
}

#[cfg(test)]
fn frac_as_string<const N: usize>(x: &BigRadixFrac<N>) -> String {
    let mut s = String::new();
    let end = x.last_nonzero().map_or(0, |j| j + 1);
    x.to_chars(false, 0, end, &mut s);
    s
}

#[test]
fn test_int_double_and_add() {
    let mut x = BigRadixInt::<2>::new(Radix::Decimal);
    let one = BigRadixInt::<2>::from_u64(Radix::Decimal, 1);
    // Compute 2^64 + 1 by doubling.
    x.add(&one);
    for _ in 0..64 {
        x.double();
    }
    x.add(&one);
    assert_eq!(int_as_string(&x), "18446744073709551617");
    assert_eq!(x.top_digit(), Some(19));
    assert_eq!(x.lowest_nonzero(), Some(0));
    assert!(!x.is_overflowed());

    let mut h = BigRadixInt::<1>::from_u64(Radix::Hex, 0xff);
    h.double();
    assert_eq!(int_as_string(&h), "1fe");
}

#[test]
fn test_int_overflow_cell() {
    let mut x = BigRadixInt::<1>::from_u64(Radix::Decimal, 999_999_999_999_999_999);
    assert!(!x.is_overflowed());
    x.double();
    assert!(x.is_overflowed());
    assert_eq!(x.halve(), 0);
    assert!(!x.is_overflowed());
    assert_eq!(x.digit_at(17), 9);
}

#[test]
fn test_int_halve_extracts_bits() {
    let mut x = BigRadixInt::<2>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"1000000000000000000000", 0), Ok(22));
    let mut bits = 0u128;
    let mut n = 0;
    while !x.is_zero() {
        bits |= (x.halve() as u128) << n;
        n += 1;
    }
    assert_eq!(bits, 1_000_000_000_000_000_000_000);
}

#[test]
fn test_int_divide_by_small() {
    let mut x = BigRadixInt::<2>::new(Radix::Hex);
    x.from_chars(b"123456789abcdef0123", 0).unwrap();
    assert_eq!(x.divide_by_small(8), 3);
    assert_eq!(int_as_string(&x), "2468acf13579bde024");
}

#[test]
fn test_int_from_chars_shift() {
    let mut x = BigRadixInt::<1>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"12.345x", 2), Ok(6));
    assert_eq!(int_as_string(&x), "1234");

    let mut x = BigRadixInt::<1>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"12", 3), Ok(2));
    assert_eq!(int_as_string(&x), "12000");

    let mut x = BigRadixInt::<1>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"x", 0), Err(BigNumError::NoDigits));

    // Leading zeros beyond the capacity are fine, nonzero digits are not.
    let mut x = BigRadixInt::<1>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"000000000000000000000007", 0), Ok(24));
    assert_eq!(int_as_string(&x), "7");
    let mut x = BigRadixInt::<1>::new(Radix::Decimal);
    assert_eq!(
        x.from_chars(b"7", 18),
        Err(BigNumError::CapacityExceeded)
    );
}

#[test]
fn test_int_round_at() {
    use RoundingMode::*;
    let load = |s: &[u8]| {
        let mut x = BigRadixInt::<2>::new(Radix::Decimal);
        x.from_chars(s, 0).unwrap();
        x
    };

    let mut x = load(b"12345");
    x.round_at(2, false, NearestTiesToEven, false);
    assert_eq!(int_as_string(&x), "12300");

    // Tie, the kept digit is odd.
    let mut x = load(b"1350");
    x.round_at(2, false, NearestTiesToEven, false);
    assert_eq!(int_as_string(&x), "1400");

    // Tie, the kept digit is even.
    let mut x = load(b"1250");
    x.round_at(2, false, NearestTiesToEven, false);
    assert_eq!(int_as_string(&x), "1200");

    // The fraction breaks the tie.
    let mut x = load(b"1250");
    x.round_at(2, false, NearestTiesToEven, true);
    assert_eq!(int_as_string(&x), "1300");

    // Carry across a limb boundary.
    let mut x = load(b"999999999999999999999");
    x.round_at(1, false, Positive, false);
    assert_eq!(int_as_string(&x), "1000000000000000000000");

    let mut x = load(b"1201");
    x.round_at(2, true, Positive, false);
    assert_eq!(int_as_string(&x), "1200");
    let mut x = load(b"1201");
    x.round_at(2, true, Negative, false);
    assert_eq!(int_as_string(&x), "1300");
}

#[test]
fn test_frac_halve_and_add() {
    // 1/2 + 1/4 + 1/8 in decimal and hex.
    let mut x = BigRadixFrac::<1>::new(Radix::Decimal);
    let half = BigRadixFrac::<1>::half(Radix::Decimal);
    for _ in 0..3 {
        x.halve();
        assert!(!x.add(&half));
    }
    assert_eq!(frac_as_string(&x), "875");

    let mut x = BigRadixFrac::<1>::new(Radix::Hex);
    let half = BigRadixFrac::<1>::half(Radix::Hex);
    for _ in 0..3 {
        x.halve();
        x.add(&half);
    }
    assert_eq!(frac_as_string(&x), "e");
    assert_eq!(x.first_nonzero(), Some(0));
}

#[test]
fn test_frac_truncation_is_sticky() {
    let mut x = BigRadixFrac::<1>::half(Radix::Decimal);
    // 2^-19 has 19 digits, one more than a limb holds.
    for _ in 0..18 {
        x.halve();
    }
    assert!(!x.is_inexact());
    assert_eq!(x.digit_at(18), 5);
    x.halve();
    assert!(x.is_inexact());
    assert_eq!(frac_as_string(&x), "0000009536743164062");
    assert!(!x.is_zero());
}

#[test]
fn test_frac_double_extracts_bits() {
    let mut x = BigRadixFrac::<1>::new(Radix::Decimal);
    x.from_chars(b"0.8125", 0).unwrap();
    let bits: [u8; 4] = core::array::from_fn(|_| x.double());
    assert_eq!(bits, [1, 1, 0, 1]);
    assert!(x.is_zero());
}

#[test]
fn test_frac_from_chars_shift() {
    let mut x = BigRadixFrac::<1>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"12.345", -4), Ok(6));
    assert_eq!(frac_as_string(&x), "0012345");
    assert_eq!(x.first_nonzero(), Some(2));
    assert_eq!(x.last_nonzero(), Some(6));

    // Digits past the bottom cell only set the sticky flag.
    let mut x = BigRadixFrac::<1>::new(Radix::Decimal);
    x.from_chars(b"1", -20).unwrap();
    assert_eq!(x.digit_at(18), 0);
    assert!(x.is_inexact());
    let mut x = BigRadixFrac::<1>::new(Radix::Decimal);
    x.from_chars(b"3", -19).unwrap();
    assert_eq!(x.digit_at(18), 3);
    assert!(!x.is_inexact());

    // The radix point saturates at the ends of the exponent range.
    let mut x = BigRadixFrac::<1>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"1.5", i64::MIN), Ok(3));
    assert!(x.is_inexact());
    assert_eq!(x.first_nonzero(), None);
    let mut x = BigRadixFrac::<1>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"1.5", i64::MAX), Ok(3));
    assert!(x.is_zero());
    let mut x = BigRadixInt::<1>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"1.5", i64::MIN), Ok(3));
    assert!(x.is_zero());
    let mut x = BigRadixInt::<1>::new(Radix::Decimal);
    assert_eq!(x.from_chars(b"1", i64::MAX), Err(BigNumError::CapacityExceeded));
}

#[test]
fn test_frac_round_at() {
    use RoundingMode::*;
    let load = |s: &[u8]| {
        let mut x = BigRadixFrac::<2>::new(Radix::Decimal);
        x.from_chars(s, 0).unwrap();
        x
    };

    let mut x = load(b".125");
    assert!(!x.round_at(2, false, NearestTiesToEven, false));
    assert_eq!(frac_as_string(&x), "12");

    let mut x = load(b".135");
    assert!(!x.round_at(2, false, NearestTiesToEven, false));
    assert_eq!(frac_as_string(&x), "14");

    let mut x = load(b".995");
    assert!(x.round_at(2, false, NearestTiesToAway, false));
    assert!(x.is_zero());

    // Rounding to zero digits uses the parity of the integer part.
    let mut x = load(b".5");
    assert!(!x.round_at(0, false, NearestTiesToEven, false));
    let mut x = load(b".5");
    assert!(x.round_at(0, false, NearestTiesToEven, true));

    let mut x = load(b".0001");
    assert!(!x.round_at(2, false, Zero, false));
    assert!(x.is_zero());
    let mut x = load(b".0001");
    assert!(!x.round_at(2, false, Positive, false));
    assert_eq!(frac_as_string(&x), "01");

    // Carry across the limb boundary.
    let mut x = load(b".9999999999999999999999");
    assert!(!x.round_at(20, false, Zero, false));
    assert_eq!(frac_as_string(&x), "99999999999999999999");
    let mut x = load(b".9999999999999999999999");
    assert!(x.round_at(19, false, NearestTiesToEven, false));
    assert!(x.is_zero());
}

#[test]
fn test_frac_add_units() {
    let mut x = BigRadixFrac::<1>::new(Radix::Decimal);
    x.from_chars(b".999999999999999999", 0).unwrap();
    // Seven units of the bottom cell: 0.9999999999999999997.
    assert!(!x.add_units(7));
    assert_eq!(x.digit_at(18), 7);
    assert!(x.add_units(3));
    assert!(x.is_zero());
}

#[test]
fn test_frac_divide_by_small() {
    let mut x = BigRadixFrac::<1>::new(Radix::Hex);
    x.from_chars(b".8", 0).unwrap();
    x.divide_by_small(1, 4);
    // (1 + 0.5) / 4 = 0.375 = 0x0.6
    assert_eq!(frac_as_string(&x), "6");
    assert!(!x.is_inexact());
}

#[test]
fn test_pair_scaling() {
    let mut int = BigRadixInt::<1>::new(Radix::Decimal);
    let mut frac = BigRadixFrac::<1>::new(Radix::Decimal);
    int.from_chars(b"12.75", 0).unwrap();
    frac.from_chars(b"12.75", 0).unwrap();
    multiply_pair(&mut int, &mut frac, 5);
    assert_eq!(int_as_string(&int), "63");
    assert_eq!(frac_as_string(&frac), "75");
    multiply_pair(&mut int, &mut frac, 10);
    assert_eq!(int_as_string(&int), "637");
    assert_eq!(frac_as_string(&frac), "5");
    divide_pair(&mut int, &mut frac, 5);
    assert_eq!(int_as_string(&int), "127");
    assert_eq!(frac_as_string(&frac), "5");
    assert!(!frac.is_inexact());

    // One third does not terminate.
    divide_pair(&mut int, &mut frac, 3);
    assert_eq!(int_as_string(&int), "42");
    assert_eq!(frac_as_string(&frac), "5");
    assert!(!frac.is_inexact());
    let mut one = BigRadixInt::<1>::from_u64(Radix::Hex, 1);
    let mut tail = BigRadixFrac::<1>::new(Radix::Hex);
    divide_pair(&mut one, &mut tail, 3);
    assert!(one.is_zero());
    assert_eq!(frac_as_string(&tail), "5555555555555555");
    assert!(tail.is_inexact());

    // Hex limbs take a full multiplication by the base.
    let mut h = BigRadixInt::<2>::new(Radix::Hex);
    h.from_chars(b"fffffffffffffff", 0).unwrap();
    h.multiply_by_small(16, 15);
    assert_eq!(int_as_string(&h), "ffffffffffffffff");
}
