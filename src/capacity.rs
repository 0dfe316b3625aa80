//! Selects the size of the big-radix numbers for a conversion. The numbers
//! come in a small closed set of sizes, so every conversion runs on stack
//! buffers with a bounded cost.

use super::bigint::{DigitRun, Radix};
use super::error::BigNumError;
use super::format::{Format, FormatFlags};
use super::utils::decimal_digits_for_bits;

/// The supported capacity classes, in limbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Capacity {
    L1,
    L2,
    L4,
    L8,
    L16,
    L32,
    L64,
}

impl Capacity {
    const ALL: [Capacity; 7] = [
        Capacity::L1,
        Capacity::L2,
        Capacity::L4,
        Capacity::L8,
        Capacity::L16,
        Capacity::L32,
        Capacity::L64,
    ];

    /// Returns the number of limbs of the class.
    pub fn limbs(self) -> usize {
        1 << (self as usize)
    }

    /// Returns the smallest class that holds `limbs` limbs.
    pub fn for_limbs(limbs: usize) -> Option<Capacity> {
        Self::ALL.into_iter().find(|c| c.limbs() >= limbs)
    }

    pub fn largest() -> Capacity {
        Capacity::L64
    }
}

/// Instantiate the generic function `$func::<N>` for the capacity class
/// `$cap` and call it.
macro_rules! with_capacity {
    ($cap:expr, $func:ident($($arg:expr),* $(,)?)) => {
        match $cap {
            Capacity::L1 => $func::<1>($($arg),*),
            Capacity::L2 => $func::<2>($($arg),*),
            Capacity::L4 => $func::<4>($($arg),*),
            Capacity::L8 => $func::<8>($($arg),*),
            Capacity::L16 => $func::<16>($($arg),*),
            Capacity::L32 => $func::<32>($($arg),*),
            Capacity::L64 => $func::<64>($($arg),*),
        }
    };
}
pub(crate) use with_capacity;

/// The outcome of the planning: the selected class and the digit counts it
/// was selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Plan {
    pub capacity: Capacity,
    pub int_digits: usize,
    pub frac_digits: usize,
}

impl Plan {
    fn new(
        radix: Radix,
        int_digits: usize,
        frac_digits: usize,
    ) -> Result<Self, BigNumError> {
        let digits = int_digits.max(frac_digits);
        // One extra limb keeps the rounding position away from the bottom
        // cell of a truncated fraction.
        let limbs = digits.div_ceil(radix.digits_per_limb()) + 1;
        let capacity =
            Capacity::for_limbs(limbs).ok_or(BigNumError::CapacityExceeded)?;
        Ok(Plan {
            capacity,
            int_digits,
            frac_digits,
        })
    }
}

/// Returns the number of digits needed to write an integer of `bits` bits.
fn int_digits_for_bits(radix: Radix, bits: usize) -> usize {
    match radix {
        Radix::Decimal => decimal_digits_for_bits(bits),
        Radix::Hex => bits.div_ceil(4),
    }
}

/// Plan the encoding of the finite nonzero value `m * 2^q`.
pub(crate) fn plan_encode(
    m: u128,
    q: i64,
    format: &Format,
) -> Result<Plan, BigNumError> {
    debug_assert!(m != 0);
    let radix = format.radix();
    // The exponents of the highest and the lowest set bits.
    let top = (u128::BITS - 1 - m.leading_zeros()) as i64 + q;
    let low = m.trailing_zeros() as i64 + q;

    let int_digits = if top >= 0 {
        int_digits_for_bits(radix, top as usize + 1)
    } else {
        0
    };

    // 2^-k has exactly k decimal digits, or ceil(k/4) hex digits.
    let exact_frac = if low < 0 {
        match radix {
            Radix::Decimal => (-low) as usize,
            Radix::Hex => ((-low) as usize).div_ceil(4),
        }
    } else {
        0
    };

    // An upper bound of the number of zero digits between the radix point
    // and the first nonzero digit.
    let leading_zeros = if top < 0 {
        match radix {
            Radix::Decimal => ((-top) as usize * 59) / 196 + 1,
            Radix::Hex => (-top) as usize / 4 + 1,
        }
    } else {
        0
    };

    let p = format.precision;
    let flags = format.flags;
    let requested = if format.has(FormatFlags::EXACT) {
        exact_frac
    } else if flags.is_scientific() {
        leading_zeros + p + 2
    } else if flags.is_general() {
        let p = p.max(1);
        (leading_zeros + p + 1).max(p + 4)
    } else {
        p + 1
    };

    Plan::new(radix, int_digits, requested.min(exact_frac))
}

/// Plan the encoding of `m * 2^q` on a window of its leading digits, for
/// values whose exact expansion does not fit the largest class. Hex
/// windows are exact, because a power of two is a power of 16 times a
/// small factor. Decimal windows only serve the notations that print a
/// bounded number of significant digits.
pub(crate) fn plan_encode_scaled(
    m: u128,
    format: &Format,
) -> Result<Plan, BigNumError> {
    let radix = format.radix();
    let flags = format.flags;
    // The significand, and up to three bits of the binary exponent.
    let bits = (u128::BITS - m.leading_zeros()) as usize + 3;
    let sig_digits = int_digits_for_bits(radix, bits);
    if radix == Radix::Hex {
        return Plan::new(radix, sig_digits, 0);
    }
    if format.has(FormatFlags::EXACT) || !(flags.is_scientific() || flags.is_general()) {
        return Err(BigNumError::CapacityExceeded);
    }
    let p = if flags.is_general() {
        format.precision.max(1)
    } else {
        format.precision.saturating_add(1)
    };
    // Keep a few guard digits below the rounding position.
    Plan::new(radix, p.max(sig_digits).saturating_add(4), 0)
}

/// Returns the radix exponent of the leading nonzero digit of the run,
/// after the radix point moves `shift` digits to the right.
pub(crate) fn leading_exponent(run: &DigitRun, shift: i64) -> i64 {
    (run.int_digits as i64)
        .saturating_add(shift)
        .saturating_sub(run.leading_zeros as i64 + 1)
}

/// Plan the decoding of the digit run `run`, with the radix point moved
/// `shift` digits to the right. Fails when the leading digit is too far
/// from the radix point for the largest class, and such values are scaled
/// instead. The fraction is truncated to the largest class.
pub(crate) fn plan_decode(
    run: &DigitRun,
    shift: i64,
    radix: Radix,
) -> Result<Plan, BigNumError> {
    let dpl = radix.digits_per_limb();
    let max_digits = (Capacity::largest().limbs() - 1) * dpl;
    let lead = leading_exponent(run, shift);
    if lead > max_digits as i64 - 2 || lead < -((max_digits / 2) as i64) {
        return Err(BigNumError::CapacityExceeded);
    }

    let point = (run.int_digits as i64).saturating_add(shift);
    let int_digits = (lead + 2).max(1) as usize;
    let frac_digits = (run.digits as i64).saturating_sub(point).max(0) as usize;
    Plan::new(radix, int_digits, frac_digits.min(max_digits))
}

#[test]
fn test_capacity_classes() {
    assert_eq!(Capacity::L1.limbs(), 1);
    assert_eq!(Capacity::L64.limbs(), 64);
    assert_eq!(Capacity::for_limbs(3), Some(Capacity::L4));
    assert_eq!(Capacity::for_limbs(64), Some(Capacity::L64));
    assert_eq!(Capacity::for_limbs(65), None);
}

#[test]
fn test_dispatch_macro() {
    fn limbs<const N: usize>(extra: usize) -> usize {
        N + extra
    }
    assert_eq!(with_capacity!(Capacity::L8, limbs(1)), 9);
    assert_eq!(with_capacity!(Capacity::L1, limbs(0)), 1);
}

#[test]
fn test_plan_encode() {
    use super::float::FP64;
    use super::float::FloatBits;

    let plan_for = |v: f64, format: Format| {
        let bits = FloatBits::unpack(FP64, v.to_bits() as u128);
        let (m, q) = bits.significand(FP64);
        plan_encode(m, q, &format)
    };

    // Small integers fit a single limb plus the slack limb.
    let plan = plan_for(5.0, Format::default()).unwrap();
    assert_eq!(plan.frac_digits, 0);
    assert_eq!(plan.capacity, Capacity::L2);

    // The largest double has 309 integer digits: 18 limbs, plus slack.
    let plan = plan_for(f64::MAX, Format::default()).unwrap();
    assert!(plan.int_digits >= 309);
    assert_eq!(plan.capacity, Capacity::L32);

    // The exact expansion of the smallest denormal has 1074 digits.
    let plan = plan_for(f64::from_bits(1), Format::exact()).unwrap();
    assert_eq!(plan.frac_digits, 1074);
    assert_eq!(plan.capacity, Capacity::L64);

    // With a short precision only the leading digits are needed.
    let plan = plan_for(f64::from_bits(1), Format::scientific(3)).unwrap();
    assert!(plan.frac_digits >= 324 + 4);
    assert!(plan.frac_digits < 340);
    assert_eq!(plan.capacity, Capacity::L32);

    // The fraction of 0.5 is a single digit, whatever the precision.
    let plan = plan_for(0.5, Format::normal(40)).unwrap();
    assert_eq!(plan.frac_digits, 1);

    let hex = Format::hex_float(2);
    let plan = plan_for(0.5, hex).unwrap();
    assert_eq!(plan.frac_digits, 1);
    let plan = plan_for(f64::MAX, hex).unwrap();
    assert_eq!(plan.int_digits, 256);
}

#[test]
fn test_plan_encode_extended_limits() {
    use super::cast::{IeeeFloat, F80};
    use super::float::FP80;

    // The exact expansion of the largest extended value has 4933 digits.
    let max = F80::from_parts(0x7ffe, u64::MAX).to_float_bits();
    let (m, q) = max.significand(FP80);
    assert_eq!(
        plan_encode(m, q, &Format::default()),
        Err(BigNumError::CapacityExceeded)
    );
    // A window of the leading digits serves the short notations.
    let plan = plan_encode_scaled(m, &Format::default()).unwrap();
    assert_eq!(plan.capacity, Capacity::L4);
    let plan = plan_encode_scaled(m, &Format::scientific(40)).unwrap();
    assert!(plan.int_digits >= 41);
    assert!(plan_encode_scaled(m, &Format::hex_float(15)).is_ok());
    assert!(plan_encode_scaled(m, &Format::exact()).is_err());
    assert!(plan_encode_scaled(m, &Format::normal(2)).is_err());
    assert!(plan_encode_scaled(m, &Format::scientific(2000)).is_err());

    let one = F80::from_f64(1.0).to_float_bits();
    let (m, q) = one.significand(FP80);
    assert_eq!(plan_encode(m, q, &Format::default()).unwrap().capacity, Capacity::L2);
}

#[test]
fn test_plan_decode() {
    let radix = Radix::Decimal;
    let run = DigitRun::scan(b"123.25", radix);
    let plan = plan_decode(&run, 0, radix).unwrap();
    assert_eq!(plan.int_digits, 4);
    assert_eq!(plan.frac_digits, 2);
    assert_eq!(plan.capacity, Capacity::L2);

    let run = DigitRun::scan(b"0.000001", radix);
    let plan = plan_decode(&run, 0, radix).unwrap();
    assert_eq!(plan.int_digits, 1);
    assert_eq!(plan.frac_digits, 6);

    let run = DigitRun::scan(b"1", radix);
    let plan = plan_decode(&run, 308, radix).unwrap();
    assert_eq!(plan.int_digits, 310);
    assert_eq!(plan.capacity, Capacity::L32);

    // Long fractions are truncated to the largest class.
    let run = DigitRun::scan(b"1", radix);
    let plan = plan_decode(&run, -560, radix).unwrap();
    assert_eq!(plan.capacity, Capacity::L64);
    let long = format!("0.{}", "3".repeat(3000));
    let run = DigitRun::scan(long.as_bytes(), radix);
    let plan = plan_decode(&run, 0, radix).unwrap();
    assert_eq!(plan.frac_digits, 63 * 18);

    // Leading digits far from the radix point need scaling.
    let run = DigitRun::scan(b"1", radix);
    assert_eq!(
        plan_decode(&run, 5000, radix),
        Err(BigNumError::CapacityExceeded)
    );
    assert!(plan_decode(&run, -5000, radix).is_err());
    assert!(plan_decode(&run, i64::MAX, radix).is_err());
    assert!(plan_decode(&run, i64::MIN, radix).is_err());
}

#[test]
fn test_leading_exponent() {
    let radix = Radix::Decimal;
    let run = DigitRun::scan(b"123.25", radix);
    assert_eq!(leading_exponent(&run, 0), 2);
    assert_eq!(leading_exponent(&run, -5), -3);
    let run = DigitRun::scan(b"0.0025", radix);
    assert_eq!(leading_exponent(&run, 0), -3);
    assert_eq!(leading_exponent(&run, i64::MIN), i64::MIN);
    assert_eq!(leading_exponent(&run, i64::MAX), i64::MAX - 4);
}
