//! Exact, correctly rounded conversion between IEEE-754 binary floats and
//! decimal or hexadecimal text.
//!
//! Values are expanded exactly into a fixed-capacity big-radix number, then
//! rounded once at the requested digit. Numerals are read exactly and then
//! rounded once to the nearest binary value. All five IEEE rounding modes
//! apply in both directions.
//!
//! ```
//! use radixfloat::{decode, encode, Format, FormatFlags};
//!
//! assert_eq!(encode(5.0f64, &Format::default()).unwrap(), "5");
//! assert_eq!(encode(0.1f64, &Format::scientific(3)).unwrap(), "1.000e-01");
//! assert_eq!(encode(1.0f64, &Format::hex_float(0)).unwrap(), "1p+00");
//!
//! let d = decode::<f64>("26 and more", &Format::default()).unwrap();
//! assert_eq!((d.value, d.consumed), (26.0, 2));
//! ```

mod bigint;
mod capacity;
mod cast;
mod codec;
mod error;
mod expand;
mod float;
mod format;
mod reduce;
mod render;
mod round;
mod string;
mod utils;

#[cfg(feature = "python")]
mod py;

pub use self::bigint::Radix;
pub use self::cast::{IeeeFloat, F128, F80};
pub use self::codec::{decode, encode, encode_into, encoded_len, parse, Decoded};
pub use self::error::{Error, ParseFailure, Result};
pub use self::float::{Category, FloatBits, NanKind, RoundingMode, Semantics};
pub use self::float::{FP128, FP16, FP32, FP64, FP80};
pub use self::format::{Format, FormatFlags};
