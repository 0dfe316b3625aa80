//! Error types reported by the conversion entry points.

use thiserror::Error;

/// Reasons a numeral could not be recognized.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("the input is empty")]
    Empty,

    #[error("the numeral contains no digits")]
    NoDigits,

    #[error("the exponent marker is not followed by decimal digits")]
    MalformedExponent,

    #[error("unexpected characters after the numeral at offset {0}")]
    TrailingCharacters(usize),
}

/// Errors reported by `encode` and `decode`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The output buffer is too short. `required` is the exact length of
    /// the rendered numeral.
    #[error("output buffer too small: {required} bytes are required")]
    BufferTooSmall { required: usize },

    #[error("failed to parse the numeral: {0}")]
    ParseFailed(ParseFailure),

    /// The magnitude does not fit the target range. When decoding, a signed
    /// infinity (or the largest finite value, depending on the rounding
    /// mode) is still produced.
    #[error("the value exceeds the representable range")]
    Overflowed,
}

impl From<ParseFailure> for Error {
    fn from(failure: ParseFailure) -> Self {
        Error::ParseFailed(failure)
    }
}

/// Failures of the big-radix arithmetic. These never cross the public API;
/// each stage maps them to an [`Error`] or to a substitute value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BigNumError {
    #[error("the value needs more limbs than the capacity class provides")]
    CapacityExceeded,

    #[error("no digits were consumed")]
    NoDigits,

    #[error("the truncated fraction cannot decide the rounding")]
    Ambiguous,
}

/// Result type for the public conversion functions.
pub type Result<T> = core::result::Result<T, Error>;

#[test]
fn test_error_messages() {
    let e = Error::BufferTooSmall { required: 12 };
    assert_eq!(e.to_string(), "output buffer too small: 12 bytes are required");
    let e: Error = ParseFailure::MalformedExponent.into();
    assert_eq!(e, Error::ParseFailed(ParseFailure::MalformedExponent));
    assert!(e.to_string().contains("exponent marker"));
}
