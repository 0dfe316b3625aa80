use crate::{decode, encode, Error, Format, FormatFlags, IeeeFloat, RoundingMode};
use pyo3::exceptions::{PyOverflowError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::Overflowed => PyOverflowError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// The notation, precision and rounding mode of a conversion.
#[pyclass]
#[derive(Clone)]
struct PyFormat {
    inner: Format,
}

#[pymethods]
impl PyFormat {
    /// Create a new format.
    ///
    /// Args:
    ///     flags: The bits of the format flags (see the FLAG_* constants)
    ///     precision: The number of digits
    ///     rounding_mode: The rounding mode to use:
    ///         "NearestTiesToEven", "NearestTiesToAway",
    ///         "Zero", "Positive", "Negative"
    #[new]
    #[pyo3(signature = (flags, precision, rounding_mode = "NearestTiesToEven"))]
    fn new(flags: u16, precision: usize, rounding_mode: &str) -> PyResult<Self> {
        let Some(rm) = RoundingMode::from_string(rounding_mode) else {
            return Err(PyValueError::new_err("Invalid rounding mode"));
        };
        let flags = FormatFlags::from_bits(flags);
        Ok(PyFormat {
            inner: Format::new(flags, precision, rm),
        })
    }
    /// Positional notation with `precision` fraction digits.
    #[staticmethod]
    fn normal(precision: usize) -> Self {
        PyFormat {
            inner: Format::normal(precision),
        }
    }
    /// Scientific notation with `precision` digits after the point.
    #[staticmethod]
    fn scientific(precision: usize) -> Self {
        PyFormat {
            inner: Format::scientific(precision),
        }
    }
    /// The %g notation with `precision` significant digits.
    #[staticmethod]
    fn general(precision: usize) -> Self {
        PyFormat {
            inner: Format::general(precision),
        }
    }
    /// Hex digits with a binary exponent.
    #[staticmethod]
    fn hex_float(precision: usize) -> Self {
        PyFormat {
            inner: Format::hex_float(precision),
        }
    }
    /// Every digit of the exact value.
    #[staticmethod]
    fn exact() -> Self {
        PyFormat {
            inner: Format::exact(),
        }
    }
    /// Returns the bits of the flags.
    fn get_flags(&self) -> u16 {
        self.inner.flags.bits()
    }
    /// Returns the precision.
    fn get_precision(&self) -> usize {
        self.inner.precision
    }
    /// Returns the rounding mode as a string.
    fn get_rounding_mode(&self) -> String {
        self.inner.rounding.as_string().to_string()
    }
    fn __str__(&self) -> String {
        format!("{:?}", self.inner)
    }
    fn __repr__(&self) -> String {
        self.__str__()
    }
}

fn format_or_default(format: Option<PyRef<'_, PyFormat>>) -> Format {
    format.map_or_else(Format::default, |f| f.inner)
}

fn format_value<F: IeeeFloat>(val: F, format: Option<PyRef<'_, PyFormat>>) -> PyResult<String> {
    encode(val, &format_or_default(format)).map_err(to_py_err)
}

/// Parse a numeral. Returns the value and the number of characters that
/// were consumed.
fn parse_value<F: IeeeFloat>(
    text: &str,
    format: Option<PyRef<'_, PyFormat>>,
) -> PyResult<(F, usize)> {
    let decoded = decode::<F>(text, &format_or_default(format)).map_err(to_py_err)?;
    let consumed = decoded.consumed;
    let value = decoded.into_result().map_err(to_py_err)?;
    Ok((value, consumed))
}

/// Returns the numeral of the double `val`.
///
/// Args:
///     val: The value to convert
///     format: The format (defaults to %g with 6 digits)
#[pyfunction]
#[pyo3(signature = (val, format = None))]
fn format_f64(val: f64, format: Option<PyRef<'_, PyFormat>>) -> PyResult<String> {
    format_value(val, format)
}

/// Returns the numeral of `val`, rounded to single precision first.
#[pyfunction]
#[pyo3(signature = (val, format = None))]
fn format_f32(val: f32, format: Option<PyRef<'_, PyFormat>>) -> PyResult<String> {
    format_value(val, format)
}

/// Parse a numeral into a double. Returns the value and the number of
/// characters that were consumed.
#[pyfunction]
#[pyo3(signature = (text, format = None))]
fn parse_f64(text: &str, format: Option<PyRef<'_, PyFormat>>) -> PyResult<(f64, usize)> {
    parse_value::<f64>(text, format)
}

/// Parse a numeral into a single precision float.
#[pyfunction]
#[pyo3(signature = (text, format = None))]
fn parse_f32(text: &str, format: Option<PyRef<'_, PyFormat>>) -> PyResult<(f32, usize)> {
    parse_value::<f32>(text, format)
}

#[pymodule]
fn _radixfloat(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyFormat>()?;

    // The flag bits, for the PyFormat constructor.
    m.add("FLAG_NORMAL", FormatFlags::NORMAL.bits())?;
    m.add("FLAG_SCIENTIFIC", FormatFlags::SCIENTIFIC.bits())?;
    m.add("FLAG_GENERAL", FormatFlags::GENERAL.bits())?;
    m.add("FLAG_HEX_MANTISSA", FormatFlags::HEX_MANTISSA.bits())?;
    m.add("FLAG_HEX_FLOAT", FormatFlags::HEX_FLOAT.bits())?;
    m.add("FLAG_UPPERCASE", FormatFlags::UPPERCASE.bits())?;
    m.add("FLAG_FORCE_POINT", FormatFlags::FORCE_POINT.bits())?;
    m.add("FLAG_EXACT", FormatFlags::EXACT.bits())?;
    m.add("FLAG_TRIM_ZEROS", FormatFlags::TRIM_ZEROS.bits())?;
    m.add("FLAG_NO_EXP_PAD", FormatFlags::NO_EXP_PAD.bits())?;

    m.add_function(wrap_pyfunction!(format_f64, m)?)?;
    m.add_function(wrap_pyfunction!(format_f32, m)?)?;
    m.add_function(wrap_pyfunction!(parse_f64, m)?)?;
    m.add_function(wrap_pyfunction!(parse_f32, m)?)?;
    Ok(())
}
