//! Failure conditions shared by the rational and continued fraction types

use std::fmt;

/// The error type for exact arithmetic operations.
///
/// Every failure is detected synchronously at the operation that triggers it;
/// because all values in this crate are immutable, a returned error never
/// leaves a partially constructed value behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    /// A zero denominator at construction, a zero divisor, a zero root
    /// degree, or the reciprocal of zero
    DivideByZero,

    /// An argument outside the accepted domain, such as a non-positive
    /// tolerance or a malformed length prefix in the binary encoding
    OutOfRange,

    /// No result exists in the reals, such as an even root of a negative
    /// value
    NoRealRoot,

    /// A quantity that cannot be represented, such as the negation of the
    /// minimal representable exponent or a negative integer in an unsigned
    /// byte encoding
    Overflow,

    /// The operation is intentionally not implemented (textual parsing)
    Unsupported,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticError::DivideByZero => f.write_str("division by zero"),
            ArithmeticError::OutOfRange => f.write_str("argument out of range"),
            ArithmeticError::NoRealRoot => f.write_str("no real root exists"),
            ArithmeticError::Overflow => f.write_str("value cannot be represented"),
            ArithmeticError::Unsupported => f.write_str("operation not supported"),
        }
    }
}

impl std::error::Error for ArithmeticError {}
