use crate::error::ArithmeticError;
use crate::rational::Rational;

/// In case there are multiple solutions for a square root,
/// only the canonical result will be returned
pub trait FromSqrt<T>: Sized {
    fn from_sqrt(target: T) -> Result<Self, ArithmeticError>;
}

/// Result of a bounded-effort conversion: the value is either reproduced
/// exactly or only approximated within the allowed effort.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Approximation<T> {
    Approximated(T),
    Exact(T),
}

impl<T> Approximation<T> {
    #[inline]
    pub fn value(&self) -> &T {
        match self {
            Approximation::Approximated(v) => v,
            Approximation::Exact(v) => v,
        }
    }

    #[inline]
    pub fn into_value(self) -> T {
        match self {
            Approximation::Approximated(v) => v,
            Approximation::Exact(v) => v,
        }
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        matches!(self, Approximation::Exact(_))
    }
}

/// A number that can be approximated by rationals with bounded enumeration
/// effort. `limit` is the number of partial quotients the implementation may
/// consume; implementations must never materialize more than that.
pub trait Computable {
    /// Returns the best rational approximation reachable within `limit`
    /// terms, or `None` if the number has no rational approximant at all
    /// (an empty term stream).
    fn approximated(&self, limit: usize) -> Option<Approximation<Rational>>;
}

impl Computable for Rational {
    #[inline]
    fn approximated(&self, _limit: usize) -> Option<Approximation<Rational>> {
        Some(Approximation::Exact(self.clone()))
    }
}
