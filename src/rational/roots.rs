//! Powers and iterative root extraction
//!
//! Roots are computed by Newton iteration over exact rationals, seeded with
//! the independent integer roots of numerator and denominator. The results
//! are best effort: the iteration stops once the last increment drops below
//! the caller's tolerance, without certifying the final error.

use super::Rational;
use crate::error::ArithmeticError;
use num_bigint::BigInt;
use num_integer::Roots;
use num_traits::{One, Pow, Signed, Zero};

impl Rational {
    /// Raise to an integer power by exponentiating numerator and denominator.
    ///
    /// A negative exponent inverts the operands first; that fails with
    /// [ArithmeticError::DivideByZero] for a zero base, and negating
    /// `i32::MIN` fails with [ArithmeticError::Overflow].
    pub fn pow(&self, exp: i32) -> Result<Rational, ArithmeticError> {
        if exp == 0 {
            return Ok(Rational::one());
        }
        if exp > 0 {
            let e = exp as u32;
            Ok(Rational::new_raw(
                Pow::pow(&self.numer, e),
                Pow::pow(&self.denom, e),
            ))
        } else {
            if exp == i32::MIN {
                return Err(ArithmeticError::Overflow);
            }
            if self.numer.is_zero() {
                return Err(ArithmeticError::DivideByZero);
            }
            let e = (-exp) as u32;
            let mut numer = Pow::pow(&self.denom, e);
            let mut denom = Pow::pow(&self.numer, e);
            if denom.is_negative() {
                numer = -numer;
                denom = -denom;
            }
            Ok(Rational::new_raw(numer, denom))
        }
    }

    /// Square root to within `max_error`; see [Rational::nth_root]
    #[inline]
    pub fn sqrt(&self, max_error: &Rational) -> Result<Rational, ArithmeticError> {
        self.nth_root(2, max_error)
    }

    /// Cube root to within `max_error`; see [Rational::nth_root]
    #[inline]
    pub fn cbrt(&self, max_error: &Rational) -> Result<Rational, ArithmeticError> {
        self.nth_root(3, max_error)
    }

    /// The `n`-th root, iterated until the Newton increment falls below
    /// `max_error`.
    ///
    /// A negative degree takes the root of the reciprocal. When numerator
    /// and denominator are both exact `n`-th powers the root is returned
    /// directly without iteration.
    pub fn nth_root(&self, n: i32, max_error: &Rational) -> Result<Rational, ArithmeticError> {
        if n == 0 {
            return Err(ArithmeticError::DivideByZero);
        }
        if !max_error.is_positive() {
            return Err(ArithmeticError::OutOfRange);
        }
        if n < 0 {
            if n == i32::MIN {
                return Err(ArithmeticError::Overflow);
            }
            if self.is_zero() {
                return Err(ArithmeticError::DivideByZero);
            }
            return self.recip().nth_root(-n, max_error);
        }
        if self.is_negative() {
            if n % 2 == 0 {
                return Err(ArithmeticError::NoRealRoot);
            }
            return self.abs().nth_root(n, max_error).map(|root| -root);
        }

        let degree = n as u32;
        let root_n = self.numer.nth_root(degree);
        let root_d = self.denom.nth_root(degree);
        if Pow::pow(&root_n, degree) == self.numer && Pow::pow(&root_d, degree) == self.denom {
            // both parts are exact powers, no iteration needed
            return Ok(Rational::reduce_parts(root_n, root_d));
        }

        let step = Rational::from(n);
        let mut x = Rational::reduce_parts(root_n.max(BigInt::one()), root_d);
        loop {
            let delta = (self / x.pow(n - 1)? - &x) / &step;
            x = x + &delta;
            if delta.abs() < *max_error {
                return Ok(x);
            }
        }
    }
}
