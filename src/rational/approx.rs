//! Rational approximation of floating point values
//!
//! The approximation walks the continued fraction convergent recurrence on
//! the reciprocal chain of the input, so the result is the best rational
//! reachable within the iteration budget rather than the raw base-2 fraction
//! of the float.

use super::Rational;
use num_bigint::BigInt;
use num_traits::float::FloatCore;
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};

/// Iteration budget used by [ToRational]
const DEFAULT_MAX_ITERATIONS: usize = 100;

impl Rational {
    /// Approximate a real value by the continued fraction convergent
    /// recurrence, consuming at most `max_iterations` partial quotients.
    ///
    /// Returns `None` for non-finite input. Zero and integer values convert
    /// exactly; for anything else the last convergent reached before the
    /// budget, a zero residual, or the floating range overflow guard is
    /// returned.
    pub fn approximate_float<F: FloatCore>(x: F, max_iterations: usize) -> Option<Rational> {
        if x.is_nan() || x.is_infinite() {
            return None;
        }
        if x.is_zero() {
            return Some(Rational::zero());
        }
        if x < F::zero() {
            return Self::approximate_float(-x, max_iterations).map(|r| -r);
        }

        let whole = x.trunc();
        if x == whole {
            return Some(Rational::from_integer(BigInt::from_f64(whole.to_f64()?)?));
        }
        if x > F::one() {
            let fraction = Self::approximate_unit(x.fract(), max_iterations)?;
            return Some(fraction + Rational::from_integer(BigInt::from_f64(whole.to_f64()?)?));
        }
        Self::approximate_unit(x, max_iterations)
    }

    /// Convergent recurrence for a value in (0, 1)
    fn approximate_unit<F: FloatCore>(mut x: F, max_iterations: usize) -> Option<Rational> {
        let mut p_prev = BigInt::zero();
        let mut p_prev2 = BigInt::one();
        let mut q_prev = BigInt::one();
        let mut q_prev2 = BigInt::zero();
        let mut best = None;

        for _ in 0..max_iterations {
            if x.is_zero() {
                break;
            }
            let r = x.recip();
            if r.is_infinite() || r.is_nan() {
                break;
            }
            let rounded = r.round();
            let quotient = BigInt::from_f64(rounded.to_f64()?)?;

            let p = &quotient * &p_prev + &p_prev2;
            let q = &quotient * &q_prev + &q_prev2;

            // stop before a convergent leaves the representable floating range
            let in_range = |v: &BigInt| v.to_f64().map_or(false, |f| f.is_finite());
            if !in_range(&p) || !in_range(&q) {
                break;
            }

            // adjacent convergents are coprime, only the sign needs fixing
            match Rational::new_unreduced(p.clone(), q.clone()) {
                Ok(convergent) => best = Some(convergent),
                Err(_) => break,
            }

            p_prev2 = p_prev;
            p_prev = p;
            q_prev2 = q_prev;
            q_prev = q;
            x = r - rounded;
        }
        best
    }
}

/// Conversion of floating point values into [Rational] through the
/// convergent recurrence with a default iteration budget
pub trait ToRational {
    fn to_rational(&self) -> Option<Rational>;
}

impl ToRational for f64 {
    #[inline]
    fn to_rational(&self) -> Option<Rational> {
        Rational::approximate_float(*self, DEFAULT_MAX_ITERATIONS)
    }
}

impl ToRational for f32 {
    #[inline]
    fn to_rational(&self) -> Option<Rational> {
        Rational::approximate_float(*self, DEFAULT_MAX_ITERATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Signed;

    fn ratio(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn special_values_test() {
        assert_eq!(Rational::approximate_float(0.0, 100), Some(Rational::zero()));
        assert_eq!(Rational::approximate_float(3.0, 100), Some(ratio(3, 1)));
        assert_eq!(Rational::approximate_float(-17.0, 100), Some(ratio(-17, 1)));
        assert_eq!(Rational::approximate_float(f64::NAN, 100), None);
        assert_eq!(Rational::approximate_float(f64::INFINITY, 100), None);
    }

    #[test]
    fn dyadic_test() {
        // fractions whose reciprocal chain stays exact come back exactly
        assert_eq!(Rational::approximate_float(0.5, 100), Some(ratio(1, 2)));
        assert_eq!(Rational::approximate_float(2.25, 100), Some(ratio(9, 4)));
        assert_eq!(Rational::approximate_float(-0.5, 100), Some(ratio(-1, 2)));
        assert_eq!(Rational::approximate_float(-2.25, 100), Some(ratio(-9, 4)));
    }

    #[test]
    fn tenth_test() {
        let approx = Rational::approximate_float(0.1, 101).unwrap();
        let err = (approx - ratio(1, 10)).abs();
        assert!(err < ratio(1, 1_000_000_000));
    }

    #[test]
    fn third_test() {
        let third = 1.0f64 / 3.0;
        let approx = Rational::approximate_float(third, 100).unwrap();
        let err = (approx - ratio(1, 3)).abs();
        assert!(err < ratio(1, 1_000_000_000));
    }

    #[test]
    fn to_rational_test() {
        assert_eq!(0.5f32.to_rational(), Some(ratio(1, 2)));
        let pi = core::f64::consts::PI.to_rational().unwrap();
        let err = (pi.to_f64().unwrap() - core::f64::consts::PI).abs();
        assert!(err < 1e-12);
    }
}
