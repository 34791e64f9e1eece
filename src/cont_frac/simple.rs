//! Implementation of lazy simple continued fractions

use super::block::{Block, DualBlock};
use super::terms::{BihomographicTerms, HomographicTerms, NegatedTerms, RatioTerms, SqrtTerms, Terms};
use crate::error::ArithmeticError;
use crate::rational::Rational;
use crate::traits::{Approximation, Computable, FromSqrt};
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Terms shown by `Display` when no precision is given
const DISPLAY_TERM_LIMIT: usize = 10;

/// A simple continued fraction `a0 + 1/(a1 + 1/(a2 + …))` represented as a
/// lazy stream of partial quotients.
///
/// In canonical form the first term may have any sign while every later
/// term is strictly positive. The sequence may be finite (a rational value)
/// or infinite (e.g. `√n` for non-square `n`), so consumers always work on
/// a finite prefix; no operation materializes the whole sequence.
///
/// The struct wraps a pristine, never advanced term source and every
/// enumeration starts from a clone of it, so enumerating twice yields the
/// same sequence — provided the source is pure, which is a precondition of
/// [ContinuedFraction::from_terms] and not enforced here.
///
/// Arithmetic operators do not compute terms: they store a composed
/// transform over the operand sources, and work only happens while output
/// terms are pulled.
#[derive(Clone)]
pub struct ContinuedFraction {
    source: Box<dyn Terms>,
}

impl ContinuedFraction {
    /// Wrap a pure, repeatable term source.
    ///
    /// The source must produce a canonical sequence and must yield the same
    /// terms every time a pristine clone of it is consumed.
    pub fn from_terms<I: Terms + 'static>(source: I) -> Self {
        ContinuedFraction {
            source: Box::new(source),
        }
    }

    fn wrap(source: Box<dyn Terms>) -> Self {
        ContinuedFraction { source }
    }

    /// A fresh enumeration of the partial quotients
    pub fn terms(&self) -> Box<dyn Terms> {
        self.source.clone()
    }

    /// Continued fraction of `√square`; fails with
    /// [ArithmeticError::NoRealRoot] for negative input
    pub fn sqrt<T: Into<BigInt>>(square: T) -> Result<Self, ArithmeticError> {
        Self::from_sqrt(square.into())
    }

    /// Apply the linear fractional map `(a·x + b) / (c·x + d)` to this
    /// continued fraction
    pub fn homographic(&self, a: BigInt, b: BigInt, c: BigInt, d: BigInt) -> ContinuedFraction {
        Self::wrap(Box::new(HomographicTerms::new(
            Block::new(a, b, c, d),
            self.terms(),
        )))
    }

    /// Apply the bilinear map `(a·xy + b·x + c·y + d) / (e·xy + f·x + g·y + h)`
    /// to this continued fraction and `rhs`
    #[allow(clippy::too_many_arguments)]
    pub fn bihomographic(
        &self,
        rhs: &ContinuedFraction,
        a: BigInt,
        b: BigInt,
        c: BigInt,
        d: BigInt,
        e: BigInt,
        f: BigInt,
        g: BigInt,
        h: BigInt,
    ) -> ContinuedFraction {
        Self::wrap(Box::new(BihomographicTerms::new(
            DualBlock::new(a, b, c, d, e, f, g, h),
            self.terms(),
            rhs.terms(),
        )))
    }

    /// Iterator of the exact rational convergents of the leading terms
    pub fn convergents(&self) -> Convergents {
        Convergents {
            terms: self.terms(),
            block: Block::identity(),
        }
    }

    /// Fold up to `limit` leading terms back into a rational through the
    /// convergent recurrence.
    ///
    /// Returns `Exact` when the sequence ends within the limit,
    /// `Approximated` when terms remain, and `None` when the sequence
    /// yields no terms at all.
    pub fn to_rational(&self, limit: usize) -> Option<Approximation<Rational>> {
        let mut convergents = self.convergents();
        let mut last = None;
        for _ in 0..limit {
            match convergents.next() {
                Some(c) => last = Some(c),
                None => return last.map(Approximation::Exact),
            }
        }
        if convergents.next().is_none() {
            last.map(Approximation::Exact)
        } else {
            last.map(Approximation::Approximated)
        }
    }
}

impl Computable for ContinuedFraction {
    #[inline]
    fn approximated(&self, limit: usize) -> Option<Approximation<Rational>> {
        self.to_rational(limit)
    }
}

/// Iterator of the convergents of a [ContinuedFraction].
///
/// Stops at the end of the term sequence, or at a degenerate convergent if
/// the source was not canonical.
pub struct Convergents {
    terms: Box<dyn Terms>,
    block: Block,
}

impl Iterator for Convergents {
    type Item = Rational;

    fn next(&mut self) -> Option<Rational> {
        let a = self.terms.next()?;
        let (mut p, mut q) = self.block.convergent_step(a);
        if q.is_negative() {
            p = -p;
            q = -q;
        }
        if q.is_zero() {
            None
        } else {
            // adjacent convergents are coprime, no reduction needed
            Some(Rational::new_raw(p, q))
        }
    }
}

impl From<Rational> for ContinuedFraction {
    /// Expand a rational into its partial quotients by the Euclidean
    /// algorithm
    fn from(r: Rational) -> Self {
        let (numer, denom) = r.into_parts();
        Self::wrap(Box::new(RatioTerms::new(numer, denom)))
    }
}

impl From<BigInt> for ContinuedFraction {
    fn from(t: BigInt) -> Self {
        ContinuedFraction::from(Rational::from_integer(t))
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty)*) => {$(
        impl From<$t> for ContinuedFraction {
            #[inline]
            fn from(t: $t) -> Self {
                ContinuedFraction::from(BigInt::from(t))
            }
        }
    )*};
}
impl_from_primitive!(i8 i16 i32 i64 isize u8 u16 u32 u64 usize);

impl FromSqrt<BigInt> for ContinuedFraction {
    /// The periodic expansion of a square root; a perfect square yields the
    /// single exact term
    fn from_sqrt(target: BigInt) -> Result<Self, ArithmeticError> {
        if target.is_negative() {
            return Err(ArithmeticError::NoRealRoot);
        }
        Ok(Self::wrap(Box::new(SqrtTerms::new(target))))
    }
}

impl<'a> Neg for &'a ContinuedFraction {
    type Output = ContinuedFraction;

    /// Negate through the canonical prefix rewrite, keeping every term
    /// after the first positive
    fn neg(self) -> ContinuedFraction {
        ContinuedFraction::wrap(Box::new(NegatedTerms::new(self.terms())))
    }
}

impl Neg for ContinuedFraction {
    type Output = ContinuedFraction;

    #[inline]
    fn neg(self) -> ContinuedFraction {
        -&self
    }
}

impl<'a, 'b> Add<&'b ContinuedFraction> for &'a ContinuedFraction {
    type Output = ContinuedFraction;

    fn add(self, rhs: &ContinuedFraction) -> ContinuedFraction {
        self.bihomographic(
            rhs,
            BigInt::zero(),
            BigInt::one(),
            BigInt::one(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::one(),
        )
    }
}

impl<'a, 'b> Sub<&'b ContinuedFraction> for &'a ContinuedFraction {
    type Output = ContinuedFraction;

    fn sub(self, rhs: &ContinuedFraction) -> ContinuedFraction {
        self.bihomographic(
            rhs,
            BigInt::zero(),
            BigInt::one(),
            -BigInt::one(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::one(),
        )
    }
}

impl<'a, 'b> Mul<&'b ContinuedFraction> for &'a ContinuedFraction {
    type Output = ContinuedFraction;

    fn mul(self, rhs: &ContinuedFraction) -> ContinuedFraction {
        self.bihomographic(
            rhs,
            BigInt::one(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::one(),
        )
    }
}

impl<'a, 'b> Div<&'b ContinuedFraction> for &'a ContinuedFraction {
    type Output = ContinuedFraction;

    /// Division by a zero-valued continued fraction cannot be detected
    /// without enumerating the divisor; the result is then an empty term
    /// stream and [ContinuedFraction::to_rational] returns `None`.
    fn div(self, rhs: &ContinuedFraction) -> ContinuedFraction {
        self.bihomographic(
            rhs,
            BigInt::zero(),
            BigInt::one(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
            BigInt::one(),
            BigInt::zero(),
        )
    }
}

macro_rules! forward_cf_binop {
    (impl $imp:ident, $method:ident) => {
        impl $imp<ContinuedFraction> for ContinuedFraction {
            type Output = ContinuedFraction;
            #[inline]
            fn $method(self, rhs: ContinuedFraction) -> ContinuedFraction {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $imp<&'a ContinuedFraction> for ContinuedFraction {
            type Output = ContinuedFraction;
            #[inline]
            fn $method(self, rhs: &ContinuedFraction) -> ContinuedFraction {
                (&self).$method(rhs)
            }
        }

        impl<'a> $imp<ContinuedFraction> for &'a ContinuedFraction {
            type Output = ContinuedFraction;
            #[inline]
            fn $method(self, rhs: ContinuedFraction) -> ContinuedFraction {
                self.$method(&rhs)
            }
        }
    };
}

forward_cf_binop!(impl Add, add);
forward_cf_binop!(impl Sub, sub);
forward_cf_binop!(impl Mul, mul);
forward_cf_binop!(impl Div, div);

impl<'a> Add<BigInt> for &'a ContinuedFraction {
    type Output = ContinuedFraction;

    fn add(self, rhs: BigInt) -> ContinuedFraction {
        self.homographic(BigInt::one(), rhs, BigInt::zero(), BigInt::one())
    }
}

impl<'a> Sub<BigInt> for &'a ContinuedFraction {
    type Output = ContinuedFraction;

    fn sub(self, rhs: BigInt) -> ContinuedFraction {
        self.homographic(BigInt::one(), -rhs, BigInt::zero(), BigInt::one())
    }
}

impl<'a> Mul<BigInt> for &'a ContinuedFraction {
    type Output = ContinuedFraction;

    fn mul(self, rhs: BigInt) -> ContinuedFraction {
        self.homographic(rhs, BigInt::zero(), BigInt::zero(), BigInt::one())
    }
}

impl<'a> Div<BigInt> for &'a ContinuedFraction {
    type Output = ContinuedFraction;

    /// # Panics
    /// Panics when `rhs` is zero.
    fn div(self, rhs: BigInt) -> ContinuedFraction {
        if rhs.is_zero() {
            panic!("division by zero");
        }
        self.homographic(BigInt::one(), BigInt::zero(), BigInt::zero(), rhs)
    }
}

macro_rules! forward_cf_scalar_binop {
    (impl $imp:ident, $method:ident) => {
        impl $imp<BigInt> for ContinuedFraction {
            type Output = ContinuedFraction;
            #[inline]
            fn $method(self, rhs: BigInt) -> ContinuedFraction {
                (&self).$method(rhs)
            }
        }
    };
}

forward_cf_scalar_binop!(impl Add, add);
forward_cf_scalar_binop!(impl Sub, sub);
forward_cf_scalar_binop!(impl Mul, mul);
forward_cf_scalar_binop!(impl Div, div);

impl Zero for ContinuedFraction {
    #[inline]
    fn zero() -> Self {
        ContinuedFraction::from(0)
    }

    fn is_zero(&self) -> bool {
        let mut terms = self.terms();
        match terms.next() {
            Some(a) if a.is_zero() => terms.next().is_none(),
            _ => false,
        }
    }
}

impl PartialEq for ContinuedFraction {
    fn eq(&self, other: &Self) -> bool {
        let mut a = self.terms();
        let mut b = other.terms();
        loop {
            match (a.next(), b.next()) {
                (Some(x), Some(y)) if x == y => continue,
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

impl One for ContinuedFraction {
    #[inline]
    fn one() -> Self {
        ContinuedFraction::from(1)
    }

    fn is_one(&self) -> bool {
        let mut terms = self.terms();
        match terms.next() {
            Some(a) if a.is_one() => terms.next().is_none(),
            _ => false,
        }
    }
}

impl fmt::Display for ContinuedFraction {
    /// Bracketed form `[a0; a1, a2, …]`. At most the formatter precision
    /// (default 10) terms are printed; a trailing `…` marks truncation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limit = f.precision().unwrap_or(DISPLAY_TERM_LIMIT);
        let mut terms = self.terms();
        let mut shown = 0;

        write!(f, "[")?;
        while shown < limit {
            match terms.next() {
                Some(t) => {
                    match shown {
                        0 => write!(f, "{}", t)?,
                        1 => write!(f, "; {}", t)?,
                        _ => write!(f, ", {}", t)?,
                    }
                    shown += 1;
                }
                None => return write!(f, "]"),
            }
        }
        if terms.next().is_some() {
            match shown {
                0 => write!(f, "\u{2026}")?,
                1 => write!(f, "; \u{2026}")?,
                _ => write!(f, ", \u{2026}")?,
            }
        }
        write!(f, "]")
    }
}

impl fmt::Debug for ContinuedFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContinuedFraction({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::E;
    use num_traits::ToPrimitive;

    fn ratio(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    fn first_terms(cf: &ContinuedFraction, n: usize) -> Vec<i64> {
        use core::convert::TryFrom;
        cf.terms()
            .take(n)
            .map(|v| i64::try_from(v).unwrap())
            .collect()
    }

    #[test]
    fn from_ratio_test() {
        assert_eq!(first_terms(&ContinuedFraction::from(ratio(5, 6)), 9), vec![0, 1, 5]);
        assert_eq!(
            first_terms(&ContinuedFraction::from(ratio(355, 113)), 9),
            vec![3, 7, 16]
        );
        assert_eq!(
            first_terms(&ContinuedFraction::from(ratio(-22, 7)), 9),
            vec![-4, 1, 6]
        );
        assert_eq!(first_terms(&ContinuedFraction::from(3), 9), vec![3]);
        assert_eq!(first_terms(&ContinuedFraction::zero(), 9), vec![0]);
    }

    #[test]
    fn fold_back_test() {
        // Euclidean expansion followed by the convergent fold reproduces
        // the exact value
        for &(n, d) in &[(5i64, 6i64), (355, 113), (-22, 7), (1, 1), (0, 1), (-100, 3)] {
            let value = ratio(n, d);
            let folded = ContinuedFraction::from(value.clone()).to_rational(32).unwrap();
            assert_eq!(folded, Approximation::Exact(value));
        }
    }

    #[test]
    fn convergents_test() {
        let sq2 = ContinuedFraction::sqrt(2).unwrap();
        assert_eq!(
            sq2.convergents().take(5).collect::<Vec<_>>(),
            vec![
                ratio(1, 1),
                ratio(3, 2),
                ratio(7, 5),
                ratio(17, 12),
                ratio(41, 29)
            ]
        );

        let pi = ContinuedFraction::from(ratio(355, 113));
        assert_eq!(pi.convergents().last(), Some(ratio(355, 113)));
    }

    #[test]
    fn sqrt_test() {
        assert_eq!(first_terms(&ContinuedFraction::sqrt(2).unwrap(), 5), vec![1, 2, 2, 2, 2]);
        assert_eq!(first_terms(&ContinuedFraction::sqrt(9).unwrap(), 5), vec![3]);
        assert_eq!(
            ContinuedFraction::sqrt(9).unwrap().to_rational(8),
            Some(Approximation::Exact(ratio(3, 1)))
        );
        assert!(matches!(
            ContinuedFraction::sqrt(-2),
            Err(ArithmeticError::NoRealRoot)
        ));
    }

    #[test]
    fn to_rational_limit_test() {
        let sq2 = ContinuedFraction::sqrt(2).unwrap();
        match sq2.to_rational(4) {
            Some(Approximation::Approximated(c)) => assert_eq!(c, ratio(17, 12)),
            other => panic!("unexpected result: {:?}", other),
        }

        // an empty stream has no convergent at all
        let empty = ContinuedFraction::from_terms(std::iter::empty::<BigInt>());
        assert_eq!(empty.to_rational(8), None);
    }

    #[test]
    fn negation_test() {
        let value = ContinuedFraction::from(ratio(355, 113));
        assert_eq!(first_terms(&-&value, 9), vec![-4, 1, 6, 16]);
        assert_eq!(
            (-&value).to_rational(16),
            Some(Approximation::Exact(ratio(-355, 113)))
        );

        let value = ContinuedFraction::from(ratio(5, 6));
        assert_eq!(first_terms(&-&value, 9), vec![-1, 6]);

        // negating twice restores the sequence
        let back = -&(-&value);
        assert_eq!(first_terms(&back, 9), vec![0, 1, 5]);
    }

    #[test]
    fn homographic_test() {
        let e = E {};
        let e_cf = ContinuedFraction::from_terms(e.cfrac());

        // e + 1 and e - 2 through the homographic engine
        let ep1 = &e_cf + BigInt::one();
        assert_eq!(first_terms(&ep1, 5), vec![3, 1, 2, 1, 1]);

        let em2 = &e_cf - BigInt::from(2);
        assert_eq!(first_terms(&em2, 5), vec![0, 1, 2, 1, 1]);

        let sq2 = ContinuedFraction::sqrt(2).unwrap();
        assert_eq!(first_terms(&(&sq2 + BigInt::one()), 5), vec![2, 2, 2, 2, 2]);
        assert_eq!(first_terms(&(&sq2 - BigInt::one()), 5), vec![0, 2, 2, 2, 2]);
        assert_eq!(first_terms(&(&sq2 * BigInt::from(2)), 5), vec![2, 1, 4, 1, 4]);
        assert_eq!(first_terms(&(&sq2 / BigInt::from(2)), 5), vec![0, 1, 2, 2, 2]);
    }

    #[test]
    fn gosper_rational_test() {
        let half = ContinuedFraction::from(ratio(1, 2));
        let third = ContinuedFraction::from(ratio(1, 3));

        let sum = (&half + &third).to_rational(16).unwrap();
        assert_eq!(sum, Approximation::Exact(ratio(5, 6)));

        let diff = ContinuedFraction::from(ratio(22, 7)) - ContinuedFraction::from(ratio(1, 7));
        assert_eq!(diff.to_rational(16), Some(Approximation::Exact(ratio(3, 1))));

        let product = (&half * &third).to_rational(16).unwrap();
        assert_eq!(product, Approximation::Exact(ratio(1, 6)));

        let quotient = (ContinuedFraction::from(ratio(5, 6)) / third).to_rational(16).unwrap();
        assert_eq!(quotient, Approximation::Exact(ratio(5, 2)));
    }

    #[test]
    fn gosper_irrational_test() {
        // √2 + √3 = 3.14626…
        let sum = &ContinuedFraction::sqrt(2).unwrap() + &ContinuedFraction::sqrt(3).unwrap();
        let approx = sum.to_rational(12).unwrap();
        assert!(!approx.is_exact());
        let value = approx.value().to_f64().unwrap();
        assert!((value - 3.146264369941973).abs() < 1e-9);

        // √2 · √2 trips the stall guard and still lands on 2
        let square = &ContinuedFraction::sqrt(2).unwrap() * &ContinuedFraction::sqrt(2).unwrap();
        let value = square.to_rational(8).unwrap().value().to_f64().unwrap();
        assert!((value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_one_test() {
        assert!(ContinuedFraction::zero().is_zero());
        assert!(ContinuedFraction::one().is_one());
        assert!(!ContinuedFraction::one().is_zero());
        assert!(!ContinuedFraction::sqrt(2).unwrap().is_zero());
    }

    #[test]
    fn re_enumeration_test() {
        let sum = &ContinuedFraction::sqrt(2).unwrap() + &ContinuedFraction::sqrt(3).unwrap();
        let first = sum.terms().take(8).collect::<Vec<_>>();
        let mut partial = sum.terms();
        partial.next();
        let second = sum.terms().take(8).collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn fmt_test() {
        assert_eq!(format!("{}", ContinuedFraction::from(ratio(355, 113))), "[3; 7, 16]");
        assert_eq!(format!("{}", ContinuedFraction::from(3)), "[3]");
        assert_eq!(
            format!("{:.4}", ContinuedFraction::sqrt(2).unwrap()),
            "[1; 2, 2, 2, \u{2026}]"
        );
        assert_eq!(
            format!("{}", ContinuedFraction::sqrt(2).unwrap()),
            "[1; 2, 2, 2, 2, 2, 2, 2, 2, 2, \u{2026}]"
        );
    }
}
