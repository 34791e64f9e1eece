//! Implementation of exact rational numbers over arbitrary precision integers
//!
//! The [Rational] type keeps a signed numerator and a strictly positive
//! denominator. Public constructors reduce to lowest terms by default; the
//! arithmetic operators reduce their results through the same path, so every
//! value observable by a caller is canonical unless it was explicitly built
//! with [Rational::new_unreduced].

mod approx;
mod bytes;
mod roots;

pub use approx::ToRational;
pub use bytes::{ByteFormat, Endianness};

use crate::error::ArithmeticError;
use core::cmp::Ordering;
use core::str::FromStr;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{CheckedDiv, Num, One, Signed, ToPrimitive, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// An exact rational number `numer / denom` with `denom > 0`.
///
/// Values are immutable; every operation returns a new value.
#[derive(Clone, Debug)]
pub struct Rational {
    numer: BigInt,
    denom: BigInt,
}

impl Rational {
    /// Create a rational from parts that are already canonical.
    /// The caller must guarantee a positive denominator.
    #[inline]
    pub(crate) fn new_raw(numer: BigInt, denom: BigInt) -> Self {
        debug_assert!(denom.is_positive());
        Rational { numer, denom }
    }

    /// Create a rational reduced to lowest terms.
    ///
    /// The denominator sign is folded into the numerator; a zero denominator
    /// fails with [ArithmeticError::DivideByZero].
    pub fn new<N: Into<BigInt>, D: Into<BigInt>>(
        numer: N,
        denom: D,
    ) -> Result<Self, ArithmeticError> {
        Self::build(numer.into(), denom.into(), true)
    }

    /// Create a rational without reducing, only normalizing the denominator
    /// sign. Mostly useful when the parts are known to be coprime already.
    pub fn new_unreduced<N: Into<BigInt>, D: Into<BigInt>>(
        numer: N,
        denom: D,
    ) -> Result<Self, ArithmeticError> {
        Self::build(numer.into(), denom.into(), false)
    }

    fn build(mut numer: BigInt, mut denom: BigInt, reduce: bool) -> Result<Self, ArithmeticError> {
        if denom.is_zero() {
            return Err(ArithmeticError::DivideByZero);
        }
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        if reduce {
            Ok(Self::reduce_parts(numer, denom))
        } else {
            Ok(Rational { numer, denom })
        }
    }

    /// Divide out the common factor of parts with a positive denominator.
    pub(crate) fn reduce_parts(numer: BigInt, denom: BigInt) -> Self {
        debug_assert!(denom.is_positive());
        let g = numer.gcd(&denom);
        if g.is_one() {
            Rational { numer, denom }
        } else {
            Rational {
                numer: numer / &g,
                denom: denom / g,
            }
        }
    }

    #[inline]
    pub fn from_integer<T: Into<BigInt>>(t: T) -> Self {
        Rational {
            numer: t.into(),
            denom: BigInt::one(),
        }
    }

    #[inline]
    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    #[inline]
    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    /// Deconstruct into `(numerator, denominator)`
    #[inline]
    pub fn into_parts(self) -> (BigInt, BigInt) {
        (self.numer, self.denom)
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Reduce a value created through [Rational::new_unreduced]
    #[inline]
    pub fn reduced(self) -> Self {
        Self::reduce_parts(self.numer, self.denom)
    }

    /// The integer part, truncated towards zero
    #[inline]
    pub fn to_integer(&self) -> BigInt {
        &self.numer / &self.denom
    }

    /// The value with its fractional part removed
    #[inline]
    pub fn trunc(&self) -> Rational {
        Rational::from_integer(self.to_integer())
    }

    /// The fractional part left over by [Rational::trunc]
    #[inline]
    pub fn fract(&self) -> Rational {
        Rational::new_raw(&self.numer % &self.denom, self.denom.clone())
    }

    /// The multiplicative inverse.
    ///
    /// # Panics
    /// Panics when the value is zero, like the division operator does.
    pub fn recip(&self) -> Rational {
        if self.numer.is_zero() {
            panic!("division by zero");
        }
        if self.numer.is_negative() {
            Rational::new_raw(-self.denom.clone(), -self.numer.clone())
        } else {
            Rational::new_raw(self.denom.clone(), self.numer.clone())
        }
    }

    /// Greatest common divisor: `gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)`.
    /// A zero operand yields the absolute value of the other operand.
    pub fn gcd(&self, other: &Rational) -> Rational {
        if self.is_zero() {
            return other.abs();
        }
        if other.is_zero() {
            return self.abs();
        }
        Self::reduce_parts(self.numer.gcd(&other.numer), self.denom.lcm(&other.denom))
    }

    /// Least common multiple: `lcm(a/b, c/d) = lcm(a, c) / gcd(b, d)`.
    /// A zero operand yields zero.
    pub fn lcm(&self, other: &Rational) -> Rational {
        if self.is_zero() || other.is_zero() {
            return Rational::zero();
        }
        Self::reduce_parts(self.numer.lcm(&other.numer), self.denom.gcd(&other.denom))
    }

    #[inline]
    pub fn negative_one() -> Self {
        Rational {
            numer: -BigInt::one(),
            denom: BigInt::one(),
        }
    }

    /// A fixed rational approximation of π, not the exact value
    pub fn pi() -> Self {
        Rational::new_raw(BigInt::from(245850922), BigInt::from(78256779))
    }

    /// A fixed rational approximation of Euler's number e, not the exact value
    pub fn e() -> Self {
        Rational::new_raw(BigInt::from(1084483), BigInt::from(398959))
    }

    /// A fixed rational approximation of the golden ratio φ, not the exact value
    pub fn golden_ratio() -> Self {
        Rational::new_raw(BigInt::from(317811), BigInt::from(196418))
    }
}

impl From<BigInt> for Rational {
    #[inline]
    fn from(t: BigInt) -> Self {
        Rational::from_integer(t)
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty)*) => {$(
        impl From<$t> for Rational {
            #[inline]
            fn from(t: $t) -> Self {
                Rational::from_integer(BigInt::from(t))
            }
        }
    )*};
}
impl_from_primitive!(i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize);

impl Default for Rational {
    #[inline]
    fn default() -> Self {
        Rational::zero()
    }
}

// Comparison by value: unreduced representations of the same number are equal
impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        if self.denom == other.denom {
            return self.numer == other.numer;
        }
        &self.numer * &other.denom == &other.numer * &self.denom
    }
}

impl Eq for Rational {}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // sign fast path; denominators are always positive
        let sign_cmp = self.numer.sign().cmp(&other.numer.sign());
        if sign_cmp != Ordering::Equal {
            return sign_cmp;
        }
        if self.denom == other.denom {
            return self.numer.cmp(&other.numer);
        }
        (&self.numer * &other.denom).cmp(&(&other.numer * &self.denom))
    }
}

impl PartialOrd for Rational {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, 'b> Add<&'b Rational> for &'a Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Rational {
        let numer = &self.numer * &rhs.denom + &rhs.numer * &self.denom;
        let denom = &self.denom * &rhs.denom;
        Rational::reduce_parts(numer, denom)
    }
}

impl<'a, 'b> Sub<&'b Rational> for &'a Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Rational {
        let numer = &self.numer * &rhs.denom - &rhs.numer * &self.denom;
        let denom = &self.denom * &rhs.denom;
        Rational::reduce_parts(numer, denom)
    }
}

impl<'a, 'b> Mul<&'b Rational> for &'a Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Rational {
        Rational::reduce_parts(&self.numer * &rhs.numer, &self.denom * &rhs.denom)
    }
}

impl<'a, 'b> Div<&'b Rational> for &'a Rational {
    type Output = Rational;

    /// # Panics
    /// Panics when `rhs` is zero; see [Rational::checked_div][CheckedDiv].
    fn div(self, rhs: &Rational) -> Rational {
        if rhs.numer.is_zero() {
            panic!("division by zero");
        }
        let mut numer = &self.numer * &rhs.denom;
        let mut denom = &self.denom * &rhs.numer;
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        Rational::reduce_parts(numer, denom)
    }
}

impl<'a, 'b> Rem<&'b Rational> for &'a Rational {
    type Output = Rational;

    /// Truncation based remainder `self - trunc(self / rhs) * rhs`
    ///
    /// # Panics
    /// Panics when `rhs` is zero.
    fn rem(self, rhs: &Rational) -> Rational {
        if rhs.numer.is_zero() {
            panic!("division by zero");
        }
        let a = &self.numer * &rhs.denom;
        let b = &self.denom * &rhs.numer;
        let q = &a / &b;
        Rational::reduce_parts(a - q * b, &self.denom * &rhs.denom)
    }
}

macro_rules! forward_binop {
    (impl $imp:ident, $method:ident) => {
        impl $imp<Rational> for Rational {
            type Output = Rational;
            #[inline]
            fn $method(self, rhs: Rational) -> Rational {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $imp<&'a Rational> for Rational {
            type Output = Rational;
            #[inline]
            fn $method(self, rhs: &Rational) -> Rational {
                (&self).$method(rhs)
            }
        }

        impl<'a> $imp<Rational> for &'a Rational {
            type Output = Rational;
            #[inline]
            fn $method(self, rhs: Rational) -> Rational {
                self.$method(&rhs)
            }
        }
    };
}

forward_binop!(impl Add, add);
forward_binop!(impl Sub, sub);
forward_binop!(impl Mul, mul);
forward_binop!(impl Div, div);
forward_binop!(impl Rem, rem);

impl Neg for Rational {
    type Output = Rational;

    #[inline]
    fn neg(self) -> Rational {
        Rational::new_raw(-self.numer, self.denom)
    }
}

impl<'a> Neg for &'a Rational {
    type Output = Rational;

    #[inline]
    fn neg(self) -> Rational {
        Rational::new_raw(-self.numer.clone(), self.denom.clone())
    }
}

impl Zero for Rational {
    #[inline]
    fn zero() -> Self {
        Rational {
            numer: BigInt::zero(),
            denom: BigInt::one(),
        }
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }
}

impl One for Rational {
    #[inline]
    fn one() -> Self {
        Rational {
            numer: BigInt::one(),
            denom: BigInt::one(),
        }
    }

    #[inline]
    fn is_one(&self) -> bool {
        self.numer == self.denom
    }
}

impl Num for Rational {
    type FromStrRadixErr = ArithmeticError;

    /// Textual parsing is intentionally not implemented
    fn from_str_radix(_str: &str, _radix: u32) -> Result<Self, ArithmeticError> {
        Err(ArithmeticError::Unsupported)
    }
}

impl Signed for Rational {
    fn abs(&self) -> Self {
        Rational::new_raw(self.numer.abs(), self.denom.clone())
    }

    fn abs_sub(&self, other: &Self) -> Self {
        if self <= other {
            Rational::zero()
        } else {
            self - other
        }
    }

    fn signum(&self) -> Self {
        Rational::from_integer(self.numer.signum())
    }

    #[inline]
    fn is_positive(&self) -> bool {
        self.numer.is_positive()
    }

    #[inline]
    fn is_negative(&self) -> bool {
        self.numer.is_negative()
    }
}

impl CheckedDiv for Rational {
    #[inline]
    fn checked_div(&self, v: &Self) -> Option<Self> {
        if v.numer.is_zero() {
            None
        } else {
            Some(self / v)
        }
    }
}

impl ToPrimitive for Rational {
    fn to_i64(&self) -> Option<i64> {
        self.to_integer().to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        self.to_integer().to_u64()
    }

    /// Lossy conversion: numerator over denominator as floating point
    fn to_f64(&self) -> Option<f64> {
        Some(self.numer.to_f64()? / self.denom.to_f64()?)
    }
}

impl fmt::Display for Rational {
    /// `"n⁄d"` for a proper fraction, `"w r⁄d"` once the magnitude exceeds
    /// one, and a bare integer when the denominator is one
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom.is_one() {
            return write!(f, "{}", self.numer);
        }
        let (whole, rem) = self.numer.div_rem(&self.denom);
        if whole.is_zero() {
            write!(f, "{}\u{2044}{}", self.numer, self.denom)
        } else if rem.is_zero() {
            // only reachable for values kept unreduced
            write!(f, "{}", whole)
        } else {
            write!(f, "{} {}\u{2044}{}", whole, rem.abs(), self.denom)
        }
    }
}

impl FromStr for Rational {
    type Err = ArithmeticError;

    /// Textual parsing is intentionally not implemented
    fn from_str(_s: &str) -> Result<Self, ArithmeticError> {
        Err(ArithmeticError::Unsupported)
    }
}
