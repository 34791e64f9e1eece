//! Coefficient tables for the homographic and bihomographic transforms
//!
//! The tables follow the magic table method described in
//! <https://crypto.stanford.edu/pbc/notes/contfrac/compute.html> and
//! <https://crypto.stanford.edu/pbc/notes/contfrac/bihom.html>: input terms
//! fold into the coefficients, and an output term is extracted whenever the
//! floor quotients at the interval endpoints agree.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::mem::swap;

/// Coefficients of the linear fractional map `(p1·x + p2) / (q1·x + q2)`
#[derive(Debug, Clone)]
pub(crate) struct Block {
    pm1: BigInt,
    pm2: BigInt,
    qm1: BigInt,
    qm2: BigInt,
}

impl Block {
    /// A block that represents `(a·x + b) / (c·x + d)`
    pub fn new(a: BigInt, b: BigInt, c: BigInt, d: BigInt) -> Self {
        Block {
            pm1: a,
            pm2: b,
            qm1: c,
            qm2: d,
        }
    }

    /// A block that passes the input through unchanged
    pub fn identity() -> Self {
        Block {
            pm1: BigInt::one(),
            pm2: BigInt::zero(),
            qm1: BigInt::zero(),
            qm2: BigInt::one(),
        }
    }

    /// Fold the next input term into the map, substituting `x = a + 1/x'`
    pub fn push(&mut self, a: BigInt) {
        let p = &a * &self.pm1 + &self.pm2;
        let q = &a * &self.qm1 + &self.qm2;
        self.pm2 = std::mem::replace(&mut self.pm1, p);
        self.qm2 = std::mem::replace(&mut self.qm1, q);
    }

    /// Advance the plain convergent recurrence and return the new
    /// convergent. Starting from [Block::identity], feeding `a0, a1, …`
    /// yields `h_k / k_k` pairs.
    pub fn convergent_step(&mut self, a: BigInt) -> (BigInt, BigInt) {
        self.push(a);
        (self.pm1.clone(), self.qm1.clone())
    }

    /// The value of the map once the input stream is exhausted (x → ∞)
    pub fn into_tail(self) -> (BigInt, BigInt) {
        (self.pm1, self.qm1)
    }

    /// Whether the map can no longer produce finite output (both
    /// denominator coefficients vanished). Folding more terms cannot bring
    /// them back.
    pub fn is_unbounded(&self) -> bool {
        self.qm1.is_zero() && self.qm2.is_zero()
    }

    /// Extract the next output term if the quotients at both interval
    /// endpoints (`x → ∞` and `x → 0`) agree.
    ///
    /// On success the map shrinks to `1/(M(x) − term)`: the numerator pair
    /// becomes the old denominators and the denominator pair the floor
    /// remainders. The denominators must be nonzero and share a sign,
    /// otherwise the interval still straddles a pole and nothing is emitted.
    pub fn extract(&mut self) -> Option<BigInt> {
        if self.qm1.is_zero() || self.qm2.is_zero() || self.qm1.sign() != self.qm2.sign() {
            return None;
        }
        let (i1, r1) = self.pm1.div_mod_floor(&self.qm1);
        let (i2, r2) = self.pm2.div_mod_floor(&self.qm2);
        if i1 != i2 {
            return None;
        }
        swap(&mut self.pm1, &mut self.qm1);
        self.qm1 = r1;
        swap(&mut self.pm2, &mut self.qm2);
        self.qm2 = r2;
        Some(i1)
    }
}

/// Coefficients of the bilinear map
/// `(p11·xy + p12·x + p21·y + p22) / (q11·xy + q12·x + q21·y + q22)`
#[derive(Debug, Clone)]
pub(crate) struct DualBlock {
    pm11: BigInt,
    pm12: BigInt,
    pm21: BigInt,
    pm22: BigInt,
    qm11: BigInt,
    qm12: BigInt,
    qm21: BigInt,
    qm22: BigInt,
}

impl DualBlock {
    /// A block that represents `(a·xy + b·x + c·y + d) / (e·xy + f·x + g·y + h)`
    #[allow(clippy::too_many_arguments)]
    pub fn new(a: BigInt, b: BigInt, c: BigInt, d: BigInt, e: BigInt, f: BigInt, g: BigInt, h: BigInt) -> Self {
        DualBlock {
            pm11: a,
            pm12: b,
            pm21: c,
            pm22: d,
            qm11: e,
            qm12: f,
            qm21: g,
            qm22: h,
        }
    }

    /// Fold a term of the first stream, substituting `x = a + 1/x'`
    pub fn push_x(&mut self, a: BigInt) {
        let p1 = &a * &self.pm11 + &self.pm21;
        let q1 = &a * &self.qm11 + &self.qm21;
        let p2 = &a * &self.pm12 + &self.pm22;
        let q2 = &a * &self.qm12 + &self.qm22;
        self.pm21 = std::mem::replace(&mut self.pm11, p1);
        self.qm21 = std::mem::replace(&mut self.qm11, q1);
        self.pm22 = std::mem::replace(&mut self.pm12, p2);
        self.qm22 = std::mem::replace(&mut self.qm12, q2);
    }

    /// Fold a term of the second stream, substituting `y = a + 1/y'`
    pub fn push_y(&mut self, a: BigInt) {
        let p1 = &a * &self.pm11 + &self.pm12;
        let q1 = &a * &self.qm11 + &self.qm12;
        let p2 = &a * &self.pm21 + &self.pm22;
        let q2 = &a * &self.qm21 + &self.qm22;
        self.pm12 = std::mem::replace(&mut self.pm11, p1);
        self.qm12 = std::mem::replace(&mut self.qm11, q1);
        self.pm22 = std::mem::replace(&mut self.pm21, p2);
        self.qm22 = std::mem::replace(&mut self.qm21, q2);
    }

    /// The one-stream map left for x when the y stream is exhausted (y → ∞)
    pub fn into_x_tail(self) -> Block {
        Block::new(self.pm11, self.pm21, self.qm11, self.qm21)
    }

    /// The one-stream map left for y when the x stream is exhausted (x → ∞)
    pub fn into_y_tail(self) -> Block {
        Block::new(self.pm11, self.pm12, self.qm11, self.qm12)
    }

    /// The dominant coefficient ratio, the map's value as both streams → ∞
    pub fn into_dominant(self) -> (BigInt, BigInt) {
        (self.pm11, self.qm11)
    }

    /// Whether every denominator coefficient vanished; see
    /// [Block::is_unbounded]
    pub fn is_unbounded(&self) -> bool {
        self.qm11.is_zero() && self.qm12.is_zero() && self.qm21.is_zero() && self.qm22.is_zero()
    }

    /// Extract the next output term if the quotients at all four corner
    /// evaluations agree; the same shrink rule as [Block::extract] applies
    /// to each coefficient pair.
    pub fn extract(&mut self) -> Option<BigInt> {
        let sign = self.qm11.sign();
        for q in [&self.qm11, &self.qm12, &self.qm21, &self.qm22].iter() {
            if q.is_zero() || q.sign() != sign {
                return None;
            }
        }

        let (i11, r11) = self.pm11.div_mod_floor(&self.qm11);
        let (i12, r12) = self.pm12.div_mod_floor(&self.qm12);
        let (i21, r21) = self.pm21.div_mod_floor(&self.qm21);
        let (i22, r22) = self.pm22.div_mod_floor(&self.qm22);
        if i11 != i12 || i11 != i21 || i11 != i22 {
            return None;
        }

        swap(&mut self.pm11, &mut self.qm11);
        self.qm11 = r11;
        swap(&mut self.pm12, &mut self.qm12);
        self.qm12 = r12;
        swap(&mut self.pm21, &mut self.qm21);
        self.qm21 = r21;
        swap(&mut self.pm22, &mut self.qm22);
        self.qm22 = r22;
        Some(i11)
    }
}
