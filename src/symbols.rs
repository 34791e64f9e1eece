//! Predefined irrational math constants as continued fraction term sources

use num_bigint::BigInt;
use num_traits::{One, Zero};

/// Euler's number e = [2; 1, 2, 1, 1, 4, 1, 1, 6, …]
pub struct E {}

/// The golden ratio φ = [1; 1, 1, 1, …]
pub struct Phi {}

impl E {
    pub fn cfrac(&self) -> ECoefficients {
        ECoefficients {
            i: BigInt::zero(),
            m: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ECoefficients {
    i: BigInt,
    m: u8,
}

impl Iterator for ECoefficients {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        if self.i.is_zero() {
            self.i = BigInt::from(2);
            Some(BigInt::from(2))
        } else {
            let result = match self.m {
                1 => Some(self.i.clone()),
                _ => Some(BigInt::one()),
            };

            if self.m == 2 {
                self.m = 0;
                self.i += 2;
            } else {
                self.m += 1;
            }

            result
        }
    }
}

impl Phi {
    pub fn cfrac(&self) -> PhiCoefficients {
        PhiCoefficients {}
    }
}

#[derive(Debug, Clone)]
pub struct PhiCoefficients {}

impl Iterator for PhiCoefficients {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        Some(BigInt::one())
    }
}
