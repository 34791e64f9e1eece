mod cont_frac;
mod error;
mod rational;
pub mod symbols;
pub mod traits;

pub use cont_frac::{ContinuedFraction, Convergents, Terms};
pub use error::ArithmeticError;
pub use rational::{ByteFormat, Endianness, Rational, ToRational};
pub use traits::{Approximation, Computable, FromSqrt};
