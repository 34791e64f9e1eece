//! Data structures and algorithms for lazy simple continued fractions
//!
//! A [ContinuedFraction] wraps a pure term generator ([Terms]), so a value
//! may carry finitely many partial quotients (a rational) or infinitely
//! many (e.g. a square root). Arithmetic composes term transforms instead
//! of computing sequences: single operand operations go through the
//! homographic map and binary operations through the bihomographic
//! (Gosper) map.
//!
//! # References:
//! - <https://pi.math.cornell.edu/~gautam/ContinuedFractions.pdf>
//! - <https://crypto.stanford.edu/pbc/notes/contfrac/>
//! - <http://www.numbertheory.org/continued_fractions.html>
//! - <https://github.com/blynn/frac>

mod block;
mod simple;
mod terms;

pub use simple::{ContinuedFraction, Convergents};
pub use terms::Terms;
