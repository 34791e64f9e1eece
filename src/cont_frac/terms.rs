//! Term sources feeding [ContinuedFraction][super::ContinuedFraction]
//!
//! Every source here is a pure generator: cloning one that has not been
//! advanced yields the identical sequence again. The wrapper type keeps its
//! source pristine and hands out clones, which is what makes repeated
//! enumeration of the same continued fraction well defined.

use super::block::{Block, DualBlock};
use dyn_clone::DynClone;
use num_bigint::BigInt;
use num_integer::{Integer, Roots};
use num_traits::{One, Signed, Zero};

/// A pull-based source of partial quotients.
///
/// Implementations must be side effect free and repeatable: a clone taken
/// before any term was pulled produces the same sequence. This is a
/// correctness precondition of every consumer in this crate, not something
/// the type system enforces.
pub trait Terms: Iterator<Item = BigInt> + DynClone + Send + Sync {}

impl<I: Iterator<Item = BigInt> + DynClone + Send + Sync> Terms for I {}

dyn_clone::clone_trait_object!(Terms);

/// Euclidean expansion of `numer / denom` with a non-negative denominator.
/// Finite: the sequence ends when the remainder reaches zero.
#[derive(Debug, Clone)]
pub(crate) struct RatioTerms {
    numer: BigInt,
    denom: BigInt,
}

impl RatioTerms {
    pub fn new(numer: BigInt, denom: BigInt) -> Self {
        debug_assert!(!denom.is_negative());
        RatioTerms { numer, denom }
    }
}

impl Iterator for RatioTerms {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        if self.denom.is_zero() {
            return None;
        }
        let (quo, rem) = self.numer.div_mod_floor(&self.denom);
        self.numer = std::mem::replace(&mut self.denom, rem);
        Some(quo)
    }
}

/// Periodic expansion of `√square` for a non-negative integer.
///
/// Seeds `a0 = ⌊√S⌋`; a perfect square yields the single term `a0`,
/// anything else iterates `m ← d·a − m`, `d ← (S − m²)/d`, `a ← (a0 + m)/d`
/// forever and must be consumed lazily.
#[derive(Debug, Clone)]
pub(crate) struct SqrtTerms {
    square: BigInt,
    root: BigInt,
    m: BigInt,
    d: BigInt,
    a: BigInt,
    started: bool,
    perfect: bool,
}

impl SqrtTerms {
    /// `square` must be non-negative
    pub fn new(square: BigInt) -> Self {
        debug_assert!(!square.is_negative());
        let root = square.sqrt();
        let perfect = &root * &root == square;
        SqrtTerms {
            m: BigInt::zero(),
            d: BigInt::one(),
            a: root.clone(),
            root,
            square,
            started: false,
            perfect,
        }
    }
}

impl Iterator for SqrtTerms {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        if !self.started {
            self.started = true;
            return Some(self.a.clone());
        }
        if self.perfect {
            return None;
        }
        let m = &self.d * &self.a - &self.m;
        let d = (&self.square - &m * &m) / &self.d;
        let a = (&self.root + &m) / &d;
        self.m = m;
        self.d = d;
        self.a = a.clone();
        Some(a)
    }
}

/// Lazy negation by the canonical prefix rewrite.
///
/// The sequence head is rewritten so that every term after the first stays
/// positive: an empty sequence stays empty, `[a]` becomes `[-a]`,
/// `[a, 1, b, …]` becomes `[-a-1, b+1, …]` and `[a, b, …]` with `b > 1`
/// becomes `[-a-1, 1, b-1, …]`. Terms past the rewritten prefix pass
/// through untouched.
#[derive(Clone)]
pub(crate) struct NegatedTerms {
    inner: Box<dyn Terms>,
    queue: Vec<BigInt>, // rewritten prefix, last element first
    started: bool,
}

impl NegatedTerms {
    pub fn new(inner: Box<dyn Terms>) -> Self {
        NegatedTerms {
            inner,
            queue: Vec::new(),
            started: false,
        }
    }
}

impl Iterator for NegatedTerms {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        if !self.started {
            self.started = true;
            if let Some(a) = self.inner.next() {
                match self.inner.next() {
                    None => self.queue.push(-a),
                    Some(b) => {
                        if b.is_one() {
                            match self.inner.next() {
                                // [a, 1] is [a + 1]
                                None => self.queue.push(-a - 1),
                                Some(c) => {
                                    self.queue.push(c + 1);
                                    self.queue.push(-a - 1);
                                }
                            }
                        } else {
                            self.queue.push(b - 1);
                            self.queue.push(BigInt::one());
                            self.queue.push(-a - 1);
                        }
                    }
                }
            }
        }
        if let Some(term) = self.queue.pop() {
            return Some(term);
        }
        self.inner.next()
    }
}

/// Output terms of a linear fractional map over one input stream.
///
/// Terms are extracted whenever the map pins the next quotient down; once
/// the input is exhausted the remaining ratio is drained exactly by
/// Euclidean expansion, so a rational input produces the full rational
/// result.
#[derive(Clone)]
pub(crate) struct HomographicTerms {
    state: HomoState,
}

#[derive(Clone)]
enum HomoState {
    Streaming { block: Block, input: Box<dyn Terms> },
    Draining(RatioTerms),
    Done,
}

/// The state for a ratio left over by an exhausted stream; a vanished
/// denominator means the value is unbounded and yields nothing
fn tail_state(mut numer: BigInt, mut denom: BigInt) -> HomoState {
    if denom.is_negative() {
        numer = -numer;
        denom = -denom;
    }
    if denom.is_zero() {
        HomoState::Done
    } else {
        HomoState::Draining(RatioTerms::new(numer, denom))
    }
}

impl HomographicTerms {
    pub fn new(block: Block, input: Box<dyn Terms>) -> Self {
        HomographicTerms {
            state: HomoState::Streaming { block, input },
        }
    }
}

impl Iterator for HomographicTerms {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        loop {
            match &mut self.state {
                HomoState::Streaming { block, input } => {
                    if let Some(term) = block.extract() {
                        return Some(term);
                    }
                    if block.is_unbounded() {
                        self.state = HomoState::Done;
                        return None;
                    }
                    match input.next() {
                        Some(term) => block.push(term),
                        None => {
                            let old = std::mem::replace(&mut self.state, HomoState::Done);
                            if let HomoState::Streaming { block, .. } = old {
                                let (numer, denom) = block.into_tail();
                                self.state = tail_state(numer, denom);
                            }
                        }
                    }
                }
                HomoState::Draining(tail) => match tail.next() {
                    Some(term) => return Some(term),
                    None => {
                        self.state = HomoState::Done;
                        return None;
                    }
                },
                HomoState::Done => return None,
            }
        }
    }
}

/// Folds tolerated without an output term before the bihomographic
/// transform gives up and flushes the dominant coefficient ratio. Quotient
/// agreement can oscillate forever when the exact result sits on an integer
/// boundary (`√2 · √2`), so the bound is a heuristic cutoff, not a
/// convergence proof.
const STALL_LIMIT: usize = 64;

/// Output terms of a bilinear map over two input streams (Gosper's
/// algorithm).
///
/// Input is consumed from whichever stream still has terms, alternating
/// while both do. When one stream runs out the transform degrades to the
/// homographic map over the other; when no term has been produced for
/// [STALL_LIMIT] folds the remaining value is flushed as at most two terms
/// obtained by integer division, and the sequence ends.
#[derive(Clone)]
pub(crate) struct BihomographicTerms {
    state: BiState,
}

#[derive(Clone)]
enum BiState {
    Dual {
        block: DualBlock,
        x: Box<dyn Terms>,
        y: Box<dyn Terms>,
        pull_y: bool,
        stalls: usize,
    },
    Tail(HomographicTerms),
    Flush(Vec<BigInt>), // last element first
    Done,
}

/// Flush the leftover ratio as one or two final terms
fn flush_state(mut numer: BigInt, mut denom: BigInt) -> BiState {
    if denom.is_negative() {
        numer = -numer;
        denom = -denom;
    }
    if denom.is_zero() {
        return BiState::Done;
    }
    let (first, rem) = numer.div_mod_floor(&denom);
    let mut queue = Vec::new();
    if !rem.is_zero() {
        queue.push(denom.div_mod_floor(&rem).0);
    }
    queue.push(first);
    BiState::Flush(queue)
}

impl BihomographicTerms {
    pub fn new(block: DualBlock, x: Box<dyn Terms>, y: Box<dyn Terms>) -> Self {
        BihomographicTerms {
            state: BiState::Dual {
                block,
                x,
                y,
                pull_y: false,
                stalls: 0,
            },
        }
    }
}

impl Iterator for BihomographicTerms {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        loop {
            match &mut self.state {
                BiState::Dual {
                    block,
                    pull_y,
                    stalls,
                    x,
                    y,
                } => {
                    if let Some(term) = block.extract() {
                        *stalls = 0;
                        return Some(term);
                    }
                    if block.is_unbounded() {
                        self.state = BiState::Done;
                        return None;
                    }
                    if *stalls >= STALL_LIMIT {
                        let old = std::mem::replace(&mut self.state, BiState::Done);
                        if let BiState::Dual { block, .. } = old {
                            let (numer, denom) = block.into_dominant();
                            self.state = flush_state(numer, denom);
                        }
                        continue;
                    }

                    let use_y = *pull_y;
                    *pull_y = !use_y;
                    let term = if use_y { y.next() } else { x.next() };
                    match term {
                        Some(term) => {
                            if use_y {
                                block.push_y(term);
                            } else {
                                block.push_x(term);
                            }
                            *stalls += 1;
                        }
                        None => {
                            let old = std::mem::replace(&mut self.state, BiState::Done);
                            if let BiState::Dual { block, x, y, .. } = old {
                                self.state = if use_y {
                                    BiState::Tail(HomographicTerms::new(block.into_x_tail(), x))
                                } else {
                                    BiState::Tail(HomographicTerms::new(block.into_y_tail(), y))
                                };
                            }
                        }
                    }
                }
                BiState::Tail(tail) => match tail.next() {
                    Some(term) => return Some(term),
                    None => {
                        self.state = BiState::Done;
                        return None;
                    }
                },
                BiState::Flush(queue) => match queue.pop() {
                    Some(term) => return Some(term),
                    None => {
                        self.state = BiState::Done;
                        return None;
                    }
                },
                BiState::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::TryFrom;

    fn collect(mut it: impl Iterator<Item = BigInt>, n: usize) -> Vec<i64> {
        let mut out = Vec::new();
        for _ in 0..n {
            match it.next() {
                Some(v) => out.push(i64::try_from(v).unwrap()),
                None => break,
            }
        }
        out
    }

    #[test]
    fn ratio_terms_test() {
        let terms = RatioTerms::new(BigInt::from(5), BigInt::from(6));
        assert_eq!(collect(terms, 10), vec![0, 1, 5]);

        let terms = RatioTerms::new(BigInt::from(355), BigInt::from(113));
        assert_eq!(collect(terms, 10), vec![3, 7, 16]);

        // floor division keeps the tail positive for negative values
        let terms = RatioTerms::new(BigInt::from(-22), BigInt::from(7));
        assert_eq!(collect(terms, 10), vec![-4, 1, 6]);

        let terms = RatioTerms::new(BigInt::from(0), BigInt::from(1));
        assert_eq!(collect(terms, 10), vec![0]);
    }

    #[test]
    fn sqrt_terms_test() {
        assert_eq!(collect(SqrtTerms::new(BigInt::from(2)), 5), vec![1, 2, 2, 2, 2]);
        assert_eq!(
            collect(SqrtTerms::new(BigInt::from(7)), 9),
            vec![2, 1, 1, 1, 4, 1, 1, 1, 4]
        );
        assert_eq!(
            collect(SqrtTerms::new(BigInt::from(13)), 6),
            vec![3, 1, 1, 1, 1, 6]
        );

        // perfect squares terminate after the single exact term
        assert_eq!(collect(SqrtTerms::new(BigInt::from(9)), 5), vec![3]);
        assert_eq!(collect(SqrtTerms::new(BigInt::zero()), 5), vec![0]);
    }

    fn boxed(terms: Vec<i64>) -> Box<dyn Terms> {
        Box::new(terms.into_iter().map(BigInt::from))
    }

    #[test]
    fn negate_prefix_cases_test() {
        // the four rewrite cases, exactly
        assert_eq!(collect(NegatedTerms::new(boxed(vec![])), 5), Vec::<i64>::new());
        assert_eq!(collect(NegatedTerms::new(boxed(vec![5])), 5), vec![-5]);
        assert_eq!(
            collect(NegatedTerms::new(boxed(vec![0, 1, 5])), 5),
            vec![-1, 6]
        );
        assert_eq!(
            collect(NegatedTerms::new(boxed(vec![3, 7, 16])), 5),
            vec![-4, 1, 6, 16]
        );
    }

    #[test]
    fn negate_involution_test() {
        for terms in [vec![3, 7, 16], vec![0, 1, 5], vec![-4, 1, 6], vec![2]].iter() {
            let once = NegatedTerms::new(boxed(terms.clone()));
            let twice = NegatedTerms::new(Box::new(once));
            assert_eq!(collect(twice, 8), terms.clone());
        }
    }

    #[test]
    fn homographic_drain_test() {
        // identity map over a finite stream reproduces it
        let map = HomographicTerms::new(Block::identity(), boxed(vec![3, 7, 16]));
        assert_eq!(collect(map, 8), vec![3, 7, 16]);

        // 2·x + 1 over 5/6: 2·5/6 + 1 = 8/3 = [2; 1, 2]
        let map = HomographicTerms::new(
            Block::new(BigInt::from(2), BigInt::one(), BigInt::zero(), BigInt::one()),
            boxed(vec![0, 1, 5]),
        );
        assert_eq!(collect(map, 8), vec![2, 1, 2]);

        // x/0 is unbounded and yields nothing
        let map = HomographicTerms::new(
            Block::new(BigInt::one(), BigInt::zero(), BigInt::zero(), BigInt::zero()),
            boxed(vec![1, 2, 3]),
        );
        assert_eq!(collect(map, 8), Vec::<i64>::new());
    }

    #[test]
    fn gosper_stall_fallback_test() {
        // √2 · √2 never settles between 1.99… and 2.00…; the stall guard
        // must flush a value equal to 2 within the accumulated precision
        let product = BihomographicTerms::new(
            DualBlock::new(
                BigInt::one(),
                BigInt::zero(),
                BigInt::zero(),
                BigInt::zero(),
                BigInt::zero(),
                BigInt::zero(),
                BigInt::zero(),
                BigInt::one(),
            ),
            Box::new(SqrtTerms::new(BigInt::from(2))),
            Box::new(SqrtTerms::new(BigInt::from(2))),
        );
        let terms: Vec<BigInt> = product.take(4).collect();
        assert!(!terms.is_empty());
        assert!(terms.len() <= 2); // at most two flushed terms

        // fold back and compare against 2
        let mut block = Block::identity();
        let mut value = (BigInt::zero(), BigInt::one());
        for t in terms {
            value = block.convergent_step(t);
        }
        let error = value.0 * 1_000_000i64 - BigInt::from(2) * 1_000_000i64 * &value.1;
        assert!(error.abs() < value.1.abs());
    }
}
