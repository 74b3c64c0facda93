//! Variable-length sequence operators.
//!
//! Unlike permutation operators, these may grow or shrink a sequence.
//! Every operator draws fresh actions uniformly from the crafter's action
//! set and reports contract violations as errors.
//!
//! # Mutation Operators
//!
//! - [`Mutation::RandomWindow`]: re-roll a short window
//! - [`Mutation::SwapAdjacent`]: exchange two neighbours
//! - [`Mutation::Reverse`]: reverse a segment (length ≥ 6 only)
//! - [`Mutation::Point`]: replace (75%) or delete one position
//! - [`Mutation::KillWindow`]: delete a short window
//!
//! # Crossover
//!
//! [`SequenceOps::crossover`] swaps one short window between two parents.

use std::ops::Range;

use rand::Rng;

use super::config::SolverConfig;
use crate::actions::ActionId;
use crate::error::{Result, SolverError};
use crate::random::{random_int, unit, weighted_index};

/// Random sequence length ranges, half-open, matched to
/// [`SolverConfig::length_weights`].
const LENGTH_BUCKETS: [(usize, usize); 3] = [(2, 9), (9, 17), (17, 31)];

/// Probability that a point mutation replaces rather than deletes.
const POINT_REPLACE_PROB: f64 = 0.75;

/// Shortest sequence the reverse mutation touches.
const MIN_REVERSE_LEN: usize = 6;

/// The five mutation operators, in weight order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    RandomWindow,
    SwapAdjacent,
    Reverse,
    Point,
    KillWindow,
}

impl Mutation {
    /// All operators, indexed like [`SolverConfig::mutation_weights`].
    pub const ALL: [Mutation; 5] = [
        Mutation::RandomWindow,
        Mutation::SwapAdjacent,
        Mutation::Reverse,
        Mutation::Point,
        Mutation::KillWindow,
    ];
}

/// Operator context: the action pool and the window limits.
#[derive(Debug, Clone)]
pub struct SequenceOps<'a> {
    actions: &'a [ActionId],
    max_subsequence_length: usize,
    max_length: Option<usize>,
    mutation_weights: [f64; 5],
    length_weights: [f64; 3],
}

impl<'a> SequenceOps<'a> {
    /// Builds operators over `actions`, taking limits and weights from
    /// `config`.
    ///
    /// # Errors
    /// Returns [`SolverError::InvalidArgument`] when `actions` is empty.
    pub fn new(
        actions: &'a [ActionId],
        max_length: Option<usize>,
        config: &SolverConfig,
    ) -> Result<Self> {
        if actions.is_empty() {
            return Err(SolverError::InvalidArgument(
                "action set must not be empty".into(),
            ));
        }
        Ok(Self {
            actions,
            max_subsequence_length: config.max_subsequence_length.max(1),
            max_length,
            mutation_weights: config.mutation_weights,
            length_weights: config.length_weights,
        })
    }

    /// One action drawn uniformly from the pool.
    pub fn random_action<R: Rng>(&self, rng: &mut R) -> Result<ActionId> {
        Ok(self.actions[random_int(rng, 0, self.actions.len())?])
    }

    /// A fresh random sequence.
    ///
    /// With a maximum length `m` the length is uniform in `[2, m)`;
    /// otherwise a length bucket is drawn by weight first.
    pub fn random_sequence<R: Rng>(&self, rng: &mut R) -> Result<Vec<ActionId>> {
        let len = match self.max_length {
            Some(max) => random_int(rng, 2, max)?,
            None => {
                let (lo, hi) = LENGTH_BUCKETS[weighted_index(&self.length_weights, rng)?];
                random_int(rng, lo, hi)?
            }
        };
        (0..len).map(|_| self.random_action(rng)).collect()
    }

    /// Applies one weighted-drawn mutation to a copy of `sequence`.
    ///
    /// Never returns an empty sequence: an emptied result is replaced by a
    /// fresh random sequence.
    pub fn mutate<R: Rng>(&self, sequence: &[ActionId], rng: &mut R) -> Result<Vec<ActionId>> {
        let op = Mutation::ALL[weighted_index(&self.mutation_weights, rng)?];
        let mut out = sequence.to_vec();
        self.apply(op, &mut out, rng)?;
        if out.is_empty() {
            out = self.random_sequence(rng)?;
        }
        Ok(out)
    }

    /// Applies `op` in place. Empty sequences are left untouched.
    pub fn apply<R: Rng>(
        &self,
        op: Mutation,
        sequence: &mut Vec<ActionId>,
        rng: &mut R,
    ) -> Result<()> {
        let len = sequence.len();
        if len == 0 {
            return Ok(());
        }
        match op {
            Mutation::RandomWindow => {
                let (start, end) = window(len, 1..self.longest(len) + 1, rng)?;
                for slot in &mut sequence[start..end] {
                    *slot = self.random_action(rng)?;
                }
            }
            Mutation::SwapAdjacent => {
                if len >= 2 {
                    let i = random_int(rng, 0, len - 1)?;
                    sequence.swap(i, i + 1);
                }
            }
            Mutation::Reverse => {
                if len >= MIN_REVERSE_LEN {
                    let i = random_int(rng, 0, len / 2)?;
                    let j = random_int(rng, 0, len - i)?;
                    sequence[i.min(j)..=i.max(j)].reverse();
                }
            }
            Mutation::Point => {
                let p = random_int(rng, 0, len)?;
                if unit(rng) < POINT_REPLACE_PROB {
                    sequence[p] = self.random_action(rng)?;
                } else {
                    sequence.remove(p);
                }
            }
            Mutation::KillWindow => {
                let (start, end) = window(len, 1..self.longest(len) + 1, rng)?;
                sequence.drain(start..end);
            }
        }
        Ok(())
    }

    /// Swaps one window between the parents.
    ///
    /// Each parent contributes a window of length `0..min(len,
    /// max_subsequence_length)`, so a single-action parent always
    /// contributes an empty window. The first child is `a` with its window
    /// replaced by `b`'s, the second the reverse. Combined length is
    /// preserved.
    ///
    /// # Errors
    /// Returns [`SolverError::InvalidArgument`] when a parent is empty.
    pub fn crossover<R: Rng>(
        &self,
        a: &[ActionId],
        b: &[ActionId],
        rng: &mut R,
    ) -> Result<(Vec<ActionId>, Vec<ActionId>)> {
        if a.is_empty() || b.is_empty() {
            return Err(SolverError::InvalidArgument(
                "crossover parents must not be empty".into(),
            ));
        }
        let (a_start, a_end) = window(a.len(), 0..self.longest(a.len()), rng)?;
        let (b_start, b_end) = window(b.len(), 0..self.longest(b.len()), rng)?;

        let splice = |head: &[ActionId], mid: &[ActionId], tail: &[ActionId]| {
            let mut child = Vec::with_capacity(head.len() + mid.len() + tail.len());
            child.extend_from_slice(head);
            child.extend_from_slice(mid);
            child.extend_from_slice(tail);
            child
        };
        let first = splice(&a[..a_start], &b[b_start..b_end], &a[a_end..]);
        let second = splice(&b[..b_start], &a[a_start..a_end], &b[b_end..]);
        Ok((first, second))
    }

    /// Widest window allowed in a sequence of length `len`.
    fn longest(&self, len: usize) -> usize {
        len.min(self.max_subsequence_length)
    }
}

/// Random `[start, end)` window inside a sequence of length `len`, with a
/// width drawn from `widths` (never wider than `len`).
fn window<R: Rng>(len: usize, widths: Range<usize>, rng: &mut R) -> Result<(usize, usize)> {
    let width = random_int(rng, widths.start, widths.end)?;
    let start = random_int(rng, 0, len - width + 1)?;
    Ok((start, start + width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionId::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    const POOL: [ActionId; 5] = [
        BasicSynthesis,
        BasicTouch,
        MastersMend,
        Observe,
        Veneration,
    ];

    fn ops(config: &SolverConfig) -> SequenceOps<'static> {
        SequenceOps::new(&POOL, None, config).unwrap()
    }

    fn only(op: Mutation) -> SolverConfig {
        let mut weights = [0.0; 5];
        weights[op as usize] = 1.0;
        SolverConfig::default().with_mutation_weights(weights)
    }

    fn arb_sequence(max: usize) -> impl Strategy<Value = Vec<ActionId>> {
        prop::collection::vec(prop::sample::select(POOL.to_vec()), 1..max)
    }

    #[test]
    fn test_empty_pool_is_error() {
        let err = SequenceOps::new(&[], None, &SolverConfig::default()).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_random_sequence_buckets() {
        let ops = ops(&SolverConfig::default());
        let mut rng = create_rng(3);
        for _ in 0..500 {
            let seq = ops.random_sequence(&mut rng).unwrap();
            assert!((2..31).contains(&seq.len()));
            assert!(seq.iter().all(|a| POOL.contains(a)));
        }
    }

    #[test]
    fn test_random_sequence_max_length() {
        let ops = SequenceOps::new(&POOL, Some(5), &SolverConfig::default()).unwrap();
        let mut rng = create_rng(3);
        for _ in 0..200 {
            let len = ops.random_sequence(&mut rng).unwrap().len();
            assert!((2..5).contains(&len));
        }
    }

    #[test]
    fn test_swap_adjacent() {
        let ops = ops(&SolverConfig::default());
        let mut rng = create_rng(9);
        let mut seq = vec![Observe, BasicTouch];
        ops.apply(Mutation::SwapAdjacent, &mut seq, &mut rng).unwrap();
        assert_eq!(seq, vec![BasicTouch, Observe]);

        let mut single = vec![Observe];
        ops.apply(Mutation::SwapAdjacent, &mut single, &mut rng).unwrap();
        assert_eq!(single, vec![Observe]);
    }

    #[test]
    fn test_reverse_needs_six() {
        let ops = ops(&SolverConfig::default());
        let mut rng = create_rng(11);
        let short = vec![Observe, BasicTouch, MastersMend, Veneration, BasicSynthesis];
        let mut seq = short.clone();
        for _ in 0..50 {
            ops.apply(Mutation::Reverse, &mut seq, &mut rng).unwrap();
        }
        assert_eq!(seq, short);
    }

    #[test]
    fn test_reverse_keeps_multiset() {
        let ops = ops(&SolverConfig::default());
        let mut rng = create_rng(12);
        let original = vec![
            Observe,
            BasicTouch,
            MastersMend,
            Veneration,
            BasicSynthesis,
            Observe,
            BasicTouch,
        ];
        let mut seq = original.clone();
        for _ in 0..20 {
            ops.apply(Mutation::Reverse, &mut seq, &mut rng).unwrap();
            let mut a: Vec<usize> = seq.iter().map(|x| x.index()).collect();
            let mut b: Vec<usize> = original.iter().map(|x| x.index()).collect();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_kill_window_is_reachable() {
        let config = only(Mutation::KillWindow);
        let ops = ops(&config);
        let mut rng = create_rng(5);
        let seq = vec![Observe; 10];
        let out = ops.mutate(&seq, &mut rng).unwrap();
        assert!(out.len() < 10 && out.len() >= 6);
    }

    #[test]
    fn test_crossover_empty_parent_is_error() {
        let ops = ops(&SolverConfig::default());
        let mut rng = create_rng(0);
        assert!(ops.crossover(&[], &[Observe], &mut rng).is_err());
    }

    #[test]
    fn test_crossover_single_action_parents_unchanged() {
        let ops = ops(&SolverConfig::default());
        let mut rng = create_rng(12);
        for _ in 0..200 {
            let (c, d) = ops.crossover(&[Observe], &[BasicTouch], &mut rng).unwrap();
            assert_eq!(c, vec![Observe]);
            assert_eq!(d, vec![BasicTouch]);
        }
    }

    proptest! {
        #[test]
        fn test_crossover_conserves_length(
            a in arb_sequence(30),
            b in arb_sequence(30),
            seed in any::<u64>(),
        ) {
            let ops = ops(&SolverConfig::default());
            let mut rng = create_rng(seed);
            let (c, d) = ops.crossover(&a, &b, &mut rng).unwrap();
            prop_assert_eq!(c.len() + d.len(), a.len() + b.len());
            // Windows are narrower than the configured maximum of 4.
            prop_assert!(c.len().abs_diff(a.len()) <= 3);
        }

        #[test]
        fn test_mutation_never_empty(
            seq in arb_sequence(30),
            seed in any::<u64>(),
            op in 0usize..5,
        ) {
            let config = only(Mutation::ALL[op]);
            let ops = ops(&config);
            let mut rng = create_rng(seed);
            let out = ops.mutate(&seq, &mut rng).unwrap();
            prop_assert!(!out.is_empty());
            prop_assert!(out.iter().all(|a| POOL.contains(a)));
        }

        #[test]
        fn test_random_window_keeps_length(seq in arb_sequence(30), seed in any::<u64>()) {
            let ops = ops(&SolverConfig::default());
            let mut rng = create_rng(seed);
            let mut out = seq.clone();
            ops.apply(Mutation::RandomWindow, &mut out, &mut rng).unwrap();
            prop_assert_eq!(out.len(), seq.len());
            let changed = out.iter().zip(&seq).filter(|(x, y)| x != y).count();
            prop_assert!(changed <= 4);
        }
    }
}
