//! Fitness tuple, individuals and the evaluation seam.
//!
//! [`Evaluate`] is the contract between the island runner and whatever
//! scores an action sequence. [`FitnessEvaluator`](super::FitnessEvaluator)
//! is the production implementation; tests plug in simpler ones.

use std::cmp::Ordering;

use crate::actions::ActionId;

/// Scores a candidate sequence.
///
/// # Thread Safety
///
/// `Evaluate` must be `Sync` because islands are evolved in parallel and
/// share one evaluator.
pub trait Evaluate: Sync {
    /// Scores `sequence`. Higher is better.
    fn evaluate(&self, sequence: &[ActionId]) -> Fitness;
}

/// Four-component score, ordered lexicographically.
///
/// Components are compared in order: `fitness`, then raw `progress`, then
/// leftover `cp`, then **shorter** `length` wins. Floats use a total order,
/// so `Fitness` is `Ord` and can key sorts directly.
#[derive(Debug, Clone, Copy)]
pub struct Fitness {
    pub fitness: f64,
    pub progress: f64,
    pub cp: f64,
    pub length: usize,
}

impl Fitness {
    /// A score every real evaluation beats.
    pub fn worst() -> Self {
        Self {
            fitness: f64::NEG_INFINITY,
            progress: f64::NEG_INFINITY,
            cp: f64::NEG_INFINITY,
            length: usize::MAX,
        }
    }

    /// Components as floats, with length negated so that larger is better
    /// in every position.
    pub fn components(&self) -> [f64; 4] {
        [self.fitness, self.progress, self.cp, -(self.length as f64)]
    }
}

impl Ord for Fitness {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fitness
            .total_cmp(&other.fitness)
            .then_with(|| self.progress.total_cmp(&other.progress))
            .then_with(|| self.cp.total_cmp(&other.cp))
            .then_with(|| other.length.cmp(&self.length))
    }
}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Fitness {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fitness {}

/// A scored action sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub sequence: Vec<ActionId>,
    pub fitness: Fitness,
}

impl Individual {
    /// Scores `sequence` with `evaluator`.
    pub fn scored<E: Evaluate + ?Sized>(sequence: Vec<ActionId>, evaluator: &E) -> Self {
        let fitness = evaluator.evaluate(&sequence);
        Self { sequence, fitness }
    }
}

/// Sorts best first. Stable, so equal scores keep their order.
pub(crate) fn sort_descending(individuals: &mut [Individual]) {
    individuals.sort_by(|a, b| b.fitness.cmp(&a.fitness));
}

/// Population standard deviation of each fitness component.
pub fn diversity(scores: &[Fitness]) -> [f64; 4] {
    let mut out = [0.0; 4];
    if scores.is_empty() {
        return out;
    }
    let n = scores.len() as f64;
    for (k, slot) in out.iter_mut().enumerate() {
        let mean = scores.iter().map(|f| f.components()[k]).sum::<f64>() / n;
        let var = scores
            .iter()
            .map(|f| (f.components()[k] - mean).powi(2))
            .sum::<f64>()
            / n;
        *slot = var.sqrt();
    }
    out
}
