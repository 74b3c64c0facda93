//! Parent selection.
//!
//! Selection works on one island at a time. All functions assume
//! **maximization** (higher [`Fitness`](super::Fitness) is better) and
//! return an error instead of panicking on an empty island.

use rand::Rng;

use super::types::Individual;
use crate::error::{Result, SolverError};
use crate::random::random_int;

/// First individual with the highest fitness.
///
/// # Errors
/// Returns [`SolverError::InvalidArgument`] when `candidates` is empty.
pub fn select_best(candidates: &[Individual]) -> Result<&Individual> {
    let mut iter = candidates.iter();
    let mut best = iter
        .next()
        .ok_or_else(|| SolverError::InvalidArgument("cannot select from an empty set".into()))?;
    for ind in iter {
        if ind.fitness > best.fitness {
            best = ind;
        }
    }
    Ok(best)
}

/// Tournament selection: `count` winners, each the fittest of `size`
/// uniform draws (with replacement) from `island`.
///
/// # Complexity
/// O(count * size)
///
/// # Errors
/// Returns [`SolverError::InvalidArgument`] when `island` is empty.
pub fn tournament<R: Rng>(
    island: &[Individual],
    size: usize,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Individual>> {
    let size = size.max(1);
    let mut winners = Vec::with_capacity(count);
    for _ in 0..count {
        let mut best = random_int(rng, 0, island.len())?;
        for _ in 1..size {
            let idx = random_int(rng, 0, island.len())?;
            if island[idx].fitness > island[best].fitness {
                best = idx;
            }
        }
        winners.push(island[best].clone());
    }
    Ok(winners)
}
