//! Seeded random helpers.
//!
//! All randomness in the crate flows through explicitly seeded generators
//! created here, so runs are reproducible and parallel workers can be handed
//! independent child streams.

use crate::error::{Result, SolverError};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from OS entropy when `None`.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Draws `n` child seeds from `rng`, one per parallel worker.
pub fn child_seeds<R: Rng>(rng: &mut R, n: usize) -> Vec<u64> {
    (0..n).map(|_| rng.random()).collect()
}

/// Uniform integer in the half-open range `[min, max)`.
///
/// # Errors
/// Returns [`SolverError::InvalidArgument`] when `max <= min`.
pub fn random_int<R: Rng>(rng: &mut R, min: usize, max: usize) -> Result<usize> {
    if max <= min {
        return Err(SolverError::InvalidArgument(format!(
            "empty range: max ({max}) must exceed min ({min})"
        )));
    }
    Ok(rng.random_range(min..max))
}

/// Uniform float in `[0, 1)`.
pub fn unit<R: Rng>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// Categorical draw proportional to `weights`.
///
/// Zero weights are never selected.
///
/// # Errors
/// Returns [`SolverError::InvalidArgument`] when `weights` is empty, holds a
/// negative or NaN weight, or sums to zero.
pub fn weighted_index<R: Rng>(weights: &[f64], rng: &mut R) -> Result<usize> {
    let dist = WeightedIndex::new(weights)
        .map_err(|e| SolverError::InvalidArgument(format!("invalid weights: {e}")))?;
    Ok(dist.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rng_is_reproducible() {
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        for _ in 0..100 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn test_random_int_bounds() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let v = random_int(&mut rng, 3, 9).unwrap();
            assert!((3..9).contains(&v));
        }
        assert_eq!(random_int(&mut rng, 4, 5).unwrap(), 4);
    }

    #[test]
    fn test_random_int_empty_range_is_invalid_argument() {
        let mut rng = create_rng(42);
        let err = random_int(&mut rng, 5, 5).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(random_int(&mut rng, 6, 2).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = create_rng(42);
        let weights = [0.0, 3.0, 0.0, 1.0];
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[weighted_index(&weights, &mut rng).unwrap()] += 1;
        }
        assert_eq!(counts[0], 0);
        assert_eq!(counts[2], 0);
        assert!(counts[1] > counts[3] * 2, "counts: {counts:?}");
    }

    #[test]
    fn test_weighted_index_rejects_degenerate_weights() {
        let mut rng = create_rng(42);
        assert!(weighted_index(&[], &mut rng).unwrap_err().is_invalid_argument());
        assert!(weighted_index(&[0.0, 0.0], &mut rng)
            .unwrap_err()
            .is_invalid_argument());
        assert!(weighted_index(&[1.0, -1.0], &mut rng)
            .unwrap_err()
            .is_invalid_argument());
        assert!(weighted_index(&[1.0, f64::NAN], &mut rng)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_weighted_index_single_positive_entry() {
        let mut rng = create_rng(9);
        for _ in 0..200 {
            assert_eq!(weighted_index(&[0.0, 0.0, 2.5, 0.0], &mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn test_child_seeds_are_deterministic() {
        let a = child_seeds(&mut create_rng(1), 5);
        let b = child_seeds(&mut create_rng(1), 5);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }
}
