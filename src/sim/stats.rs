//! Batch statistics and the quality-to-HQ curve.

use crate::model::CraftState;

/// Quality achieved at a given HQ percentage (quartic fit).
pub fn quality_from_hq_percent(hq_percent: f64) -> f64 {
    let x = hq_percent;
    -5.6604e-6 * x.powi(4) + 0.0015369705 * x.powi(3) - 0.1426469573 * x.powi(2)
        + 5.6122722959 * x
        - 5.5950384565
}

/// Smallest whole HQ percentage in `1..=100` whose curve value reaches
/// `quality_percent`.
///
/// The curve is increasing on `[0, 100]`, so a bisection over the integer
/// candidates finds the same value as stepping up from 1.
pub fn hq_percent_from_quality(quality_percent: f64) -> f64 {
    if quality_percent == 0.0 {
        return 1.0;
    }
    if quality_percent >= 100.0 {
        return 100.0;
    }
    let (mut lo, mut hi) = (1u32, 100u32);
    while lo < hi {
        let mid = (lo + hi) / 2;
        if quality_from_hq_percent(mid as f64) < quality_percent {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo as f64
}

/// Quality as a percentage of `max_quality`.
pub fn quality_percent(quality: f64, max_quality: u32) -> f64 {
    quality / max_quality as f64 * 100.0
}

/// One row of aggregate values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatLine {
    pub durability: f64,
    pub cp: f64,
    pub quality: f64,
    pub progress: f64,
    pub hq_percent: f64,
}

/// Result of a Monte Carlo batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloStats {
    pub runs: usize,
    /// Runs meeting progress, durability and CP, in percent.
    pub success_rate: f64,
    pub mean: StatLine,
    pub median: StatLine,
    pub min: StatLine,
    pub max: StatLine,
    /// Trajectory of the first run with the highest final quality.
    pub best: Vec<CraftState>,
    /// Trajectory of the first run with the lowest final quality.
    pub worst: Vec<CraftState>,
}

/// Median at index `len / 2` of the sorted values; `0` when empty.
pub(crate) fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    values[values.len() / 2]
}
